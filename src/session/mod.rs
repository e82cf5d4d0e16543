//! Compression sessions.
//!
//! A [`Session`] owns one compression context and one decompression context,
//! both created the first time they are needed, along with the
//! [`Parameters`] used to configure the compression context.
//!
//! All calls process the whole input at once. This is best used with
//! relatively small buffers (like network packets or database pages);
//! see [`Session::decompress_stream`] for frames that do not record their
//! decompressed size.

mod compress;
mod decompress;

pub use self::decompress::frame_content_size;

use std::fmt;

use zstd_safe::{CCtx, DCtx};

use crate::error::{Error, Result};
use crate::params::{Parameters, Tunable};
use crate::DEFAULT_COMPRESSION_LEVEL;

/// Compresses and decompresses independent frames, reusing its contexts.
///
/// This reduces allocations compared to calling the free
/// [`compress`](crate::compress) function repeatedly. Frames produced by a
/// session are still completely independent.
///
/// A session can be sent to another thread but not shared: every operation
/// takes `&mut self`. Use one session per thread, or wrap it in a `Mutex`.
#[derive(Default)]
pub struct Session {
    cctx: Option<CCtx<'static>>,
    dctx: Option<DCtx<'static>>,
    parameters: Parameters,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("parameters", &self.parameters)
            .field("cctx", &self.cctx.is_some())
            .field("dctx", &self.dctx.is_some())
            .finish()
    }
}

impl Session {
    /// Creates a session at [`DEFAULT_COMPRESSION_LEVEL`].
    ///
    /// No zstd context is allocated until the first call that needs one.
    pub fn new() -> Self {
        Session::default()
    }

    /// Creates a session compressing at the given level.
    pub fn with_level(level: i32) -> Result<Self> {
        let mut session = Session::new();
        session.set_compression_level(level)?;
        Ok(session)
    }

    /// Creates a session using the given parameter set.
    ///
    /// The parameters are applied right away, so invalid values are
    /// reported here rather than on the first compression.
    pub fn with_parameters(parameters: Parameters) -> Result<Self> {
        let mut session = Session {
            cctx: None,
            dctx: None,
            parameters,
        };
        session.apply()?;
        Ok(session)
    }

    /// Sets a compression parameter.
    ///
    /// The value is stored in the parameter set, then the whole set is
    /// applied to the compression context. If either step fails, the
    /// previous value is kept.
    pub fn set_parameter(
        &mut self,
        tunable: Tunable,
        value: i32,
    ) -> Result<&mut Self> {
        let previous = self.parameters.set(tunable, value).map_err(|e| {
            log::warn!("rejected {:?}={}: {}", tunable, value, e);
            e
        })?;

        if let Err(e) = self.apply() {
            self.parameters.restore(tunable, previous);
            return Err(e);
        }
        Ok(self)
    }

    /// Sets the compression level.
    pub fn set_compression_level(&mut self, level: i32) -> Result<&mut Self> {
        self.set_parameter(Tunable::CompressionLevel, level)
    }

    /// Returns the compression level from the parameter set.
    ///
    /// This does not require the compression context to exist.
    pub fn compression_level(&self) -> i32 {
        self.parameters
            .get(Tunable::CompressionLevel)
            .unwrap_or(DEFAULT_COMPRESSION_LEVEL)
    }

    /// Returns the value last set for a tunable, if any.
    pub fn parameter(&self, tunable: Tunable) -> Option<i32> {
        self.parameters.get(tunable)
    }

    /// Returns the current parameter set.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn apply(&mut self) -> Result<()> {
        if let Some(cctx) = self.cctx.as_mut() {
            return self.parameters.apply(cctx);
        }
        // A new context gets the whole set on creation.
        self.cctx().map(|_| ())
    }

    fn cctx(&mut self) -> Result<&mut CCtx<'static>> {
        let cctx = match self.cctx.take() {
            Some(cctx) => cctx,
            None => {
                let mut cctx = CCtx::try_create()
                    .ok_or(Error::Initialization("compression context"))?;
                log::debug!("created compression context");
                self.parameters.apply(&mut cctx)?;
                cctx
            }
        };
        Ok(self.cctx.insert(cctx))
    }

    fn dctx(&mut self) -> Result<&mut DCtx<'static>> {
        let dctx = match self.dctx.take() {
            Some(dctx) => dctx,
            None => {
                let dctx = DCtx::try_create()
                    .ok_or(Error::Initialization("decompression context"))?;
                log::debug!("created decompression context");
                dctx
            }
        };
        Ok(self.dctx.insert(dctx))
    }
}
