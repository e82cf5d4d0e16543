//! Session-style bindings to the [zstd library][zstd].
//!
//! This crate provides:
//!
//! * A [`Session`] holding reusable compression and decompression contexts
//!   along with a set of compression [`Parameters`].
//! * Typed-buffer entry points: any `bytemuck::Pod` slice can be compressed,
//!   and decompressed data can be read back as any `Pod` element type.
//! * Size helpers in [`size`] to allocate destination buffers up front.
//!
//! # Example
//!
//! ```rust
//! use zstd_session::Session;
//!
//! # fn main() -> zstd_session::Result<()> {
//! let words: Vec<u32> = (1..=10).collect();
//!
//! let mut session = Session::with_level(3)?;
//! let compressed = session.compress(&words)?;
//! let decompressed: Vec<u32> = session.decompress(&compressed)?;
//!
//! assert_eq!(words, decompressed);
//! # Ok(())
//! # }
//! ```
//!
//! [zstd]: https://github.com/facebook/zstd
#![deny(missing_docs)]

mod error;
pub mod params;
pub mod session;
pub mod size;

pub use crate::error::{Error, Result};
pub use crate::params::{Parameters, Tunable};
pub use crate::session::{frame_content_size, Session};

use std::ops::RangeInclusive;

use bytemuck::Pod;

/// Compression level used when none is specified.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 1;

/// Version string of the zstd library in use.
pub fn version_string() -> &'static str {
    zstd_safe::version_string()
}

/// The accepted range of compression levels.
pub fn compression_level_range() -> RangeInclusive<i32> {
    zstd_safe::min_c_level()..=zstd_safe::max_c_level()
}

/// Compresses a slice at the given level, returning the compressed frame.
pub fn compress<S: Pod>(source: &[S], level: i32) -> Result<Vec<u8>> {
    Session::with_level(level)?.compress(source)
}

/// Compresses bytes into the given destination at the given level.
///
/// Returns the number of bytes written.
pub fn compress_to_buffer(
    source: &[u8],
    destination: &mut [u8],
    level: i32,
) -> Result<usize> {
    Session::with_level(level)?.compress_to_buffer(source, destination)
}

/// Decompresses a frame that records its decompressed size.
pub fn decompress<S: Pod, T: Pod>(source: &[S]) -> Result<Vec<T>> {
    Session::new().decompress(source)
}

/// Decompresses a frame into the given destination.
///
/// Returns the number of bytes written.
pub fn decompress_to_buffer(
    source: &[u8],
    destination: &mut [u8],
) -> Result<usize> {
    Session::new().decompress_to_buffer(source, destination)
}

#[cfg(test)]
fn test_cycle<F, G>(data: &[u8], f: F, g: G)
where
    F: Fn(&[u8]) -> Vec<u8>,
    G: Fn(&[u8]) -> Vec<u8>,
{
    let mid = f(data);
    let end = g(&mid);
    assert_eq!(data, &end[..]);
}

#[cfg(test)]
fn test_cycle_unwrap<F, G>(data: &[u8], f: F, g: G)
where
    F: Fn(&[u8]) -> Result<Vec<u8>>,
    G: Fn(&[u8]) -> Result<Vec<u8>>,
{
    test_cycle(data, |data| f(data).unwrap(), |data| g(data).unwrap())
}
