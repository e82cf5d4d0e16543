use std::convert::TryFrom;

use bytemuck::Pod;
use zstd_safe::{DCtx, InBuffer, OutBuffer, ResetDirective};

use super::Session;
use crate::error::{Error, Result};
use crate::size;

/// Reads the decompressed size, in bytes, from a frame header.
///
/// Fails with `Error::FrameInspection` if the header is invalid or does not
/// record the size (frames written with `ContentSizeFlag` off, for instance).
pub fn frame_content_size(source: &[u8]) -> Result<usize> {
    match zstd_safe::get_frame_content_size(source) {
        Ok(Some(size)) => usize::try_from(size).map_err(|_| {
            Error::FrameInspection("content size does not fit in memory")
        }),
        Ok(None) => Err(Error::FrameInspection(
            "content size is not recorded in the frame header",
        )),
        Err(_) => Err(Error::FrameInspection("invalid frame header")),
    }
}

impl Session {
    /// Decompresses a single frame of data to the given destination buffer.
    ///
    /// The frame must record its decompressed size, and the destination must
    /// be large enough to hold it.
    ///
    /// Returns the number of bytes written.
    pub fn decompress_to_buffer(
        &mut self,
        source: &[u8],
        destination: &mut [u8],
    ) -> Result<usize> {
        let required = frame_content_size(source)?;
        if required > destination.len() {
            return Err(Error::BufferTooSmall {
                required,
                provided: destination.len(),
            });
        }

        let written = self
            .dctx()?
            .decompress(destination, source)
            .map_err(Error::engine("ZSTD_decompressDCtx"))?;
        log::trace!("decompressed {} bytes into {}", source.len(), written);
        Ok(written)
    }

    /// Decompresses a frame into a typed destination.
    ///
    /// Returns the number of destination elements written to.
    pub fn decompress_slice<S: Pod, D: Pod>(
        &mut self,
        source: &[S],
        destination: &mut [D],
    ) -> Result<usize> {
        let written = self.decompress_to_buffer(
            size::as_bytes(source)?,
            size::as_bytes_mut(destination)?,
        )?;
        size::elements_touched::<D>(written)
    }

    /// Decompresses a frame and returns its content as a vector of `T`.
    ///
    /// The buffer is sized from the frame header, which must record a
    /// whole number of `T` elements. Headers claiming more content than the
    /// frame could possibly hold are rejected before allocating.
    pub fn decompress<S: Pod, T: Pod>(&mut self, source: &[S]) -> Result<Vec<T>> {
        let source = size::as_bytes(source)?;
        let content_size = frame_content_size(source)?;
        if content_size > size::decompress_bound(source.len()) {
            log::warn!(
                "frame of {} bytes claims {} bytes of content",
                source.len(),
                content_size
            );
            return Err(Error::FrameInspection(
                "content size exceeds what the frame can hold",
            ));
        }
        let len = size::exact_elements::<T>(content_size)?;

        let mut buffer = Vec::new();
        buffer.try_reserve_exact(len).map_err(|_| Error::Allocation {
            requested_bytes: content_size,
        })?;
        buffer.resize(len, T::zeroed());
        let written =
            self.decompress_to_buffer(source, size::as_bytes_mut(&mut buffer)?)?;
        buffer.truncate(size::exact_elements::<T>(written)?);
        Ok(buffer)
    }

    /// Decompresses a frame incrementally, without relying on its header
    /// for the decompressed size.
    ///
    /// Output is produced in chunks of `DCtx::out_size()` bytes. Data after
    /// the end of the first frame is ignored.
    pub fn decompress_stream<S: Pod, T: Pod>(
        &mut self,
        source: &[S],
    ) -> Result<Vec<T>> {
        let source = size::as_bytes(source)?;
        let dctx = self.dctx()?;
        dctx.reset(ResetDirective::SessionOnly)
            .map_err(Error::engine("ZSTD_DCtx_reset"))?;

        let mut chunk = vec![0u8; DCtx::out_size()];
        let mut input = InBuffer::around(source);
        let mut decompressed = Vec::new();

        loop {
            let (hint, written) = {
                let mut output = OutBuffer::around(&mut chunk[..]);
                let hint = dctx
                    .decompress_stream(&mut output, &mut input)
                    .map_err(Error::engine("ZSTD_decompressStream"))?;
                (hint, output.pos())
            };
            decompressed.extend_from_slice(&chunk[..written]);

            if hint == 0 {
                break;
            }
            // No more input, and the output was not the limiting factor.
            if input.pos == source.len() && written < chunk.len() {
                return Err(Error::IncompleteFrame);
            }
        }
        log::trace!(
            "stream-decompressed {} bytes into {}",
            input.pos,
            decompressed.len()
        );

        let mut buffer =
            vec![T::zeroed(); size::exact_elements::<T>(decompressed.len())?];
        size::as_bytes_mut(&mut buffer)?.copy_from_slice(&decompressed);
        Ok(buffer)
    }
}
