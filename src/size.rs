//! Buffer size arithmetic.
//!
//! Everything is computed in bytes by [`compress_bound`]; the generic helpers
//! only convert between element counts and byte lengths around it.
use std::mem;

use bytemuck::Pod;

use crate::error::{Error, Result};

/// Maximum compressed size of `src_len` bytes, in a single-pass scenario.
pub fn compress_bound(src_len: usize) -> usize {
    zstd_safe::compress_bound(src_len)
}

fn width<T>(len: usize) -> Result<usize> {
    match mem::size_of::<T>() {
        0 => Err(Error::ElementSize { len, width: 0 }),
        width => Ok(width),
    }
}

/// Byte length of `count` elements of `T`.
pub fn byte_len<T>(count: usize) -> Result<usize> {
    let width = width::<T>(count)?;
    count.checked_mul(width).ok_or(Error::ElementSize {
        len: count,
        width,
    })
}

/// Number of `T` elements needed to hold `bytes` bytes.
///
/// The last element may be only partially covered.
pub fn elements_touched<T>(bytes: usize) -> Result<usize> {
    let width = width::<T>(bytes)?;
    Ok(bytes / width + usize::from(bytes % width != 0))
}

/// Number of `T` elements in exactly `bytes` bytes.
pub fn exact_elements<T>(bytes: usize) -> Result<usize> {
    let width = width::<T>(bytes)?;
    if bytes % width != 0 {
        return Err(Error::ElementSize { len: bytes, width });
    }
    Ok(bytes / width)
}

/// Largest content a frame of `src_len` bytes can decompress to.
///
/// Every block takes at least 3 bytes and holds at most
/// `BLOCKSIZE_MAX` bytes of content.
pub fn decompress_bound(src_len: usize) -> usize {
    (src_len / 3 + 1).saturating_mul(zstd_safe::BLOCKSIZE_MAX as usize)
}

/// Worst-case compressed size of `src_count` elements of `S`, in `D` elements.
pub fn compress_bound_elements<S, D>(src_count: usize) -> Result<usize> {
    elements_touched::<D>(compress_bound(byte_len::<S>(src_count)?))
}

/// Views a typed slice as raw bytes.
pub(crate) fn as_bytes<T: Pod>(slice: &[T]) -> Result<&[u8]> {
    byte_len::<T>(slice.len())?;
    Ok(bytemuck::cast_slice(slice))
}

/// Views a mutable typed slice as raw bytes.
pub(crate) fn as_bytes_mut<T: Pod>(slice: &mut [T]) -> Result<&mut [u8]> {
    byte_len::<T>(slice.len())?;
    Ok(bytemuck::cast_slice_mut(slice))
}
