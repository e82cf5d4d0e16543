use bytemuck::Pod;

use super::Session;
use crate::error::{Error, Result};
use crate::size;

impl Session {
    /// Compresses a single frame of data to the given destination buffer.
    ///
    /// The destination must be able to hold [`compress_bound`] bytes,
    /// otherwise `Error::BufferTooSmall` is returned and nothing is written.
    ///
    /// Returns the number of bytes written.
    ///
    /// [`compress_bound`]: crate::size::compress_bound
    pub fn compress_to_buffer(
        &mut self,
        source: &[u8],
        destination: &mut [u8],
    ) -> Result<usize> {
        let required = size::compress_bound(source.len());
        if destination.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: destination.len(),
            });
        }

        let written = self
            .cctx()?
            .compress2(destination, source)
            .map_err(Error::engine("ZSTD_compress2"))?;
        log::trace!("compressed {} bytes into {}", source.len(), written);
        Ok(written)
    }

    /// Compresses a typed slice into a typed destination.
    ///
    /// Returns the number of destination elements written to. When the
    /// compressed length is not a multiple of `D`'s width, the last element
    /// is only partially overwritten.
    pub fn compress_slice<S: Pod, D: Pod>(
        &mut self,
        source: &[S],
        destination: &mut [D],
    ) -> Result<usize> {
        let written = self.compress_to_buffer(
            size::as_bytes(source)?,
            size::as_bytes_mut(destination)?,
        )?;
        size::elements_touched::<D>(written)
    }

    /// Compresses a typed slice and returns the compressed frame.
    pub fn compress<S: Pod>(&mut self, source: &[S]) -> Result<Vec<u8>> {
        self.compress_as(source)
    }

    /// Compresses a typed slice into a vector of `D`.
    ///
    /// Fails with `Error::ElementSize` if the frame length is not a whole
    /// number of `D` elements, so this is mostly useful with byte-sized
    /// types like `i8`.
    pub fn compress_as<S: Pod, D: Pod>(
        &mut self,
        source: &[S],
    ) -> Result<Vec<D>> {
        let source = size::as_bytes(source)?;
        let capacity =
            size::elements_touched::<D>(size::compress_bound(source.len()))?;

        let mut buffer = vec![D::zeroed(); capacity];
        let written =
            self.compress_to_buffer(source, size::as_bytes_mut(&mut buffer)?)?;

        buffer.truncate(size::exact_elements::<D>(written)?);
        buffer.shrink_to_fit();
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use crate::{size, Error, Session, Tunable};

    fn sample() -> Vec<u32> {
        (0..2048u32).map(|i| (i % 97).to_le()).collect()
    }

    #[test]
    fn rejects_small_destination_untouched() {
        let data = sample();
        let mut session = Session::new();

        let required = size::compress_bound(data.len() * 4);
        let mut destination = vec![0xAAu8; required - 1];

        match session.compress_slice(&data, &mut destination) {
            Err(Error::BufferTooSmall {
                required: r,
                provided: p,
            }) => {
                assert_eq!(r, required);
                assert_eq!(p, required - 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(destination.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn written_count_fits_bound() {
        let data = sample();
        let mut session = Session::new();

        let mut destination = vec![0u8; size::compress_bound(data.len() * 4)];
        let written = session.compress_slice(&data, &mut destination).unwrap();
        assert!(written <= destination.len());
        assert_eq!(&destination[..written], &session.compress(&data).unwrap()[..]);
    }

    #[test]
    fn slice_count_is_in_destination_elements() {
        let data = sample();
        let mut session = Session::new();
        let bytes = session.compress(&data).unwrap();

        let capacity = size::compress_bound_elements::<u32, u64>(data.len())
            .unwrap();
        let mut destination = vec![0u64; capacity];
        let written = session.compress_slice(&data, &mut destination).unwrap();
        assert_eq!(written, (bytes.len() + 7) / 8);
    }

    #[test]
    fn compress_as_signed_bytes() {
        let data = sample();
        let mut session = Session::new();

        let unsigned = session.compress(&data).unwrap();
        let signed: Vec<i8> = session.compress_as(&data).unwrap();
        assert_eq!(bytemuck::cast_slice::<i8, u8>(&signed), &unsigned[..]);
    }

    #[test]
    fn deterministic_output() {
        let data = sample();
        let mut session = Session::with_level(7).unwrap();
        session.set_parameter(Tunable::ChecksumFlag, 1).unwrap();

        let first = session.compress(&data).unwrap();
        let second = session.compress(&data).unwrap();
        assert_eq!(first, second);

        let mut other = Session::with_level(7).unwrap();
        other.set_parameter(Tunable::ChecksumFlag, 1).unwrap();
        assert_eq!(first, other.compress(&data).unwrap());
    }
}
