extern crate std;

use std::io::{self, IoSlice, Write};

use crate::{ArrayError, DynArray};

fn to_io_error(err: ArrayError) -> io::Error {
    let kind = match err {
        ArrayError::AllocFailed { .. } => io::ErrorKind::OutOfMemory,
        _ => io::ErrorKind::InvalidInput,
    };
    io::Error::new(kind, err)
}

/// Write is implemented for `DynArray<N>` by appending whole elements.
///
/// [`Write::write`] consumes the longest prefix of `buf` that is a whole
/// number of elements and returns its length; a buffer shorter than one
/// element yields `Ok(0)`. The array grows as needed.
impl<const N: usize> Write for DynArray<N> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let num = buf.len() - buf.len() % self.elem_size();
        if num == 0 {
            return Ok(0);
        }
        self.extend_from_slice(&buf[..num]).map_err(to_io_error)?;
        Ok(num)
    }

    #[inline(always)]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[inline]
    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        let mut num = 0;
        for buf in bufs {
            let n = self.write(buf)?;
            num += n;
            if n < buf.len() {
                break;
            }
        }
        Ok(num)
    }

    /// Unlike [`Write::write`], a ragged buffer is an error here rather than
    /// a short count, so no bytes are silently dropped.
    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.extend_from_slice(buf).map_err(to_io_error)
    }
}
