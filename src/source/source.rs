use std::convert::TryFrom;
use std::io::{self, Cursor, Read};

/// The minimal surface a byte producer has to offer to be wrapped by
/// [`crate::bounded::BoundedSource`].
///
/// End of stream is `None` for single byte reads and `Ok(0)` for bulk reads
/// into a non-empty buffer.
pub trait ByteSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Reads into `buf[offset..offset + length]`.
    fn read_range(&mut self, buf: &mut [u8], offset: usize, length: usize) -> io::Result<usize> {
        self.read_into(region_mut(buf, offset, length)?)
    }

    fn skip(&mut self, n: u64) -> io::Result<u64>;

    /// Number of bytes that can be read without blocking. Zero if unknown.
    fn available(&self) -> io::Result<usize> {
        Ok(0)
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn mark_supported(&self) -> bool {
        false
    }

    fn mark(&mut self, _read_limit: usize) {}

    fn reset(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Other,
            "mark/reset not supported",
        ))
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_into(buf)
    }

    fn skip(&mut self, n: u64) -> io::Result<u64> {
        (**self).skip(n)
    }

    fn available(&self) -> io::Result<usize> {
        (**self).available()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }

    fn mark_supported(&self) -> bool {
        (**self).mark_supported()
    }

    fn mark(&mut self, read_limit: usize) {
        (**self).mark(read_limit)
    }

    fn reset(&mut self) -> io::Result<()> {
        (**self).reset()
    }
}

pub(crate) fn region_mut<T>(buf: &mut [T], offset: usize, length: usize) -> io::Result<&mut [T]> {
    match offset.checked_add(length) {
        Some(end) if end <= buf.len() => Ok(&mut buf[offset..end]),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "region {}+{} is out of bounds for a buffer of {}",
                offset,
                length,
                buf.len()
            ),
        )),
    }
}

pub(crate) fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "stream closed")
}

/// Adapts any [`io::Read`] into a [`ByteSource`].
///
/// Closing drops the wrapped reader; reads after that fail.
pub struct ReadSource<R> {
    inner: Option<R>,
}

impl<R: Read> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner: Some(inner) }
    }

    /// `None` once the source has been closed.
    pub fn into_inner(self) -> Option<R> {
        self.inner
    }

    fn inner_mut(&mut self) -> io::Result<&mut R> {
        self.inner.as_mut().ok_or_else(closed)
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let inner = self.inner_mut()?;
        let mut byte = [0u8; 1];
        loop {
            match inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let inner = self.inner_mut()?;
        loop {
            match inner.read(buf) {
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }

    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let inner = self.inner_mut()?;
        io::copy(&mut inner.by_ref().take(n), &mut io::sink())
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner = None;
        Ok(())
    }
}

/// In-memory [`ByteSource`] with mark/reset support.
///
/// The mark starts at position zero, so `reset` without a prior `mark`
/// rewinds to the beginning. Closing has no effect.
pub struct CursorSource<T> {
    inner: Cursor<T>,
    mark: u64,
}

impl<T: AsRef<[u8]>> CursorSource<T> {
    pub fn new(data: T) -> Self {
        Self {
            inner: Cursor::new(data),
            mark: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }

    fn remaining(&self) -> u64 {
        let len = self.inner.get_ref().as_ref().len() as u64;
        len.saturating_sub(self.inner.position())
    }
}

impl<T: AsRef<[u8]>> ByteSource for CursorSource<T> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.inner.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }

    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let skipped = n.min(self.remaining());
        self.inner.set_position(self.inner.position() + skipped);
        Ok(skipped)
    }

    fn available(&self) -> io::Result<usize> {
        Ok(usize::try_from(self.remaining()).unwrap_or(usize::MAX))
    }

    fn mark_supported(&self) -> bool {
        true
    }

    fn mark(&mut self, _read_limit: usize) {
        self.mark = self.inner.position();
    }

    fn reset(&mut self) -> io::Result<()> {
        self.inner.set_position(self.mark);
        Ok(())
    }
}
