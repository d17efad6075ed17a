use std::convert::TryFrom;
use std::io::{self, Read};

use crate::error::SizeLimitError;
use crate::source::ByteSource;

/// Caps the number of bytes that can be pulled from a [`ByteSource`] between
/// two calls to [`BoundedSource::reset_count`].
///
/// ```ignore
/// source.read_into(&mut buf)?;
/// source.reset_count(); // the full limit is available again
/// ```
///
/// Once the limit is reached every read fails with [`SizeLimitError`] until
/// the counter is reset. `skip` is not counted.
pub struct BoundedSource<S> {
    inner: S,
    limit: Option<u64>,
    consumed: u64,
}

impl<S: ByteSource> BoundedSource<S> {
    /// A negative `limit` means no limit at all.
    pub fn new(limit: i64, inner: S) -> Self {
        let limit = if limit < 0 { None } else { Some(limit as u64) };
        log::trace!("bounded source created, limit: {:?}", limit);
        Self {
            inner,
            limit,
            consumed: 0,
        }
    }

    pub fn unlimited(inner: S) -> Self {
        Self::new(-1, inner)
    }

    #[inline]
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Bytes counted since the last reset.
    #[inline]
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Bytes left before the next read fails. `None` when unlimited.
    pub fn remaining(&self) -> Option<u64> {
        self.limit.map(|limit| limit.saturating_sub(self.consumed))
    }

    pub fn reset_count(&mut self) {
        self.consumed = 0;
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn check(&self) -> Result<(), SizeLimitError> {
        match self.limit {
            Some(limit) if self.consumed >= limit => {
                log::debug!(
                    "byte ceiling of {} reached after {} bytes",
                    limit,
                    self.consumed
                );
                Err(SizeLimitError::new(limit))
            }
            _ => Ok(()),
        }
    }
}

impl<S: ByteSource> ByteSource for BoundedSource<S> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.check()?;
        let result = self.inner.read_byte()?;
        // End of stream counts as well.
        self.consumed += 1;
        Ok(result)
    }

    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.check()?;
        let max_read = match self.remaining() {
            Some(remaining) => buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX)),
            None => buf.len(),
        };

        let n = self.inner.read_into(&mut buf[..max_read])?;
        self.consumed += n as u64;
        Ok(n)
    }

    fn skip(&mut self, n: u64) -> io::Result<u64> {
        self.inner.skip(n)
    }

    fn available(&self) -> io::Result<usize> {
        self.inner.available()
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }

    fn mark_supported(&self) -> bool {
        self.inner.mark_supported()
    }

    fn mark(&mut self, read_limit: usize) {
        self.inner.mark(read_limit)
    }

    fn reset(&mut self) -> io::Result<()> {
        self.inner.reset()
    }
}

impl<S: ByteSource> Read for BoundedSource<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_into(buf)
    }
}
