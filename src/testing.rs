//! Sources used by the unit tests.

use std::cell::RefCell;
use std::convert::TryFrom;
use std::io;
use std::rc::Rc;

use crate::source::{ByteSource, CursorSource};

/// Yields `'A'` bytes, `count` of them or forever.
pub(crate) struct RepeatSource {
    remaining: Option<u64>,
}

pub(crate) fn repeat_a(count: Option<u64>) -> RepeatSource {
    RepeatSource { remaining: count }
}

impl ByteSource for RepeatSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.remaining {
            Some(0) => Ok(None),
            Some(ref mut n) => {
                *n -= 1;
                Ok(Some(b'A'))
            }
            None => Ok(Some(b'A')),
        }
    }

    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = match self.remaining {
            Some(remaining) => buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX)),
            None => buf.len(),
        };
        for byte in buf[..n].iter_mut() {
            *byte = b'A';
        }
        if let Some(ref mut remaining) = self.remaining {
            *remaining -= n as u64;
        }
        Ok(n)
    }

    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let skipped = self.remaining.map_or(n, |remaining| remaining.min(n));
        if let Some(ref mut remaining) = self.remaining {
            *remaining -= skipped;
        }
        Ok(skipped)
    }
}

#[derive(Debug, Default)]
pub(crate) struct SpyLog {
    pub reads: usize,
    pub skipped: u64,
    pub marked: Option<usize>,
    pub resets: usize,
    pub closes: usize,
}

/// In-memory source recording every call made to it.
pub(crate) struct SpySource {
    inner: CursorSource<Vec<u8>>,
    log: Rc<RefCell<SpyLog>>,
}

impl SpySource {
    pub fn new(data: &[u8]) -> (Self, Rc<RefCell<SpyLog>>) {
        let log = Rc::new(RefCell::new(SpyLog::default()));
        let spy = Self {
            inner: CursorSource::new(data.to_vec()),
            log: Rc::clone(&log),
        };
        (spy, log)
    }
}

impl ByteSource for SpySource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.log.borrow_mut().reads += 1;
        self.inner.read_byte()
    }

    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.log.borrow_mut().reads += 1;
        self.inner.read_into(buf)
    }

    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let skipped = self.inner.skip(n)?;
        self.log.borrow_mut().skipped += skipped;
        Ok(skipped)
    }

    fn available(&self) -> io::Result<usize> {
        self.inner.available()
    }

    fn close(&mut self) -> io::Result<()> {
        self.log.borrow_mut().closes += 1;
        Ok(())
    }

    fn mark_supported(&self) -> bool {
        true
    }

    fn mark(&mut self, read_limit: usize) {
        self.log.borrow_mut().marked = Some(read_limit);
        self.inner.mark(read_limit)
    }

    fn reset(&mut self) -> io::Result<()> {
        self.log.borrow_mut().resets += 1;
        self.inner.reset()
    }
}
