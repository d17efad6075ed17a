use std::io;

use super::target::CharTarget;
use crate::charset::{CharDecoder, Charset};
use crate::source::{closed, region_mut, ByteSource};

/// Bytes requested from the source by a single fill.
const READ_CHUNK: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unmarked,
    Invalidated,
    At(usize),
}

/// Buffered character reader over a [`ByteSource`].
///
/// Every fill issues one bulk read of at most 8 KiB and decodes the complete
/// characters it got. A line ending in `\r` makes the next read drop a
/// leading `\n`, so `\r\n` is seen as a single terminator.
pub struct CharReader<S> {
    source: S,
    decoder: CharDecoder,
    pending: Vec<u8>,
    chars: Vec<char>,
    pos: usize,
    skip_lf: bool,
    mark: Mark,
    read_ahead_limit: usize,
    marked_skip_lf: bool,
    closed: bool,
}

impl<S: ByteSource> CharReader<S> {
    pub fn new(source: S, charset: Charset) -> Self {
        Self {
            source,
            decoder: charset.decoder(),
            pending: Vec::with_capacity(READ_CHUNK),
            chars: Vec::with_capacity(READ_CHUNK),
            pos: 0,
            skip_lf: false,
            mark: Mark::Unmarked,
            read_ahead_limit: 0,
            marked_skip_lf: false,
            closed: false,
        }
    }

    #[inline]
    pub fn charset(&self) -> Charset {
        self.decoder.charset()
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.closed {
            Err(closed())
        } else {
            Ok(())
        }
    }

    #[inline]
    fn buffered(&self) -> usize {
        self.chars.len() - self.pos
    }

    /// Refills the char buffer. Returns false at end of stream.
    fn fill(&mut self) -> io::Result<bool> {
        match self.mark {
            Mark::At(mark) if self.pos - mark >= self.read_ahead_limit => {
                self.mark = Mark::Invalidated;
                self.read_ahead_limit = 0;
                self.chars.clear();
                self.pos = 0;
            }
            Mark::At(mark) => {
                self.chars.drain(..mark);
                self.pos -= mark;
                self.mark = Mark::At(0);
            }
            _ => {
                self.chars.clear();
                self.pos = 0;
            }
        }

        let start = self.chars.len();
        loop {
            let filled = self.pending.len();
            self.pending.resize(filled + READ_CHUNK, 0);
            let n = match self.source.read_into(&mut self.pending[filled..]) {
                Ok(n) => n,
                Err(e) => {
                    self.pending.truncate(filled);
                    return Err(e);
                }
            };
            self.pending.truncate(filled + n);

            let end_of_stream = n == 0;
            let used = self
                .decoder
                .decode(&self.pending, &mut self.chars, end_of_stream);
            self.pending.drain(..used);

            if self.chars.len() > start {
                return Ok(true);
            }
            if end_of_stream {
                return Ok(false);
            }
        }
    }

    /// Makes sure at least one char is buffered, dropping a `\n` left over
    /// from a preceding `\r`. Returns false at end of stream.
    fn prepare(&mut self) -> io::Result<bool> {
        loop {
            if self.pos >= self.chars.len() && !self.fill()? {
                return Ok(false);
            }
            if self.skip_lf {
                self.skip_lf = false;
                if self.chars[self.pos] == '\n' {
                    self.pos += 1;
                    continue;
                }
            }
            return Ok(true);
        }
    }

    pub fn read_char(&mut self) -> io::Result<Option<char>> {
        self.ensure_open()?;
        if !self.prepare()? {
            return Ok(None);
        }
        let c = self.chars[self.pos];
        self.pos += 1;
        Ok(Some(c))
    }

    /// Reads whatever a single fill provides, up to `buf.len()` chars.
    /// `Ok(0)` with a non-empty buffer means end of stream.
    pub fn read(&mut self, buf: &mut [char]) -> io::Result<usize> {
        self.ensure_open()?;
        if buf.is_empty() || !self.prepare()? {
            return Ok(0);
        }
        let n = buf.len().min(self.buffered());
        buf[..n].copy_from_slice(&self.chars[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    pub fn read_range(&mut self, buf: &mut [char], offset: usize, length: usize) -> io::Result<usize> {
        self.read(region_mut(buf, offset, length)?)
    }

    pub fn read_into_target<T: CharTarget + ?Sized>(&mut self, target: &mut T) -> io::Result<usize> {
        self.ensure_open()?;
        let want = target.remaining();
        if want == 0 || !self.prepare()? {
            return Ok(0);
        }
        let n = want.min(self.buffered());
        target.put(&self.chars[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    /// Reads a line terminated by `\n`, `\r` or `\r\n`, without the
    /// terminator. `None` at end of stream.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        self.ensure_open()?;
        let mut line = String::new();
        loop {
            if !self.prepare()? {
                return Ok(if line.is_empty() { None } else { Some(line) });
            }

            let rest = &self.chars[self.pos..];
            match rest.iter().position(|&c| c == '\n' || c == '\r') {
                Some(i) => {
                    line.extend(&rest[..i]);
                    self.skip_lf = rest[i] == '\r';
                    self.pos += i + 1;
                    return Ok(Some(line));
                }
                None => {
                    line.extend(rest);
                    self.pos = self.chars.len();
                }
            }
        }
    }

    /// Skips up to `n` chars, returns how many were skipped.
    pub fn skip(&mut self, n: u64) -> io::Result<u64> {
        self.ensure_open()?;
        let mut left = n;
        while left > 0 {
            if !self.prepare()? {
                break;
            }
            let step = (self.buffered() as u64).min(left);
            self.pos += step as usize;
            left -= step;
        }
        Ok(n - left)
    }

    /// True if the next read will not block.
    pub fn ready(&mut self) -> io::Result<bool> {
        self.ensure_open()?;
        if self.skip_lf && self.pos < self.chars.len() {
            self.skip_lf = false;
            if self.chars[self.pos] == '\n' {
                self.pos += 1;
            }
        }
        Ok(self.pos < self.chars.len() || self.source.available()? > 0)
    }

    pub fn mark_supported(&self) -> bool {
        true
    }

    /// Remembers the current position. Reading more than `read_ahead_limit`
    /// chars past it may invalidate the mark.
    pub fn mark(&mut self, read_ahead_limit: usize) -> io::Result<()> {
        self.ensure_open()?;
        self.read_ahead_limit = read_ahead_limit;
        self.mark = Mark::At(self.pos);
        self.marked_skip_lf = self.skip_lf;
        Ok(())
    }

    pub fn reset(&mut self) -> io::Result<()> {
        self.ensure_open()?;
        match self.mark {
            Mark::At(mark) => {
                self.pos = mark;
                self.skip_lf = self.marked_skip_lf;
                Ok(())
            }
            Mark::Invalidated => Err(io::Error::new(io::ErrorKind::Other, "mark invalid")),
            Mark::Unmarked => Err(io::Error::new(io::ErrorKind::Other, "stream not marked")),
        }
    }

    /// Closes the reader and the source under it. Closing twice is a no-op.
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.chars.clear();
        self.pending.clear();
        self.pos = 0;
        self.source.close()
    }
}
