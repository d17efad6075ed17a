use std::io;

use crate::bounded::BoundedSource;
use crate::charset::Charset;
use crate::decoder::{CharReader, CharTarget};
use crate::error::UnsupportedEncodingError;
use crate::source::ByteSource;

/// Line reader that refuses to buffer more than a fixed number of bytes per
/// read call.
///
/// The byte counter of the underlying [`BoundedSource`] is reset after every
/// successful read operation, so the ceiling applies to each call on its own.
/// Used only through [`BoundedLineReader::read_line`] that makes it a per
/// line ceiling: a line with no terminator within the limit fails with
/// [`crate::SizeLimitError`] instead of growing without bound. Mixing
/// `read_line` with the char level reads weakens that guarantee, since each
/// of them resets the counter too.
///
/// A failed read does not reset the counter.
pub struct BoundedLineReader<S> {
    inner: CharReader<BoundedSource<S>>,
}

impl<S: ByteSource> BoundedLineReader<S> {
    /// Reads `source` as ISO-8859-1. A negative limit disables the ceiling.
    pub fn new(source: S, max_bytes_per_unit: i64) -> Self {
        Self::with_charset(source, max_bytes_per_unit, Charset::default())
    }

    pub fn with_encoding(
        source: S,
        max_bytes_per_unit: i64,
        encoding: &str,
    ) -> Result<Self, UnsupportedEncodingError> {
        let charset = Charset::for_label(encoding)?;
        Ok(Self::with_charset(source, max_bytes_per_unit, charset))
    }

    pub fn with_charset(source: S, max_bytes_per_unit: i64, charset: Charset) -> Self {
        log::debug!(
            "bounded line reader: {} bytes per read, charset {}",
            max_bytes_per_unit,
            charset
        );
        let bounded = BoundedSource::new(max_bytes_per_unit, source);
        Self {
            inner: CharReader::new(bounded, charset),
        }
    }

    #[inline]
    pub fn limit(&self) -> Option<u64> {
        self.inner.get_ref().limit()
    }

    #[inline]
    pub fn charset(&self) -> Charset {
        self.inner.charset()
    }

    pub fn get_ref(&self) -> &S {
        self.inner.get_ref().get_ref()
    }

    pub fn into_inner(self) -> S {
        self.inner.into_inner().into_inner()
    }

    fn reset_count(&mut self) {
        self.inner.get_mut().reset_count();
    }

    pub fn read_char(&mut self) -> io::Result<Option<char>> {
        let c = self.inner.read_char()?;
        self.reset_count();
        Ok(c)
    }

    /// Not guaranteed to fill `buf`. `Ok(0)` with a non-empty buffer means
    /// end of stream.
    pub fn read(&mut self, buf: &mut [char]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.reset_count();
        Ok(n)
    }

    pub fn read_range(&mut self, buf: &mut [char], offset: usize, length: usize) -> io::Result<usize> {
        let n = self.inner.read_range(buf, offset, length)?;
        self.reset_count();
        Ok(n)
    }

    pub fn read_into_target<T: CharTarget + ?Sized>(&mut self, target: &mut T) -> io::Result<usize> {
        let n = self.inner.read_into_target(target)?;
        self.reset_count();
        Ok(n)
    }

    /// Reads a line terminated by `\n`, `\r` or `\r\n`, without the
    /// terminator. `None` at end of stream.
    ///
    /// Fails with [`crate::SizeLimitError`] (inside the returned
    /// [`io::Error`]) when no terminator shows up within the byte ceiling.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let line = self.inner.read_line()?;
        self.reset_count();
        Ok(line)
    }

    /// Iterates over the remaining lines. Stops after the first error.
    pub fn lines(&mut self) -> Lines<'_, S> {
        Lines {
            reader: self,
            done: false,
        }
    }

    pub fn skip(&mut self, n: u64) -> io::Result<u64> {
        self.inner.skip(n)
    }

    pub fn ready(&mut self) -> io::Result<bool> {
        self.inner.ready()
    }

    pub fn mark_supported(&self) -> bool {
        self.inner.mark_supported()
    }

    pub fn mark(&mut self, read_ahead_limit: usize) -> io::Result<()> {
        self.inner.mark(read_ahead_limit)
    }

    pub fn reset(&mut self) -> io::Result<()> {
        self.inner.reset()
    }

    /// Closes the decoder, the bounded source and the wrapped source.
    pub fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}

pub struct Lines<'a, S> {
    reader: &'a mut BoundedLineReader<S>,
    done: bool,
}

impl<'a, S: ByteSource> Iterator for Lines<'a, S> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::CharBuffer;
    use crate::error::{is_size_limit, SizeLimitError};
    use crate::source::{CursorSource, ReadSource};
    use crate::testing::{repeat_a, SpySource};

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_read_infinite_stream() {
        let mut reader = BoundedLineReader::new(repeat_a(None), 1024);

        let err = reader.read_line().unwrap_err();
        assert_eq!(Some(&SizeLimitError::new(1024)), SizeLimitError::from_io(&err));
    }

    #[test]
    fn test_read_small_enough_stream() -> TestResult {
        let mut reader = BoundedLineReader::new(repeat_a(Some(1023)), 1024);

        let line = reader.read_line()?.unwrap_or_default();
        assert_eq!(1023, line.len());
        assert!(line.chars().all(|c| c == 'A'));
        assert_eq!(None, reader.read_line()?);
        reader.close()?;
        Ok(())
    }

    #[test]
    fn test_read_one_char_at_a_time() -> TestResult {
        let mut reader = BoundedLineReader::new(repeat_a(Some(4)), 1);

        for _ in 0..4 {
            assert_eq!(Some('A'), reader.read_char()?);
        }
        assert_eq!(None, reader.read_char()?);
        Ok(())
    }

    #[test]
    fn test_read_buffer_in_pairs() -> TestResult {
        let mut reader = BoundedLineReader::new(repeat_a(Some(4)), 2);
        let mut content = Vec::new();
        let mut buf = [' '; 2];

        loop {
            match reader.read(&mut buf)? {
                0 => break,
                n => content.extend_from_slice(&buf[..n]),
            }
        }

        assert_eq!(vec!['A', 'A', 'A', 'A'], content);
        assert_eq!(None, reader.read_char()?);
        Ok(())
    }

    #[test]
    fn test_ceiling_applies_per_line() -> TestResult {
        let input = "12345\n123456789\n12345678\n";
        let mut reader = BoundedLineReader::new(CursorSource::new(input), 10);

        assert_eq!(Some("12345".to_owned()), reader.read_line()?);
        // The first fill stopped after 10 bytes, in the middle of this line.
        assert_eq!(Some("123456789".to_owned()), reader.read_line()?);
        assert_eq!(Some("12345678".to_owned()), reader.read_line()?);
        assert_eq!(None, reader.read_line()?);
        Ok(())
    }

    #[test]
    fn test_long_line_fails_after_short_ones() -> TestResult {
        let mut input = b"ok\n".to_vec();
        input.extend(std::iter::repeat(b'x').take(64));
        input.push(b'\n');
        let mut reader = BoundedLineReader::new(CursorSource::new(input), 16);

        assert_eq!(Some("ok".to_owned()), reader.read_line()?);
        let err = reader.read_line().unwrap_err();
        assert!(is_size_limit(&err));
        // No automatic reset after the failure.
        assert!(is_size_limit(&reader.read_line().unwrap_err()));
        Ok(())
    }

    #[test]
    fn test_unlimited() -> TestResult {
        let mut reader = BoundedLineReader::new(repeat_a(Some(100_000)), -1);

        assert_eq!(None, reader.limit());
        assert_eq!(100_000, reader.read_line()?.unwrap_or_default().len());
        Ok(())
    }

    #[test]
    fn test_encoding() -> TestResult {
        let input = "gr\u{fc}\u{df}e\r\nd\u{e9}j\u{e0} vu\n";
        let mut reader =
            BoundedLineReader::with_encoding(CursorSource::new(input.as_bytes()), 64, "UTF-8")?;

        assert_eq!(Charset::Utf8, reader.charset());
        let lines = reader.lines().collect::<io::Result<Vec<_>>>()?;
        assert_eq!(vec!["gr\u{fc}\u{df}e", "d\u{e9}j\u{e0} vu"], lines);
        Ok(())
    }

    #[test]
    fn test_default_encoding_is_latin1() -> TestResult {
        let mut reader = BoundedLineReader::new(CursorSource::new(&b"caf\xe9"[..]), 64);

        assert_eq!(Charset::Latin1, reader.charset());
        assert_eq!(Some("caf\u{e9}".to_owned()), reader.read_line()?);
        Ok(())
    }

    #[test]
    fn test_unsupported_encoding() {
        let result = BoundedLineReader::with_encoding(CursorSource::new("x"), 64, "EBCDIC-XYZ");

        match result {
            Err(err) => assert_eq!("EBCDIC-XYZ", err.label()),
            Ok(_) => panic!("reader built with an unknown encoding"),
        }
    }

    #[test]
    fn test_every_read_resets_the_counter() -> TestResult {
        let input = "abcdefgh";
        let mut reader = BoundedLineReader::new(CursorSource::new(input), 2);
        let mut buf = [' '; 8];
        let mut target = CharBuffer::with_capacity(8);

        assert_eq!(2, reader.read(&mut buf)?);
        assert_eq!(2, reader.read_range(&mut buf, 2, 6)?);
        assert_eq!(2, reader.read_into_target(&mut target)?);
        assert_eq!(Some('g'), reader.read_char()?);
        assert_eq!(Some('h'), reader.read_char()?);
        assert_eq!(None, reader.read_char()?);
        assert_eq!(['a', 'b', 'c', 'd'], buf[..4]);
        assert_eq!("ef", target.to_string());
        Ok(())
    }

    #[test]
    fn test_lines_stop_after_error() {
        let mut reader = BoundedLineReader::new(repeat_a(None), 8);
        let mut lines = reader.lines();

        assert!(matches!(lines.next(), Some(Err(_))));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_skip_does_not_reset_the_counter() -> TestResult {
        let (spy, log) = SpySource::new(b"0123456789ab\n");
        let mut reader = BoundedLineReader::new(spy, 4);

        assert_eq!(Some('0'), reader.read_char()?);
        assert_eq!(3, reader.skip(3)?);
        // Needs a refill of 4 bytes, which uses up the whole allowance.
        assert_eq!(2, reader.skip(2)?);
        assert!(is_size_limit(&reader.skip(4).unwrap_err()));
        // Chars are skipped through the decoder, never on the source itself.
        assert_eq!(0, log.borrow().skipped);
        Ok(())
    }

    #[test]
    fn test_mark_reset_and_ready() -> TestResult {
        let mut reader = BoundedLineReader::new(CursorSource::new("one\ntwo\n"), 64);

        assert!(reader.mark_supported());
        assert!(reader.ready()?);
        reader.mark(64)?;
        assert_eq!(Some("one".to_owned()), reader.read_line()?);
        reader.reset()?;
        assert_eq!(Some("one".to_owned()), reader.read_line()?);
        assert_eq!(Some("two".to_owned()), reader.read_line()?);
        assert!(!reader.ready()?);
        Ok(())
    }

    #[test]
    fn test_close_propagates() -> TestResult {
        let (spy, log) = SpySource::new(b"line\n");
        let mut reader = BoundedLineReader::new(spy, 64);

        reader.close()?;
        reader.close()?;
        assert_eq!(1, log.borrow().closes);
        assert!(reader.read_line().is_err());
        Ok(())
    }

    #[test]
    fn test_read_source_is_released_on_close() -> TestResult {
        let mut reader = BoundedLineReader::new(ReadSource::new(&b"a\nb\n"[..]), 64);

        assert_eq!(Some("a".to_owned()), reader.read_line()?);
        reader.close()?;
        assert!(reader.into_inner().into_inner().is_none());
        Ok(())
    }
}
