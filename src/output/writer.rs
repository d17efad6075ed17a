use std::io::{self, Write};

/// Writes each encoded line followed by a delimiter.
pub struct LineWriter<W> {
    inner: W,
    delim: u8,
}

impl<W: Write> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            delim: b'\n',
        }
    }

    pub fn with_delimiter(inner: W, delim: u8) -> Self {
        Self { inner, delim }
    }

    pub fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf)?;
        self.inner.write_all(&[self.delim])
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiters() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut writer = LineWriter::new(Vec::new());
        writer.write(b"a")?;
        writer.write(b"")?;
        assert_eq!(b"a\n\n".to_vec(), writer.into_inner());

        let mut writer = LineWriter::with_delimiter(Vec::new(), 0);
        writer.write(b"a")?;
        assert_eq!(b"a\0".to_vec(), writer.into_inner());
        Ok(())
    }
}
