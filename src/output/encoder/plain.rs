use super::encoder::{Encoder, Line};
use crate::error::Result;

pub struct PlainEncoder {
    line_numbers: bool,
}

impl PlainEncoder {
    pub fn new(line_numbers: bool) -> Self {
        Self { line_numbers }
    }
}

impl Encoder for PlainEncoder {
    fn encode(&self, line: &Line) -> Result<Vec<u8>> {
        if !self.line_numbers {
            return Ok(line.text.as_bytes().to_vec());
        }
        Ok(match line.source {
            Some(source) => format!("{}:{}:{}", source, line.number, line.text),
            None => format!("{}:{}", line.number, line.text),
        }
        .into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let line = Line {
            source: Some("a.log"),
            number: 7,
            text: "hello",
        };

        assert_eq!(b"hello".to_vec(), PlainEncoder::new(false).encode(&line)?);
        assert_eq!(b"a.log:7:hello".to_vec(), PlainEncoder::new(true).encode(&line)?);

        let line = Line { source: None, ..line };
        assert_eq!(b"7:hello".to_vec(), PlainEncoder::new(true).encode(&line)?);
        Ok(())
    }
}
