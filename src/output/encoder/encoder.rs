use std::str::FromStr;

use crate::error::{Error, Result};

/// One line read from a named input.
#[derive(Debug)]
pub struct Line<'a> {
    pub source: Option<&'a str>,
    pub number: usize,
    pub text: &'a str,
}

pub trait Encoder {
    fn encode(&self, line: &Line) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Plain,
    Json,
}

impl Format {
    pub fn encoder(&self, line_numbers: bool) -> Box<dyn Encoder> {
        match self {
            Format::Plain => Box::new(super::PlainEncoder::new(line_numbers)),
            Format::Json => Box::new(super::JsonEncoder::new()),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plain" => Ok(Format::Plain),
            "json" => Ok(Format::Json),
            _ => Err(Error::from(format!("unknown output format '{}'", s))),
        }
    }
}
