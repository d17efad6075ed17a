use serde::Serialize;

use super::encoder::{Encoder, Line};
use crate::error::Result;

#[derive(Serialize)]
struct LineRepr<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    line: usize,
    text: &'a str,
}

pub struct JsonEncoder {}

impl JsonEncoder {
    pub fn new() -> Self {
        Self {}
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, line: &Line) -> Result<Vec<u8>> {
        serde_json::to_vec(&LineRepr {
            source: line.source,
            line: line.number,
            text: line.text,
        })
        .map_err(|e| ("JSON serialization failed", e).into())
    }
}
