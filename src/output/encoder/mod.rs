mod encoder;
mod json;
mod plain;

pub use encoder::{Encoder, Format, Line};
pub use json::JsonEncoder;
pub use plain::PlainEncoder;
