mod encoder;
mod writer;

pub use encoder::{Encoder, Format, JsonEncoder, Line, PlainEncoder};
pub use writer::LineWriter;
