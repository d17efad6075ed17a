mod decoder;
mod target;

pub use decoder::CharReader;
pub use target::{CharBuffer, CharTarget};
