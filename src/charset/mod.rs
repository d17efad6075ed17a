mod charset;

pub use charset::{CharDecoder, Charset, DEFAULT_CHARSET};
