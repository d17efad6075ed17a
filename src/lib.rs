//! Line reading for untrusted input with a hard byte ceiling.
//!
//! [`BoundedLineReader`] reads lines the usual way, except that it never
//! pulls more than a fixed number of bytes from its source while looking for
//! the end of a line. An overlong line fails with [`SizeLimitError`] instead
//! of being buffered without bound.
//!
//! ```ignore
//! use bline::{BoundedLineReader, ReadSource};
//!
//! let mut reader = BoundedLineReader::with_encoding(ReadSource::new(socket), 4096, "UTF-8")?;
//! while let Some(line) = reader.read_line()? {
//!     handle(line);
//! }
//! ```

pub mod bounded;
pub mod charset;
pub mod cliopt;
pub mod decoder;
pub mod error;
pub mod output;
pub mod reader;
pub mod runner;
pub mod source;
pub mod utils;

#[cfg(test)]
mod testing;

pub use bounded::BoundedSource;
pub use charset::{Charset, DEFAULT_CHARSET};
pub use error::{is_size_limit, SizeLimitError, UnsupportedEncodingError};
pub use reader::BoundedLineReader;
pub use source::{ByteSource, CursorSource, ReadSource};
