mod source;

pub use source::{ByteSource, CursorSource, ReadSource};

pub(crate) use source::{closed, region_mut};
