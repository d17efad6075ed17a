mod reader;

pub use reader::{BoundedLineReader, Lines};
