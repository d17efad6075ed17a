pub mod parse;
pub mod size;
