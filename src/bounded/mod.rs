mod bounded;

pub use bounded::BoundedSource;
