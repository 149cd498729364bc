pub mod document;
pub mod fleet;

pub use document::*;
pub use fleet::*;
