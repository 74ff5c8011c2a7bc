pub mod deck;
pub mod document;
pub mod registry;
pub mod slide;

pub use deck::*;
pub use document::*;
pub use registry::*;
pub use slide::*;
