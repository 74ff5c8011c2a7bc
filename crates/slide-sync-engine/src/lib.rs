pub mod io;
pub mod mapping;
pub mod models;
pub mod parsing;
pub mod sync;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use io::{DeckLocation, IoError, OpenError, load_deck, locate_deck};
pub use models::*;
pub use sync::*;
