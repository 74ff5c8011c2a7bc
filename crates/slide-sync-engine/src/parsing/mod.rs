//! Derives a document's slide list and ordering key from its text.
//!
//! Only slide boundaries are recognized; the Markdown itself is never parsed.

pub mod boundaries;
pub mod weight;

pub use boundaries::{SECTION_CLOSE, SECTION_OPEN, scan_slides};
pub use weight::{INDEX_FILE_NAMES, INDEX_WEIGHT, UNDECLARED_WEIGHT, is_index_file, resolve_weight};
