use std::path::Path;

use crate::models::{Deck, DeckError};
use crate::parsing::resolve_weight;

/// What a text change did to its deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChange {
    /// The document's weight changed and the deck was re-sorted.
    pub resorted: bool,
    /// Slides in the document after the change.
    pub slide_count: usize,
}

/// Re-derive a document's slides and weight from its new text.
///
/// The whole document is rescanned. The deck is re-sorted only when the
/// weight differs from before.
pub fn apply_text_change(deck: &mut Deck, path: &Path, text: &str) -> Result<TextChange, DeckError> {
    let document = deck
        .document_mut(path)
        .ok_or_else(|| DeckError::UnknownDocument(path.to_path_buf()))?;
    document.rescan(text);
    let slide_count = document.slides().len();

    let resorted = deck.reweight(path, resolve_weight(path, text))?;
    Ok(TextChange {
        resorted,
        slide_count,
    })
}
