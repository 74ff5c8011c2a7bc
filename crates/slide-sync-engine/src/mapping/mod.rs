//! Translation between text offsets, document-local slides and deck-wide slides.
//!
//! A document's local slide `(h, v)` sits at global `(h + offset, v)`, where
//! `offset` is the number of horizontal slides contributed by every document
//! sorted before it. These functions are pure; [`crate::models::Deck`] keeps
//! the offsets current and calls into them.

use std::ops::Range;

use crate::models::{DeckError, Slide, SlideCoord, SlideDocument};

/// Where a global slide lands in a deck's document list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentHit {
    /// Index of the owning document in deck order.
    pub index: usize,
    /// Horizontal slides contributed by the documents before it.
    pub offset: usize,
}

/// The slide containing `cursor`: the last slide whose offset is at or before it.
pub fn offset_to_local_slide(slides: &[Slide], cursor: usize) -> Result<Slide, DeckError> {
    let after = slides.partition_point(|slide| slide.offset <= cursor);
    after
        .checked_sub(1)
        .map(|index| slides[index])
        .ok_or(DeckError::NoSlides)
}

pub fn local_to_global(local: SlideCoord, document_offset: usize) -> SlideCoord {
    local.shift(document_offset)
}

pub fn global_to_local(global: SlideCoord, document_offset: usize) -> Result<SlideCoord, DeckError> {
    global
        .unshift(document_offset)
        .ok_or(DeckError::OutOfRange(global))
}

/// Offset of every document, in the same order as `documents`.
pub fn cumulative_offsets(documents: &[SlideDocument]) -> Vec<usize> {
    documents
        .iter()
        .scan(0, |before, document| {
            let offset = *before;
            *before += document.horizontal_count();
            Some(offset)
        })
        .collect()
}

/// Find the first document whose last slide, in global terms, is at or after `global`.
///
/// Documents without slides are skipped.
pub fn global_to_document(
    documents: &[SlideDocument],
    global: SlideCoord,
) -> Result<DocumentHit, DeckError> {
    let mut before = 0;
    for (index, document) in documents.iter().enumerate() {
        let Some(last) = document.last_slide() else {
            continue;
        };
        if local_to_global(last.coord(), before) >= global {
            return Ok(DocumentHit {
                index,
                offset: before,
            });
        }
        before += document.horizontal_count();
    }
    Err(DeckError::OutOfRange(global))
}

/// Character range of the slide at `global` within `document`.
///
/// The range runs from the start of the matching slide to the start of the
/// next one, or to the end of the text for the document's last slide.
pub fn global_to_local_range(
    document: &SlideDocument,
    global: SlideCoord,
    document_offset: usize,
) -> Result<Range<usize>, DeckError> {
    let local = global_to_local(global, document_offset)?;
    let slides = document.slides();
    if slides.is_empty() {
        return Err(DeckError::NoSlides);
    }

    let next = slides.partition_point(|slide| slide.coord() <= local);
    let Some(start) = next.checked_sub(1).map(|index| slides[index].offset) else {
        return Err(DeckError::OutOfRange(global));
    };
    let end = slides
        .get(next)
        .map_or(document.text_len(), |slide| slide.offset);
    Ok(start..end)
}

/// Convert a character offset to a byte offset, clamped to the text.
pub fn char_to_byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Convert a byte offset to a character offset, clamped to the text.
///
/// An offset inside a multi-byte character rounds up to the next character.
pub fn byte_to_char_offset(text: &str, byte_offset: usize) -> usize {
    text.char_indices()
        .take_while(|(byte, _)| *byte < byte_offset)
        .count()
}
