use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::models::Slide;
use crate::parsing::{resolve_weight, scan_slides};

/// One source file taking part in a deck.
///
/// `slides` and `weight` are derived from the text and replaced wholesale
/// whenever the text changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideDocument {
    path: PathBuf,
    weight: i64,
    slides: Vec<Slide>,
    text_len: usize,
}

impl SlideDocument {
    /// Scan `text` and resolve its weight.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        let path = path.into();
        let weight = resolve_weight(&path, text);
        Self {
            path,
            weight,
            slides: scan_slides(text),
            text_len: text.chars().count(),
        }
    }

    /// Build a document from an already computed slide list.
    pub fn with_slides(
        path: impl Into<PathBuf>,
        weight: i64,
        slides: Vec<Slide>,
        text_len: usize,
    ) -> Self {
        Self {
            path: path.into(),
            weight,
            slides,
            text_len,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Length in characters of the text the slides were scanned from.
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    pub fn last_slide(&self) -> Option<&Slide> {
        self.slides.last()
    }

    /// Number of horizontal slides this document adds to the deck.
    ///
    /// Vertical slides do not count. A document without slides adds nothing.
    pub fn horizontal_count(&self) -> usize {
        self.last_slide().map_or(0, |slide| slide.horizontal + 1)
    }

    /// Deck order: ascending weight, then path.
    pub fn deck_order(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.path.as_os_str().cmp(other.path.as_os_str()))
    }

    /// Replace the slide list with a fresh scan of `text`. The weight is left alone.
    pub(crate) fn rescan(&mut self, text: &str) {
        self.slides = scan_slides(text);
        self.text_len = text.chars().count();
    }

    pub(crate) fn set_weight(&mut self, weight: i64) {
        self.weight = weight;
    }
}
