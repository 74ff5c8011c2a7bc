use relative_path::{RelativePath, RelativePathBuf};
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::mapping::{self, DocumentHit};
use crate::models::{SlideCoord, SlideDocument};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    #[error("Not a valid presentation: no documents found")]
    EmptyDeck,
    #[error("Document has no slides")]
    NoSlides,
    #[error("Slide {0} is beyond the end of the deck")]
    OutOfRange(SlideCoord),
    #[error("Document is not part of this deck: {0}")]
    UnknownDocument(PathBuf),
}

/// Where a global slide lives in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideLocation {
    pub path: PathBuf,
    /// The slide in the owning document's own numbering.
    pub local: SlideCoord,
    /// Character range of the slide's text.
    pub range: Range<usize>,
}

/// One presentation assembled from several documents.
///
/// Documents are kept sorted by weight then path. The horizontal offset of
/// each document is cached and thrown away on any change to the document
/// list, then rebuilt by the next translation that needs it.
#[derive(Debug)]
pub struct Deck {
    site_root: PathBuf,
    url_path: RelativePathBuf,
    documents: Vec<SlideDocument>,
    offsets: Option<Vec<usize>>,
    last_shown: Option<SlideCoord>,
    sort_count: u64,
}

impl Deck {
    pub fn new(
        site_root: impl Into<PathBuf>,
        url_path: impl Into<RelativePathBuf>,
        documents: Vec<SlideDocument>,
    ) -> Result<Self, DeckError> {
        if documents.is_empty() {
            return Err(DeckError::EmptyDeck);
        }

        let mut deck = Self {
            site_root: site_root.into(),
            url_path: url_path.into(),
            documents,
            offsets: None,
            last_shown: None,
            sort_count: 0,
        };
        deck.sort();
        Ok(deck)
    }

    /// Root directory of the site the deck belongs to.
    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    /// Path of the presentation relative to the site's content directory.
    pub fn url_path(&self) -> &RelativePath {
        &self.url_path
    }

    /// Documents in deck order.
    pub fn documents(&self) -> &[SlideDocument] {
        &self.documents
    }

    pub fn position(&self, path: &Path) -> Option<usize> {
        self.documents.iter().position(|doc| doc.path() == path)
    }

    pub fn document(&self, path: &Path) -> Option<&SlideDocument> {
        self.documents.iter().find(|doc| doc.path() == path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.position(path).is_some()
    }

    /// The global slide most recently shown, if any.
    pub fn last_shown(&self) -> Option<SlideCoord> {
        self.last_shown
    }

    pub fn set_last_shown(&mut self, slide: SlideCoord) {
        self.last_shown = Some(slide);
    }

    /// How many times the document list has been sorted, including at construction.
    pub fn sort_count(&self) -> u64 {
        self.sort_count
    }

    /// Total number of horizontal slides in the deck.
    pub fn horizontal_len(&mut self) -> usize {
        let last = self.documents.len() - 1;
        let before = self.offsets()[last];
        before + self.documents[last].horizontal_count()
    }

    /// Change a document's weight, re-sorting only if it actually changed.
    ///
    /// Returns whether the deck was re-sorted.
    pub fn reweight(&mut self, path: &Path, weight: i64) -> Result<bool, DeckError> {
        let document = self
            .documents
            .iter_mut()
            .find(|doc| doc.path() == path)
            .ok_or_else(|| DeckError::UnknownDocument(path.to_path_buf()))?;

        if document.weight() == weight {
            return Ok(false);
        }
        log::debug!(
            "Re-weighting {} from {} to {weight}",
            path.display(),
            document.weight()
        );
        document.set_weight(weight);
        self.sort();
        Ok(true)
    }

    /// Horizontal offset of every document, rebuilt if stale.
    pub fn offsets(&mut self) -> &[usize] {
        self.offsets
            .get_or_insert_with(|| mapping::cumulative_offsets(&self.documents))
    }

    /// Horizontal slides contributed by the documents before `path`.
    pub fn document_offset(&mut self, path: &Path) -> Result<usize, DeckError> {
        let index = self
            .position(path)
            .ok_or_else(|| DeckError::UnknownDocument(path.to_path_buf()))?;
        Ok(self.offsets()[index])
    }

    /// Global slide containing character offset `cursor` of `path`.
    pub fn cursor_to_global(&mut self, path: &Path, cursor: usize) -> Result<SlideCoord, DeckError> {
        let offset = self.document_offset(path)?;
        let document = self
            .document(path)
            .ok_or_else(|| DeckError::UnknownDocument(path.to_path_buf()))?;
        let local = mapping::offset_to_local_slide(document.slides(), cursor)?;
        Ok(mapping::local_to_global(local.coord(), offset))
    }

    /// The document owning `global`. Leaves the deck untouched on failure.
    pub fn global_to_document(&self, global: SlideCoord) -> Result<DocumentHit, DeckError> {
        mapping::global_to_document(&self.documents, global)
    }

    /// Document and text range of `global`.
    pub fn locate(&self, global: SlideCoord) -> Result<SlideLocation, DeckError> {
        let hit = self.global_to_document(global)?;
        let document = &self.documents[hit.index];
        let range = mapping::global_to_local_range(document, global, hit.offset)?;
        Ok(SlideLocation {
            path: document.path().to_path_buf(),
            local: mapping::global_to_local(global, hit.offset)?,
            range,
        })
    }

    pub(crate) fn document_mut(&mut self, path: &Path) -> Option<&mut SlideDocument> {
        // Any caller may change the slide list, so the offsets cannot be trusted afterwards.
        self.offsets = None;
        self.documents.iter_mut().find(|doc| doc.path() == path)
    }

    fn sort(&mut self) {
        self.documents.sort_by(SlideDocument::deck_order);
        self.offsets = None;
        self.sort_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Slide;
    use pretty_assertions::assert_eq;

    const TWO_SLIDES: &str = "weight: 5\n\n---\n\nsecond\n";

    fn paths(deck: &Deck) -> Vec<PathBuf> {
        deck.documents()
            .iter()
            .map(|doc| doc.path().to_path_buf())
            .collect()
    }

    fn sample_deck() -> Deck {
        Deck::new(
            "/site",
            "talk",
            vec![
                SlideDocument::from_text("/site/content/talk/five.md", TWO_SLIDES),
                SlideDocument::from_text("/site/content/talk/undeclared.md", "plain\n"),
                SlideDocument::from_text("/site/content/talk/one.md", "weight: 1\n"),
                SlideDocument::from_text("/site/content/talk/_index.md", "weight: 9\n"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        let result = Deck::new("/site", "talk", Vec::new());
        assert_eq!(result.unwrap_err(), DeckError::EmptyDeck);
    }

    #[test]
    fn test_documents_sorted_on_construction() {
        let deck = sample_deck();

        assert_eq!(
            paths(&deck),
            vec![
                PathBuf::from("/site/content/talk/_index.md"),
                PathBuf::from("/site/content/talk/one.md"),
                PathBuf::from("/site/content/talk/five.md"),
                PathBuf::from("/site/content/talk/undeclared.md"),
            ]
        );
        assert_eq!(deck.sort_count(), 1);
        assert_eq!(deck.url_path(), RelativePath::new("talk"));
    }

    #[test]
    fn test_offsets_follow_sorted_order() {
        let mut deck = sample_deck();

        assert_eq!(deck.offsets(), &[0, 1, 2, 4]);
        assert_eq!(deck.horizontal_len(), 5);
    }

    #[test]
    fn test_cursor_to_global() {
        let mut deck = sample_deck();
        let five = Path::new("/site/content/talk/five.md");

        assert_eq!(deck.cursor_to_global(five, 0), Ok(SlideCoord::new(2, 0)));
        assert_eq!(
            deck.cursor_to_global(five, TWO_SLIDES.len()),
            Ok(SlideCoord::new(3, 0))
        );
        assert_eq!(
            deck.cursor_to_global(Path::new("/elsewhere.md"), 0),
            Err(DeckError::UnknownDocument(PathBuf::from("/elsewhere.md")))
        );
    }

    #[test]
    fn test_cursor_offsets_count_characters() {
        let text = "é\n\n---\n\nsecond\n";
        let mut deck = Deck::new(
            "/site",
            "talk",
            vec![SlideDocument::from_text("a.md", text)],
        )
        .unwrap();
        let a = Path::new("a.md");

        assert_eq!(deck.cursor_to_global(a, 6), Ok(SlideCoord::new(0, 0)));
        assert_eq!(deck.cursor_to_global(a, 7), Ok(SlideCoord::new(1, 0)));
        assert_eq!(
            deck.locate(SlideCoord::new(1, 0)).map(|location| location.range),
            Ok(7..text.chars().count())
        );
    }

    #[test]
    fn test_second_document_starts_after_first_documents_slides() {
        let mut deck = Deck::new(
            "/site",
            "talk",
            vec![
                SlideDocument::from_text("a.md", "weight: 1\n\n---\n\nb\n\n---\n\nc\n"),
                SlideDocument::from_text("b.md", "weight: 2\n"),
            ],
        )
        .unwrap();

        assert_eq!(
            deck.cursor_to_global(Path::new("b.md"), 0),
            Ok(SlideCoord::new(3, 0))
        );
    }

    #[test]
    fn test_locate() {
        let deck = sample_deck();

        assert_eq!(
            deck.locate(SlideCoord::new(3, 0)),
            Ok(SlideLocation {
                path: PathBuf::from("/site/content/talk/five.md"),
                local: SlideCoord::new(1, 0),
                range: 15..TWO_SLIDES.len(),
            })
        );
    }

    #[test]
    fn test_locate_beyond_deck_leaves_state_alone() {
        let mut deck = sample_deck();
        deck.set_last_shown(SlideCoord::new(1, 0));
        let before = paths(&deck);

        let global = SlideCoord::new(5, 0);
        assert_eq!(deck.global_to_document(global), Err(DeckError::OutOfRange(global)));
        assert_eq!(deck.locate(global), Err(DeckError::OutOfRange(global)));

        assert_eq!(paths(&deck), before);
        assert_eq!(deck.last_shown(), Some(SlideCoord::new(1, 0)));
        assert_eq!(deck.sort_count(), 1);
    }

    #[test]
    fn test_reweight_moves_document_once() {
        let mut deck = sample_deck();
        let undeclared = Path::new("/site/content/talk/undeclared.md");
        let slides_before = deck.document(undeclared).unwrap().slides().to_vec();

        assert_eq!(deck.reweight(undeclared, 0), Ok(true));

        assert_eq!(deck.position(undeclared), Some(1));
        assert_eq!(deck.document(undeclared).unwrap().slides(), slides_before);
        assert_eq!(deck.sort_count(), 2);
        assert_eq!(deck.offsets(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_reweight_with_same_weight_does_not_sort() {
        let mut deck = sample_deck();
        let one = Path::new("/site/content/talk/one.md");

        assert_eq!(deck.reweight(one, 1), Ok(false));
        assert_eq!(deck.sort_count(), 1);
    }

    #[test]
    fn test_reweight_unknown_document() {
        let mut deck = sample_deck();
        assert_eq!(
            deck.reweight(Path::new("nope.md"), 1),
            Err(DeckError::UnknownDocument(PathBuf::from("nope.md")))
        );
    }

    #[test]
    fn test_document_without_slides_keeps_its_place() {
        let mut deck = Deck::new(
            "/site",
            "talk",
            vec![
                SlideDocument::from_text("a.md", "weight: 1\n"),
                SlideDocument::with_slides("b.md", 2, Vec::new(), 10),
                SlideDocument::with_slides("c.md", 3, vec![Slide::FIRST], 4),
            ],
        )
        .unwrap();

        assert_eq!(deck.offsets(), &[0, 1, 1]);
        assert_eq!(
            deck.locate(SlideCoord::new(1, 0)).map(|loc| loc.path),
            Ok(PathBuf::from("c.md"))
        );
        assert_eq!(
            deck.cursor_to_global(Path::new("b.md"), 3),
            Err(DeckError::NoSlides)
        );
    }
}
