use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::io::{self, OpenError};
use crate::mapping;
use crate::models::{Deck, DeckError, DeckId, DeckRegistry, SlideCoord};
use crate::sync::changes::{TextChange, apply_text_change};
use crate::sync::protocol::{HostMessage, ProtocolError, ViewerMessage};

/// Read access to the editor's open documents.
pub trait EditorView {
    /// Cursor character offset in `path`, or `None` if no visible editor shows it.
    fn cursor(&self, path: &Path) -> Option<usize>;
}

impl EditorView for HashMap<PathBuf, usize> {
    fn cursor(&self, path: &Path) -> Option<usize> {
        self.get(path).copied()
    }
}

/// Where the editor should move to show a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorFocus {
    pub path: PathBuf,
    /// Text of the slide; the cursor goes to its start.
    pub range: Range<usize>,
}

/// Coordinates editor events and viewer events for every open deck.
///
/// Each call runs to completion, so a text change is fully applied before
/// the next cursor or viewer event reads the deck.
#[derive(Debug, Default)]
pub struct SyncSession {
    registry: DeckRegistry,
}

impl SyncSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &DeckRegistry {
        &self.registry
    }

    pub fn deck(&self, id: DeckId) -> Option<&Deck> {
        self.registry.get(id)
    }

    pub fn deck_for(&self, path: &Path) -> Option<DeckId> {
        self.registry.deck_for(path)
    }

    /// Open the deck containing `path`, reusing it if it is already open.
    ///
    /// `text` is the editor's current text for `path`; sibling files are read
    /// from disk. Returns the deck and the slide under `cursor`, which becomes
    /// the deck's shown slide.
    pub fn open(
        &mut self,
        path: &Path,
        text: &str,
        cursor: usize,
    ) -> Result<(DeckId, Option<SlideCoord>), OpenError> {
        let id = match self.registry.deck_for(path) {
            Some(id) => id,
            None => {
                let deck = io::load_deck(path, text)?;
                log::info!(
                    "Opened deck '{}' with {} documents",
                    deck.url_path(),
                    deck.documents().len()
                );
                self.registry.insert(deck)
            }
        };

        let Some(deck) = self.registry.get_mut(id) else {
            return Ok((id, None));
        };
        let shown = cursor_slide(deck, path, cursor);
        if let Some(slide) = shown {
            deck.set_last_shown(slide);
        }
        Ok((id, shown))
    }

    /// The cursor moved in `path`. Returns a message for the viewer if the
    /// cursor is now on a different slide from the one last shown.
    pub fn cursor_moved(&mut self, path: &Path, cursor: usize) -> Option<HostMessage> {
        let id = self.registry.deck_for(path)?;
        let deck = self.registry.get_mut(id)?;
        let slide = cursor_slide(deck, path, cursor)?;

        if deck.last_shown() == Some(slide) {
            return None;
        }
        log::debug!("Cursor at {} {cursor} shows slide {slide}", path.display());
        deck.set_last_shown(slide);
        Some(HostMessage::ShowSlide { slide })
    }

    /// The text of `path` changed. Documents outside any open deck are ignored.
    pub fn text_changed(&mut self, path: &Path, text: &str) -> Option<TextChange> {
        let id = self.registry.deck_for(path)?;
        let deck = self.registry.get_mut(id)?;
        match apply_text_change(deck, path, text) {
            Ok(change) => {
                if change.resorted {
                    log::debug!("Re-sorted deck '{}' after editing {}", deck.url_path(), path.display());
                }
                Some(change)
            }
            Err(e) => {
                log::error!("Failed to apply change to {}: {e}", path.display());
                None
            }
        }
    }

    /// The viewer moved to `global`. Returns where the editor should go, or
    /// `None` if nothing needs to change.
    pub fn slide_changed(
        &mut self,
        id: DeckId,
        global: SlideCoord,
        editor: &dyn EditorView,
    ) -> Option<EditorFocus> {
        let deck = self.registry.get_mut(id)?;
        if deck.last_shown() == Some(global) {
            return None;
        }
        deck.set_last_shown(global);

        let location = match deck.locate(global) {
            Ok(location) => location,
            Err(e) => {
                log::debug!("Ignoring viewer slide {global}: {e}");
                return None;
            }
        };
        let cursor = editor.cursor(&location.path)?;

        let slides = deck.document(&location.path)?.slides();
        match mapping::offset_to_local_slide(slides, cursor) {
            Ok(current) if current.coord() == location.local => return None,
            Ok(_) => {}
            Err(e) => log::error!("Cursor lookup failed in {}: {e}", location.path.display()),
        }

        Some(EditorFocus {
            path: location.path,
            range: location.range,
        })
    }

    /// Handle a raw JSON message from the viewer of deck `id`.
    pub fn handle_viewer_message(
        &mut self,
        id: DeckId,
        json: &str,
        editor: &dyn EditorView,
    ) -> Result<Option<EditorFocus>, ProtocolError> {
        let message = ViewerMessage::parse(json)?;
        Ok(message
            .slide_changed()
            .and_then(|global| self.slide_changed(id, global, editor)))
    }

    /// Close a deck, releasing all of its documents.
    pub fn close(&mut self, id: DeckId) -> Option<Deck> {
        let deck = self.registry.remove(id)?;
        log::info!("Closed deck '{}'", deck.url_path());
        Some(deck)
    }
}

/// Global slide under `cursor`, falling back to the document's first slide
/// if it has no slide list.
fn cursor_slide(deck: &mut Deck, path: &Path, cursor: usize) -> Option<SlideCoord> {
    match deck.cursor_to_global(path, cursor) {
        Ok(slide) => Some(slide),
        Err(DeckError::NoSlides) => {
            log::error!("{} has no slides; using its first slide", path.display());
            let offset = deck.document_offset(path).ok()?;
            Some(mapping::local_to_global(SlideCoord::FIRST, offset))
        }
        Err(e) => {
            log::debug!("No slide for cursor in {}: {e}", path.display());
            None
        }
    }
}
