use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::Deck;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeckId(u64);

/// Open decks, and which deck each document path belongs to.
///
/// A document belongs to at most one deck. Removing a deck releases all of
/// its documents at once.
#[derive(Debug, Default)]
pub struct DeckRegistry {
    decks: BTreeMap<DeckId, Deck>,
    owners: BTreeMap<PathBuf, DeckId>,
    next_id: u64,
}

impl DeckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a deck and every document in it.
    pub fn insert(&mut self, deck: Deck) -> DeckId {
        let id = DeckId(self.next_id);
        self.next_id += 1;

        for document in deck.documents() {
            if let Some(previous) = self.owners.insert(document.path().to_path_buf(), id) {
                log::warn!(
                    "{} moved from deck {previous:?} to deck {id:?}",
                    document.path().display()
                );
            }
        }
        self.decks.insert(id, deck);
        id
    }

    /// The deck owning `path`, if any.
    pub fn deck_for(&self, path: &Path) -> Option<DeckId> {
        self.owners.get(path).copied()
    }

    pub fn get(&self, id: DeckId) -> Option<&Deck> {
        self.decks.get(&id)
    }

    pub fn get_mut(&mut self, id: DeckId) -> Option<&mut Deck> {
        self.decks.get_mut(&id)
    }

    /// Remove a deck and release every document path that pointed at it.
    pub fn remove(&mut self, id: DeckId) -> Option<Deck> {
        let deck = self.decks.remove(&id)?;
        self.owners.retain(|_, owner| *owner != id);
        Some(deck)
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = DeckId> + '_ {
        self.decks.keys().copied()
    }
}
