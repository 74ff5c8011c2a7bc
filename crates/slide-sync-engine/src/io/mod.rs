//! Finding a deck's files on disk and loading them.
//!
//! A deck lives under a site's `content` directory. Its root is the nearest
//! directory holding an index document; its files are every Markdown file
//! below that root, except those under a subdirectory with its own index.

use relative_path::RelativePathBuf;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::models::{Deck, DeckError, SlideDocument};
use crate::parsing::INDEX_FILE_NAMES;

/// Name of the site directory holding all content.
pub const CONTENT_DIR: &str = "content";
/// Directory whose files join the index of the content root.
pub const HOME_DIR: &str = "home";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not a markdown file inside a site content directory: {0}")]
    NotInSite(PathBuf),
    #[error("No _index.md or index.md above {0}")]
    NoIndex(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Where a deck lives within its site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckLocation {
    pub site_root: PathBuf,
    /// Nearest directory above the file holding an index document.
    pub deck_dir: PathBuf,
    /// `deck_dir` relative to the content directory.
    pub url_path: RelativePathBuf,
}

impl DeckLocation {
    pub fn content_dir(&self) -> PathBuf {
        self.site_root.join(CONTENT_DIR)
    }

    fn is_content_root(&self) -> bool {
        self.deck_dir == self.content_dir()
    }
}

/// Read a markdown file and return its content
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Whether `dir` holds an index document.
pub fn has_index(dir: &Path) -> bool {
    INDEX_FILE_NAMES.iter().any(|name| dir.join(name).is_file())
}

/// Find the site and deck directory a markdown file belongs to.
///
/// The site root is everything before the last `content` component. The
/// search for an index document stops at the content directory.
pub fn locate_deck(file: &Path) -> Result<DeckLocation, IoError> {
    let not_in_site = || IoError::NotInSite(file.to_path_buf());

    if file.extension().is_none_or(|ext| ext != "md") {
        return Err(not_in_site());
    }
    let components: Vec<Component> = file.components().collect();
    let content_at = components[..components.len().saturating_sub(1)]
        .iter()
        .rposition(|c| c.as_os_str() == CONTENT_DIR)
        .ok_or_else(not_in_site)?;
    let site_root: PathBuf = components[..content_at].iter().collect();
    let content_dir = site_root.join(CONTENT_DIR);

    let mut dir = file.parent().ok_or_else(not_in_site)?;
    while !has_index(dir) {
        if dir == content_dir {
            return Err(IoError::NoIndex(file.to_path_buf()));
        }
        dir = dir.parent().ok_or_else(|| IoError::NoIndex(file.to_path_buf()))?;
    }

    let relative = dir.strip_prefix(&content_dir).map_err(|_| not_in_site())?;
    let url_path = RelativePathBuf::from_path(relative).map_err(|_| not_in_site())?;
    Ok(DeckLocation {
        site_root,
        deck_dir: dir.to_path_buf(),
        url_path,
    })
}

/// List the markdown files of a deck, sorted by path.
pub fn scan_deck_files(location: &DeckLocation) -> Result<Vec<PathBuf>, IoError> {
    let mut files = Vec::new();
    if location.is_content_root() {
        // Only the site index and the home section belong to the root deck.
        let index = location.deck_dir.join(INDEX_FILE_NAMES[0]);
        if index.is_file() {
            files.push(index);
        }
        let home = location.deck_dir.join(HOME_DIR);
        if home.is_dir() {
            scan_directory_recursive(&home, &mut files)?;
        }
    } else {
        scan_directory_recursive(&location.deck_dir, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            // A subdirectory with its own index is a separate deck.
            if !has_index(&path) {
                scan_directory_recursive(&path, files)?;
            }
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            files.push(path);
        }
    }

    Ok(())
}

/// Load the deck containing `file`.
///
/// `editor_text` is used for `file` itself; every other document is read from
/// disk. Documents that cannot be read are left out.
pub fn load_deck(file: &Path, editor_text: &str) -> Result<Deck, OpenError> {
    let location = locate_deck(file)?;
    let documents = scan_deck_files(&location)?
        .into_iter()
        .filter_map(|path| {
            if path == file {
                return Some(SlideDocument::from_text(path, editor_text));
            }
            match read_file(&path) {
                Ok(text) => Some(SlideDocument::from_text(path, &text)),
                Err(e) => {
                    log::warn!("Skipping {}: {e}", path.display());
                    None
                }
            }
        })
        .collect();

    Ok(Deck::new(location.site_root, location.url_path, documents)?)
}
