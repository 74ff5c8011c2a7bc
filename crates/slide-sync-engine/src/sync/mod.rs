//! Keeps an editor and a slide viewer pointed at the same slide.

pub mod changes;
pub mod protocol;
pub mod session;

pub use changes::{TextChange, apply_text_change};
pub use protocol::{HostMessage, ProtocolError, ViewerMessage, ViewerState, preview_url};
pub use session::{EditorFocus, EditorView, SyncSession};
