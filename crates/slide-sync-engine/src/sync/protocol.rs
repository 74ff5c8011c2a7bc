//! Messages exchanged with the rendering surface.

use relative_path::RelativePath;
use serde::{Deserialize, Serialize};

use crate::models::SlideCoord;

#[derive(Debug, thiserror::Error)]
#[error("Malformed message from viewer: {0}")]
pub struct ProtocolError(#[from] serde_json::Error);

/// Sent to the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostMessage {
    ShowSlide { slide: SlideCoord },
}

impl HostMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Received from the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewerMessage {
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[serde(default)]
    pub state: Option<ViewerState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ViewerState {
    pub indexh: usize,
    #[serde(default)]
    pub indexv: usize,
}

impl ViewerMessage {
    pub const SLIDE_CHANGED: &'static str = "slidechanged";

    pub fn parse(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The slide the viewer moved to, if this is a slide change.
    pub fn slide_changed(&self) -> Option<SlideCoord> {
        if self.event_name != Self::SLIDE_CHANGED {
            return None;
        }
        self.state
            .map(|state| SlideCoord::new(state.indexh, state.indexv))
    }
}

/// URL of `slide` in a deck served at `base`.
pub fn preview_url(base: &str, url_path: &RelativePath, slide: SlideCoord) -> String {
    format!(
        "{}/{}#/{}/{}",
        base.trim_end_matches('/'),
        url_path,
        slide.horizontal,
        slide.vertical
    )
}
