use serde::{Deserialize, Serialize};
use std::fmt;

use crate::drag::Draggable;
use crate::geometry::{Point, Size};

/// Logical identity of a dialog, derived from its display title
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogKey(String);

impl DialogKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DialogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DialogKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// How a dialog's payload is shown, declared by the activating link
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    /// Text fetched by the shell and wrapped in the text style
    InlineText,
    /// Sub-document embedded by the page itself
    FramedDocument,
}

/// A shortcut or link activation: what to open and under which key
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    /// Display title; doubles as the logical key
    pub title: String,
    /// Resource locator of the content
    pub locator: String,
    pub kind: ContentKind,
}

impl Activation {
    pub fn new(title: impl Into<String>, locator: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            title: title.into(),
            locator: locator.into(),
            kind,
        }
    }

    pub fn key(&self) -> DialogKey {
        DialogKey::new(self.title.clone())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogPhase {
    /// Node mounted, waiting for its measured size
    Creating,
    /// Positioned in the middle of the viewport
    Centered,
    Interactive,
    Dragging,
    Closing,
    Closed,
}

/// Ready-to-mount content region of a dialog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DialogContent {
    /// Inline text fetch still pending
    Loading,
    Text { text: String, style: String },
    Frame { src: String },
    /// Inline text could not be loaded
    Error { message: String, style: String },
}

impl DialogContent {
    pub fn is_loading(&self) -> bool {
        matches!(self, DialogContent::Loading)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Dialog {
    pub id: String,          // Unique UUID, DOM identity of the node
    pub key: DialogKey,      // Logical key (title)
    pub title: String,       // Full title; the node reveals it gradually
    pub locator: String,     // Resource the content came from
    pub kind: ContentKind,
    pub content: DialogContent,
    pub phase: DialogPhase,
    pub position: Point,
    pub size: Option<Size>,  // Measured by the page after mount
    pub z_order: u32,        // Assigned by the registry only
    pub drag: Draggable,
}
