// Core data structures for pointer dragging

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Stacking category. Icons and dialogs are raised only among their own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StackCategory {
    Icon,
    Dialog,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Part of an element that received the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HitRegion {
    /// Dialog title bar
    Header,
    /// Dialog content region, or the whole of an icon
    Body,
    /// Dialog close button
    CloseControl,
    /// Embedded sub-document of a framed dialog
    FramedContent,
}

/// Compact/mobile viewport test, the equivalent of `(max-width: Npx)`.
/// Height is deliberately ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompactPredicate {
    pub max_width: f64,
}

impl CompactPredicate {
    pub fn new(max_width: f64) -> Self {
        Self { max_width }
    }

    pub fn matches(&self, viewport: Size) -> bool {
        viewport.width <= self.max_width
    }
}

/// Reported when a drag ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragRelease {
    /// The element position changed at least once during the drag
    pub moved: bool,
}
