use serde::{Deserialize, Serialize};

use crate::drag::Draggable;
use crate::geometry::{Point, Size};
use crate::state::dialog::Activation;

/// What a shortcut does when clicked
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ShortcutTarget {
    Dialog(Activation),
    External { url: String },
}

/// Shortcut as described by the page when it registers its icons
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShortcutSpec {
    pub id: String,
    pub position: Point,
    pub size: Size,
    pub target: ShortcutTarget,
}

/// A desktop icon. Icons are never removed, only moved.
#[derive(Clone, Debug, Serialize)]
pub struct Shortcut {
    pub id: String,
    pub position: Point,
    pub size: Size,
    pub target: ShortcutTarget,
    pub z_order: u32,
    pub drag: Draggable,
    /// Set when a drag moved the icon; swallows the click that ends it
    pub suppress_click: bool,
}

impl Shortcut {
    pub fn new(spec: ShortcutSpec, z_order: u32, drag: Draggable) -> Self {
        Self {
            id: spec.id,
            position: spec.position,
            size: spec.size,
            target: spec.target,
            z_order,
            drag,
            suppress_click: false,
        }
    }

    /// Consume the click-suppression flag. Returns true if the click should
    /// activate the shortcut.
    pub fn take_click(&mut self) -> bool {
        !std::mem::take(&mut self.suppress_click)
    }
}
