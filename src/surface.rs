// The page-facing side of the desktop. Every DOM change the core wants is
// expressed as a SurfaceEvent; the host decides how to apply it.

use serde::Serialize;

use crate::drag::DragState;
use crate::geometry::Point;
use crate::state::dialog::{ContentKind, DialogContent};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SurfaceEvent {
    /// Append a dialog node (header with empty title + close control, content
    /// region) to the document body
    DialogMounted {
        id: String,
        key: String,
        kind: ContentKind,
        content: DialogContent,
        z_order: u32,
    },
    /// Typing animation frame for the dialog header
    DialogTitle { id: String, text: String },
    DialogContent { id: String, content: DialogContent },
    DialogMoved { id: String, position: Point },
    DialogRaised { id: String, z_order: u32 },
    DialogDrag { id: String, state: DragState },
    DialogRemoved { id: String },
    IconMoved { id: String, position: Point },
    IconStacked { id: String, z_order: u32 },
    IconDrag { id: String, state: DragState },
    /// Page-level background scroll lock
    ScrollLock { engaged: bool },
    ExternalLink { url: String },
}

impl SurfaceEvent {
    /// Event name the web view listens for
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceEvent::DialogMounted { .. } => "dialog-mounted",
            SurfaceEvent::DialogTitle { .. } => "dialog-title",
            SurfaceEvent::DialogContent { .. } => "dialog-content",
            SurfaceEvent::DialogMoved { .. } => "dialog-moved",
            SurfaceEvent::DialogRaised { .. } => "dialog-raised",
            SurfaceEvent::DialogDrag { .. } => "dialog-drag",
            SurfaceEvent::DialogRemoved { .. } => "dialog-removed",
            SurfaceEvent::IconMoved { .. } => "icon-moved",
            SurfaceEvent::IconStacked { .. } => "icon-stacked",
            SurfaceEvent::IconDrag { .. } => "icon-drag",
            SurfaceEvent::ScrollLock { .. } => "scroll-lock",
            SurfaceEvent::ExternalLink { .. } => "external-link",
        }
    }

    /// Id of the dialog node this event writes to, if any
    pub fn dialog_id(&self) -> Option<&str> {
        match self {
            SurfaceEvent::DialogMounted { id, .. }
            | SurfaceEvent::DialogTitle { id, .. }
            | SurfaceEvent::DialogContent { id, .. }
            | SurfaceEvent::DialogMoved { id, .. }
            | SurfaceEvent::DialogRaised { id, .. }
            | SurfaceEvent::DialogDrag { id, .. }
            | SurfaceEvent::DialogRemoved { id } => Some(id),
            _ => None,
        }
    }
}

/// Sink for page writes. Called with the session lock held, so
/// implementations must not call back into the shell.
pub trait Surface: Send + Sync + 'static {
    fn apply(&self, event: SurfaceEvent);
}

#[cfg(feature = "desktop")]
pub use self::tauri_surface::TauriSurface;

#[cfg(feature = "desktop")]
mod tauri_surface {
    use super::{Surface, SurfaceEvent};
    use tauri::{AppHandle, Emitter};
    use tauri_plugin_opener::OpenerExt;

    /// Emits surface events to the web view
    pub struct TauriSurface {
        app: AppHandle,
    }

    impl TauriSurface {
        pub fn new(app: AppHandle) -> Self {
            Self { app }
        }
    }

    impl Surface for TauriSurface {
        fn apply(&self, event: SurfaceEvent) {
            if let SurfaceEvent::ExternalLink { url } = &event {
                if let Err(e) = self.app.opener().open_url(url.as_str(), None::<&str>) {
                    log::warn!("[Surface] Failed to open {}: {}", url, e);
                }
            }
            if let Err(e) = self.app.emit(event.name(), &event) {
                log::warn!("[Surface] Failed to emit {}: {}", event.name(), e);
            }
        }
    }
}
