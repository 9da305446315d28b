// Pointer drag controller for desktop icons and dialogs
// Tracks pointer deltas and moves the owning element; stacking is applied by the shell

pub mod stacking;
pub mod types;

pub use types::*;

use serde::Serialize;

use crate::geometry::{Point, Rect, Size};

/// Drag behavior attached to one on-screen element.
///
/// The controller never owns the element position; callers pass it in on
/// every move so icons and dialogs can keep their own records.
#[derive(Debug, Clone, Serialize)]
pub struct Draggable {
    category: StackCategory,
    enabled: bool,
    state: DragState,
    last_pointer: Option<Point>,
    moved: bool,
    excluded: Vec<HitRegion>,
    containment: Option<Rect>,
}

impl Draggable {
    /// Attach drag behavior. The compact predicate is evaluated once, here;
    /// on a compact viewport every later call is a no-op.
    pub fn attach(
        category: StackCategory,
        viewport: Size,
        compact: CompactPredicate,
        excluded: &[HitRegion],
    ) -> Self {
        Self {
            category,
            enabled: !compact.matches(viewport),
            state: DragState::Idle,
            last_pointer: None,
            moved: false,
            excluded: excluded.to_vec(),
            containment: None,
        }
    }

    /// Inert behavior for an element that is not interactive yet
    pub fn detached(category: StackCategory) -> Self {
        Self {
            category,
            enabled: false,
            state: DragState::Idle,
            last_pointer: None,
            moved: false,
            excluded: Vec::new(),
            containment: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Whether a press on `region` may start a drag
    pub fn accepts(&self, region: HitRegion) -> bool {
        !self.excluded.contains(&region)
    }

    pub fn set_containment(&mut self, bounds: Option<Rect>) {
        self.containment = bounds;
    }

    /// Returns true when a drag started
    pub fn pointer_down(&mut self, pointer: Point, region: HitRegion) -> bool {
        if !self.enabled || !self.accepts(region) {
            return false;
        }
        self.state = DragState::Dragging;
        self.last_pointer = Some(pointer);
        self.moved = false;
        true
    }

    /// Apply the pointer delta to `position`. Returns true when it changed.
    pub fn pointer_move(&mut self, pointer: Point, position: &mut Point, size: Size) -> bool {
        if self.state != DragState::Dragging {
            return false;
        }
        let Some(last) = self.last_pointer.replace(pointer) else {
            return false;
        };

        let (dx, dy) = pointer.delta_from(last);
        let before = *position;
        position.translate(dx, dy);
        if let Some(bounds) = self.containment {
            *position = bounds.clamp_origin(*position, size);
        }

        let changed = *position != before;
        self.moved |= changed;
        changed
    }

    /// Pointer released or left the viewport
    pub fn pointer_up(&mut self) -> Option<DragRelease> {
        if self.state != DragState::Dragging {
            return None;
        }
        self.state = DragState::Idle;
        self.last_pointer = None;
        Some(DragRelease { moved: self.moved })
    }
}
