// Desktop surface: the root container that owns icon positions and the
// coordinate space dialogs are dragged in

use std::collections::HashMap;

use self::shortcut::{Shortcut, ShortcutSpec};
use crate::config::{DragConfig, StackingConfig};
use crate::drag::{stacking, CompactPredicate, Draggable, StackCategory};
use crate::geometry::{Rect, Size};

pub mod shortcut;

pub struct DesktopSurface {
    viewport: Size,
    /// Desktop root rectangle; icons are contained in it while dragged
    bounds: Rect,
    icons: HashMap<String, Shortcut>,
}

impl DesktopSurface {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            bounds: Rect::from_size(viewport),
            icons: HashMap::new(),
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Viewport as a rectangle; dialogs are contained in it
    pub fn viewport_rect(&self) -> Rect {
        Rect::from_size(self.viewport)
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        for icon in self.icons.values_mut() {
            icon.drag.set_containment(Some(bounds));
        }
    }

    /// Register a pre-existing shortcut element. Re-registering an id
    /// replaces the previous record.
    pub fn register_icon(
        &mut self,
        spec: ShortcutSpec,
        drag_config: &DragConfig,
        stacking_config: &StackingConfig,
    ) -> &Shortcut {
        let mut drag = Draggable::attach(
            StackCategory::Icon,
            self.viewport,
            CompactPredicate::new(drag_config.compact_max_width),
            &[],
        );
        drag.set_containment(Some(self.bounds));

        let id = spec.id.clone();
        let icon = Shortcut::new(spec, stacking::icon_resting_z(stacking_config), drag);
        self.icons.insert(id.clone(), icon);
        &self.icons[&id]
    }

    pub fn icon_mut(&mut self, id: &str) -> Option<&mut Shortcut> {
        self.icons.get_mut(id)
    }
}
