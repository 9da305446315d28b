use std::collections::HashMap;

use serde::Serialize;

use self::dialog::{Activation, Dialog, DialogKey};

pub mod dialog;

/// Result of [`DialogRegistry::open`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum OpenOutcome {
    /// A new dialog was registered
    Created { id: String, z_order: u32 },
    /// The key was already open; the existing dialog was raised
    Focused { id: String, z_order: u32 },
}

impl OpenOutcome {
    pub fn id(&self) -> &str {
        match self {
            OpenOutcome::Created { id, .. } | OpenOutcome::Focused { id, .. } => id,
        }
    }

    pub fn z_order(&self) -> u32 {
        match self {
            OpenOutcome::Created { z_order, .. } | OpenOutcome::Focused { z_order, .. } => *z_order,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, OpenOutcome::Created { .. })
    }
}

/// Open dialogs keyed by logical key, plus the shared z-order counter.
///
/// The only writer of both. Every creation and every focus takes the next
/// counter value, so z-orders only ever grow and the last touched dialog is
/// always on top. When the counter reaches `u32::MAX` the open dialogs are
/// renumbered from the base in their current order.
pub struct DialogRegistry {
    dialogs: HashMap<DialogKey, Dialog>,
    z_base: u32,
    z_counter: u32,
    restacked: bool,
}

impl DialogRegistry {
    pub fn new(z_base: u32) -> Self {
        Self {
            dialogs: HashMap::new(),
            z_base,
            z_counter: z_base,
            restacked: false,
        }
    }

    /// Open the dialog for `activation`, or focus it when already open.
    /// `build` is only called for a new key.
    pub fn open<F>(&mut self, activation: &Activation, build: F) -> OpenOutcome
    where
        F: FnOnce() -> Dialog,
    {
        let key = activation.key();
        if let Some(z_order) = self.focus(&key) {
            let id = self.dialogs[&key].id.clone();
            return OpenOutcome::Focused { id, z_order };
        }

        let mut dialog = build();
        debug_assert_eq!(dialog.key, key);
        dialog.z_order = self.next_z();
        let outcome = OpenOutcome::Created {
            id: dialog.id.clone(),
            z_order: dialog.z_order,
        };
        self.dialogs.insert(key, dialog);
        outcome
    }

    /// Raise an open dialog. `None` when the key is not open.
    pub fn focus(&mut self, key: &DialogKey) -> Option<u32> {
        if !self.dialogs.contains_key(key) {
            return None;
        }
        let z = self.next_z();
        let dialog = self.dialogs.get_mut(key)?;
        dialog.z_order = z;
        Some(z)
    }

    /// Remove a dialog, returning it. Closing an unknown key is a no-op.
    pub fn close(&mut self, key: &DialogKey) -> Option<Dialog> {
        self.dialogs.remove(key)
    }

    pub fn is_open(&self, key: &DialogKey) -> bool {
        self.dialogs.contains_key(key)
    }

    /// True when `key` is open and is still the instance with `id`
    pub fn is_live(&self, key: &DialogKey, id: &str) -> bool {
        self.dialogs.get(key).is_some_and(|d| d.id == id)
    }

    pub fn get(&self, key: &DialogKey) -> Option<&Dialog> {
        self.dialogs.get(key)
    }

    pub fn get_mut(&mut self, key: &DialogKey) -> Option<&mut Dialog> {
        self.dialogs.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    pub fn dialogs(&self) -> impl Iterator<Item = &Dialog> {
        self.dialogs.values()
    }

    pub fn dialogs_mut(&mut self) -> impl Iterator<Item = &mut Dialog> {
        self.dialogs.values_mut()
    }

    /// Dialogs bottom to top
    pub fn stacked(&self) -> Vec<&Dialog> {
        let mut all: Vec<&Dialog> = self.dialogs.values().collect();
        all.sort_by_key(|d| d.z_order);
        all
    }

    /// Whether every open dialog was renumbered since the last call
    pub fn take_restacked(&mut self) -> bool {
        std::mem::take(&mut self.restacked)
    }

    fn next_z(&mut self) -> u32 {
        if self.z_counter == u32::MAX {
            self.restack();
        }
        self.z_counter += 1;
        self.z_counter
    }

    fn restack(&mut self) {
        log::warn!(
            "[Dialog] z-order counter exhausted, restacking {} dialogs from {}",
            self.dialogs.len(),
            self.z_base
        );
        let mut order: Vec<(u32, DialogKey)> = self
            .dialogs
            .values()
            .map(|d| (d.z_order, d.key.clone()))
            .collect();
        order.sort_by_key(|(z, _)| *z);

        self.z_counter = self.z_base;
        for (_, key) in order {
            self.z_counter += 1;
            if let Some(dialog) = self.dialogs.get_mut(&key) {
                dialog.z_order = self.z_counter;
            }
        }
        self.restacked = true;
    }

    #[cfg(test)]
    fn with_counter(z_base: u32, z_counter: u32) -> Self {
        Self {
            z_counter,
            ..Self::new(z_base)
        }
    }
}
