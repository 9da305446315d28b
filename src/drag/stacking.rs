// Resting and lifted z-index for each stacking category

use crate::config::StackingConfig;

/// z-index an icon returns to after a drag. Dialogs have no fixed resting
/// value: they keep whatever the registry assigned them.
pub fn icon_resting_z(config: &StackingConfig) -> u32 {
    config.icon_resting_z
}

pub fn icon_lifted_z(config: &StackingConfig) -> u32 {
    config.icon_lifted_z
}
