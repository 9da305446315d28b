// Taskbar "memory" readout. Not a real measurement: a score derived from
// what is open on the desktop, kept between BASE_PERCENT and 100.

use serde::Serialize;

use crate::state::dialog::{Dialog, DialogContent};

const BASE_PERCENT: f64 = 15.0;
const MAX_PERCENT: f64 = 100.0;
const TEXT_DIALOG_BASE: f64 = 2.0;
const CHARS_PER_PERCENT: f64 = 2000.0;
const FRAME_DIALOG_BASE: f64 = 8.0;
const AREA_PER_PERCENT: f64 = 100_000.0;
const PER_ANIMATION: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageReport {
    pub percentage: u32,
    pub active_dialogs: usize,
    pub active_animations: usize,
}

/// Score contributed by one dialog. Framed documents weigh more than text and
/// grow with their measured area.
pub fn dialog_weight(dialog: &Dialog) -> f64 {
    let score = match &dialog.content {
        DialogContent::Text { text, .. } => {
            TEXT_DIALOG_BASE + text.chars().count() as f64 / CHARS_PER_PERCENT
        }
        DialogContent::Loading | DialogContent::Error { .. } => TEXT_DIALOG_BASE,
        DialogContent::Frame { .. } => {
            let area = dialog.size.map(|s| s.area()).unwrap_or(0.0);
            FRAME_DIALOG_BASE + area / AREA_PER_PERCENT
        }
    };
    score.round()
}

pub fn sample<'a, I>(dialogs: I, active_animations: usize) -> UsageReport
where
    I: IntoIterator<Item = &'a Dialog>,
{
    let mut percentage = BASE_PERCENT;
    let mut active_dialogs = 0;
    for dialog in dialogs {
        percentage += dialog_weight(dialog);
        active_dialogs += 1;
    }
    percentage += active_animations as f64 * PER_ANIMATION;

    UsageReport {
        percentage: percentage.round().clamp(BASE_PERCENT, MAX_PERCENT) as u32,
        active_dialogs,
        active_animations,
    }
}
