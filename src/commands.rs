// Tauri commands: the page reports pointer input and measurements, the shell
// answers through SurfaceEvents emitted on the app handle

use tauri::State;

use crate::content::HttpFetcher;
use crate::desktop::shortcut::ShortcutSpec;
use crate::drag::HitRegion;
use crate::error::DesktopError;
use crate::geometry::{Point, Rect, Size};
use crate::lifecycle::Shell;
use crate::meter::UsageReport;
use crate::prefs::PreferenceStore;
use crate::state::dialog::{Activation, Dialog, DialogKey};
use crate::state::OpenOutcome;
use crate::surface::TauriSurface;

pub type DesktopShell = Shell<TauriSurface, HttpFetcher>;

// ===== Desktop surface =====

#[tauri::command]
pub fn set_viewport(width: f64, height: f64, shell: State<DesktopShell>) -> Result<(), DesktopError> {
    shell.set_viewport(Size::new(width, height))
}

#[tauri::command]
pub fn set_desktop_bounds(bounds: Rect, shell: State<DesktopShell>) -> Result<(), DesktopError> {
    shell.set_desktop_bounds(bounds)
}

#[tauri::command]
pub fn register_icon(spec: ShortcutSpec, shell: State<DesktopShell>) -> Result<(), DesktopError> {
    shell.register_icon(spec)
}

#[tauri::command]
pub fn icon_pointer_down(
    id: String,
    pointer: Point,
    shell: State<DesktopShell>,
) -> Result<(), DesktopError> {
    shell.icon_pointer_down(&id, pointer)
}

/// Click on a shortcut; `None` when the click was swallowed or the shortcut
/// is an external link
#[tauri::command]
pub fn activate_icon(
    id: String,
    shell: State<DesktopShell>,
) -> Result<Option<OpenOutcome>, DesktopError> {
    shell.activate_icon(&id)
}

// ===== Dialogs =====

#[tauri::command]
pub fn open_dialog(
    activation: Activation,
    shell: State<DesktopShell>,
) -> Result<OpenOutcome, DesktopError> {
    shell.open(activation)
}

#[tauri::command]
pub fn focus_dialog(key: DialogKey, shell: State<DesktopShell>) -> Result<Option<u32>, DesktopError> {
    shell.focus(&key)
}

#[tauri::command]
pub fn close_dialog(key: DialogKey, shell: State<DesktopShell>) -> Result<bool, DesktopError> {
    shell.close(&key)
}

#[tauri::command]
pub fn is_dialog_open(key: DialogKey, shell: State<DesktopShell>) -> Result<bool, DesktopError> {
    shell.is_open(&key)
}

#[tauri::command]
pub fn list_dialogs(shell: State<DesktopShell>) -> Result<Vec<Dialog>, DesktopError> {
    shell.dialogs()
}

#[tauri::command]
pub fn dialog_measured(
    key: DialogKey,
    width: f64,
    height: f64,
    shell: State<DesktopShell>,
) -> Result<(), DesktopError> {
    shell.dialog_measured(&key, Size::new(width, height))
}

#[tauri::command]
pub fn dialog_pointer_down(
    key: DialogKey,
    pointer: Point,
    region: HitRegion,
    shell: State<DesktopShell>,
) -> Result<(), DesktopError> {
    shell.dialog_pointer_down(&key, pointer, region)
}

// ===== Pointer =====

#[tauri::command]
pub fn pointer_move(pointer: Point, shell: State<DesktopShell>) -> Result<(), DesktopError> {
    shell.pointer_move(pointer)
}

#[tauri::command]
pub fn pointer_up(shell: State<DesktopShell>) -> Result<(), DesktopError> {
    shell.pointer_up()
}

// ===== Taskbar =====

#[tauri::command]
pub fn usage_report(shell: State<DesktopShell>) -> Result<UsageReport, DesktopError> {
    shell.usage()
}

#[tauri::command]
pub async fn get_theme(prefs: State<'_, PreferenceStore>) -> Result<bool, DesktopError> {
    Ok(prefs.dark_mode().await)
}

#[tauri::command]
pub async fn toggle_theme(prefs: State<'_, PreferenceStore>) -> Result<bool, DesktopError> {
    Ok(prefs.toggle_theme().await?)
}
