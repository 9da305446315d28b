// Window and dialog management core for the simulated desktop
pub mod audio;
pub mod config;
pub mod content;
pub mod desktop;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod lifecycle;
pub mod meter;
pub mod prefs;
pub mod state;
pub mod surface;

// Tauri commands for the web view
#[cfg(feature = "desktop")]
mod commands;

pub use config::DesktopConfig;
pub use content::{ContentLoader, Fetch, HttpFetcher};
pub use desktop::shortcut::{ShortcutSpec, ShortcutTarget};
pub use error::{DesktopError, LoadError};
pub use lifecycle::Shell;
pub use state::dialog::{Activation, ContentKind, DialogContent, DialogKey, DialogPhase};
pub use state::{DialogRegistry, OpenOutcome};
pub use surface::{Surface, SurfaceEvent};

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::Manager;

    #[cfg(not(feature = "audio"))]
    use {
        audio::{Silent, SoundCue},
        std::sync::Arc,
    };
    use prefs::PreferenceStore;
    use surface::TauriSurface;

    let _ = env_logger::try_init();
    let config = DesktopConfig::load_or_default();

    // The output stream must outlive the app; it cannot move into managed state.
    #[cfg(feature = "audio")]
    let (sound, _stream) = open_sound(&config);
    #[cfg(not(feature = "audio"))]
    let sound: Arc<dyn SoundCue> = Arc::new(Silent);

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(move |app| {
            let fetcher = HttpFetcher::new(&config.content)?;
            let runtime =
                tauri::async_runtime::block_on(async { tokio::runtime::Handle::current() });

            let prefs_dir = app.path().app_data_dir()?;
            app.manage(PreferenceStore::new(prefs_dir, &config.prefs));

            let surface = TauriSurface::new(app.handle().clone());
            app.manage(Shell::new(config, surface, fetcher, sound, runtime));

            log::info!("[Desktop] Shell initialized");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Desktop surface
            commands::set_viewport,
            commands::set_desktop_bounds,
            commands::register_icon,
            commands::icon_pointer_down,
            commands::activate_icon,
            // Dialogs
            commands::open_dialog,
            commands::focus_dialog,
            commands::close_dialog,
            commands::is_dialog_open,
            commands::list_dialogs,
            commands::dialog_measured,
            commands::dialog_pointer_down,
            // Pointer
            commands::pointer_move,
            commands::pointer_up,
            // Taskbar
            commands::usage_report,
            commands::get_theme,
            commands::toggle_theme,
        ])
        .run(tauri::generate_context!())
        .unwrap_or_else(|e| log::error!("[Desktop] Error while running tauri application: {}", e));
}

#[cfg(all(feature = "desktop", feature = "audio"))]
fn open_sound(
    config: &DesktopConfig,
) -> (std::sync::Arc<dyn audio::SoundCue>, Option<rodio::OutputStream>) {
    use std::sync::Arc;

    if !config.audio.enabled {
        return (Arc::new(audio::Silent), None);
    }
    match audio::sfx::SfxEngine::open_default(&config.audio) {
        Ok((engine, stream)) => (Arc::new(engine), Some(stream)),
        Err(e) => {
            log::warn!("[Audio] {}; continuing without sound", e);
            (Arc::new(audio::Silent), None)
        }
    }
}
