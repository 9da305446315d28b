//! Dialog lifecycle controller
//!
//! [`Shell`] owns the desktop session (registry, desktop surface, scroll lock,
//! in-flight tasks) and drives every dialog through
//! `Creating → Centered → Interactive ⇄ Dragging → Closing → Closed`.
//!
//! All page writes happen with the session lock held. Background work (title
//! typing, text fetches) re-takes the lock and checks that its dialog
//! instance is still open before writing, and close aborts that work, so a
//! closed dialog is never written to again.

pub mod scroll;
pub mod typing;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use uuid::Uuid;

use self::scroll::ScrollLock;
use self::typing::reveal_frames;
use crate::audio::{Cue, SoundCue};
use crate::config::DesktopConfig;
use crate::content::{ContentLoader, Fetch};
use crate::desktop::shortcut::{ShortcutSpec, ShortcutTarget};
use crate::desktop::DesktopSurface;
use crate::drag::{stacking, CompactPredicate, DragState, Draggable, HitRegion, StackCategory};
use crate::error::DesktopError;
use crate::geometry::{Point, Rect, Size};
use crate::meter::{self, UsageReport};
use crate::state::dialog::{Activation, Dialog, DialogContent, DialogKey, DialogPhase};
use crate::state::{DialogRegistry, OpenOutcome};
use crate::surface::{Surface, SurfaceEvent};

/// Element currently following the pointer
#[derive(Debug, Clone, PartialEq)]
enum DragTarget {
    Dialog(DialogKey),
    Icon(String),
}

/// Background work owned by one dialog instance
#[derive(Default)]
struct DialogTasks {
    typing: Option<AbortHandle>,
    fetch: Option<AbortHandle>,
}

impl DialogTasks {
    fn abort(self) {
        if let Some(handle) = self.typing {
            handle.abort();
        }
        if let Some(handle) = self.fetch {
            handle.abort();
        }
    }
}

struct Session {
    registry: DialogRegistry,
    desktop: DesktopSurface,
    scroll_lock: ScrollLock,
    /// Keyed by dialog id, not key: a reopened key is a new instance
    tasks: HashMap<String, DialogTasks>,
    active_drag: Option<DragTarget>,
}

impl Session {
    fn active_animations(&self) -> usize {
        self.tasks.values().filter(|t| t.typing.is_some()).count()
    }
}

pub struct Shell<S, F> {
    session: Arc<Mutex<Session>>,
    surface: Arc<S>,
    loader: Arc<ContentLoader<F>>,
    sound: Arc<dyn SoundCue>,
    config: Arc<DesktopConfig>,
    runtime: Handle,
}

impl<S, F> Clone for Shell<S, F> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            surface: Arc::clone(&self.surface),
            loader: Arc::clone(&self.loader),
            sound: Arc::clone(&self.sound),
            config: Arc::clone(&self.config),
            runtime: self.runtime.clone(),
        }
    }
}

impl<S: Surface, F: Fetch> Shell<S, F> {
    /// Background work is spawned on `runtime`
    pub fn new(
        config: DesktopConfig,
        surface: S,
        fetcher: F,
        sound: Arc<dyn SoundCue>,
        runtime: Handle,
    ) -> Self {
        let session = Session {
            registry: DialogRegistry::new(config.stacking.dialog_z_base),
            desktop: DesktopSurface::new(config.desktop.initial_viewport),
            scroll_lock: ScrollLock::default(),
            tasks: HashMap::new(),
            active_drag: None,
        };
        let loader = ContentLoader::new(fetcher, &config.content);

        Self {
            session: Arc::new(Mutex::new(session)),
            surface: Arc::new(surface),
            loader: Arc::new(loader),
            sound,
            config: Arc::new(config),
            runtime,
        }
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    fn lock(&self) -> Result<MutexGuard<'_, Session>, DesktopError> {
        Ok(self.session.lock()?)
    }

    // ===== Desktop surface =====

    /// New viewport size. Measured dialogs are contained in the new viewport
    /// from the next pointer move; their compact decision stays as attached.
    pub fn set_viewport(&self, viewport: Size) -> Result<(), DesktopError> {
        let mut guard = self.lock()?;
        let session = &mut *guard;
        session.desktop.set_viewport(viewport);

        let bounds = session.desktop.viewport_rect();
        for dialog in session.registry.dialogs_mut() {
            if dialog.phase != DialogPhase::Creating {
                dialog.drag.set_containment(Some(bounds));
            }
        }
        Ok(())
    }

    pub fn set_desktop_bounds(&self, bounds: Rect) -> Result<(), DesktopError> {
        self.lock()?.desktop.set_bounds(bounds);
        Ok(())
    }

    pub fn register_icon(&self, spec: ShortcutSpec) -> Result<(), DesktopError> {
        let mut guard = self.lock()?;
        let icon = guard
            .desktop
            .register_icon(spec, &self.config.drag, &self.config.stacking);
        log::debug!(
            "[Desktop] Registered icon {} (draggable: {})",
            icon.id,
            icon.drag.is_enabled()
        );
        Ok(())
    }

    // ===== Dialog registry =====

    /// Open the dialog for `activation`, or raise it when its key is open
    pub fn open(&self, activation: Activation) -> Result<OpenOutcome, DesktopError> {
        let mut guard = self.lock()?;
        let session = &mut *guard;
        let key = activation.key();

        let placeholder = self.loader.placeholder(&activation);
        let outcome = session
            .registry
            .open(&activation, || build_dialog(&activation, placeholder));

        match &outcome {
            OpenOutcome::Focused { id, z_order } => {
                log::debug!("[Dialog] {} already open, raised to {}", key, z_order);
                self.surface.apply(SurfaceEvent::DialogRaised {
                    id: id.clone(),
                    z_order: *z_order,
                });
            }
            OpenOutcome::Created { id, z_order } => {
                log::debug!("[Dialog] Created {} ({}) at z {}", key, id, z_order);
                if let Some(dialog) = session.registry.get(&key) {
                    self.surface.apply(SurfaceEvent::DialogMounted {
                        id: id.clone(),
                        key: key.to_string(),
                        kind: dialog.kind,
                        content: dialog.content.clone(),
                        z_order: *z_order,
                    });
                }
                self.sync_scroll_lock(session);

                let mut tasks = DialogTasks {
                    typing: self.spawn_typing(key.clone(), id.clone(), activation.title.clone()),
                    fetch: None,
                };
                if self.loader.needs_fetch(&activation) {
                    tasks.fetch = Some(self.spawn_fetch(key.clone(), id.clone(), activation));
                }
                session.tasks.insert(id.clone(), tasks);

                self.sound.play(Cue::DialogOpened);
            }
        }
        self.publish_restack(session);

        Ok(outcome)
    }

    /// Raise an open dialog. `None` for keys that are not open.
    pub fn focus(&self, key: &DialogKey) -> Result<Option<u32>, DesktopError> {
        let mut guard = self.lock()?;
        Ok(self.raise(&mut guard, key))
    }

    /// Close a dialog. Returns false when it was not open.
    pub fn close(&self, key: &DialogKey) -> Result<bool, DesktopError> {
        let mut guard = self.lock()?;
        let session = &mut *guard;

        let Some(mut dialog) = session.registry.close(key) else {
            return Ok(false);
        };
        dialog.phase = DialogPhase::Closing;

        if let Some(tasks) = session.tasks.remove(&dialog.id) {
            tasks.abort();
        }
        if session.active_drag == Some(DragTarget::Dialog(key.clone())) {
            session.active_drag = None;
        }
        self.surface.apply(SurfaceEvent::DialogRemoved {
            id: dialog.id.clone(),
        });
        dialog.phase = DialogPhase::Closed;
        log::debug!("[Dialog] Closed {} ({})", key, dialog.id);

        self.sync_scroll_lock(session);
        Ok(true)
    }

    pub fn is_open(&self, key: &DialogKey) -> Result<bool, DesktopError> {
        Ok(self.lock()?.registry.is_open(key))
    }

    pub fn dialog(&self, key: &DialogKey) -> Result<Option<Dialog>, DesktopError> {
        Ok(self.lock()?.registry.get(key).cloned())
    }

    /// Open dialogs, bottom to top
    pub fn dialogs(&self) -> Result<Vec<Dialog>, DesktopError> {
        let guard = self.lock()?;
        Ok(guard.registry.stacked().into_iter().cloned().collect())
    }

    pub fn scroll_locked(&self) -> Result<bool, DesktopError> {
        Ok(self.lock()?.scroll_lock.is_engaged())
    }

    pub fn usage(&self) -> Result<UsageReport, DesktopError> {
        let guard = self.lock()?;
        Ok(meter::sample(guard.registry.dialogs(), guard.active_animations()))
    }

    // ===== Lifecycle =====

    /// The page measured a mounted dialog. The first report centers it in the
    /// viewport and makes it interactive; later ones only record the size.
    pub fn dialog_measured(&self, key: &DialogKey, size: Size) -> Result<(), DesktopError> {
        let mut guard = self.lock()?;
        let session = &mut *guard;
        let viewport_size = session.desktop.viewport();
        let viewport = session.desktop.viewport_rect();

        let Some(dialog) = session.registry.get_mut(key) else {
            return Ok(());
        };
        dialog.size = Some(size);
        if dialog.phase != DialogPhase::Creating {
            return Ok(());
        }

        dialog.position = viewport.centered_origin(size);
        dialog.phase = DialogPhase::Centered;
        self.surface.apply(SurfaceEvent::DialogMoved {
            id: dialog.id.clone(),
            position: dialog.position,
        });

        let mut drag = Draggable::attach(
            StackCategory::Dialog,
            viewport_size,
            CompactPredicate::new(self.config.drag.compact_max_width),
            &self.config.drag.dialog_excluded_regions,
        );
        drag.set_containment(Some(viewport));
        dialog.drag = drag;
        dialog.phase = DialogPhase::Interactive;
        Ok(())
    }

    /// Pointer pressed on a dialog. Outside the excluded regions this raises
    /// the dialog and, once it is interactive, starts a drag.
    pub fn dialog_pointer_down(
        &self,
        key: &DialogKey,
        pointer: Point,
        region: HitRegion,
    ) -> Result<(), DesktopError> {
        if self.config.drag.dialog_excluded_regions.contains(&region) {
            return Ok(());
        }

        let mut guard = self.lock()?;
        if self.raise(&mut guard, key).is_none() {
            return Ok(());
        }

        let session = &mut *guard;
        self.end_drag(session);
        let Some(dialog) = session.registry.get_mut(key) else {
            return Ok(());
        };
        if dialog.phase == DialogPhase::Interactive && dialog.drag.pointer_down(pointer, region) {
            dialog.phase = DialogPhase::Dragging;
            self.surface.apply(SurfaceEvent::DialogDrag {
                id: dialog.id.clone(),
                state: DragState::Dragging,
            });
            session.active_drag = Some(DragTarget::Dialog(key.clone()));
        }
        Ok(())
    }

    pub fn icon_pointer_down(&self, id: &str, pointer: Point) -> Result<(), DesktopError> {
        let mut guard = self.lock()?;
        let session = &mut *guard;
        self.end_drag(session);

        let icon = session
            .desktop
            .icon_mut(id)
            .ok_or_else(|| DesktopError::UnknownIcon(id.to_string()))?;
        if icon.drag.pointer_down(pointer, HitRegion::Body) {
            icon.z_order = stacking::icon_lifted_z(&self.config.stacking);
            self.surface.apply(SurfaceEvent::IconStacked {
                id: icon.id.clone(),
                z_order: icon.z_order,
            });
            self.surface.apply(SurfaceEvent::IconDrag {
                id: icon.id.clone(),
                state: DragState::Dragging,
            });
            session.active_drag = Some(DragTarget::Icon(id.to_string()));
        }
        Ok(())
    }

    pub fn pointer_move(&self, pointer: Point) -> Result<(), DesktopError> {
        let mut guard = self.lock()?;
        let session = &mut *guard;

        match &session.active_drag {
            None => {}
            Some(DragTarget::Dialog(key)) => {
                if let Some(dialog) = session.registry.get_mut(key) {
                    let size = dialog.size.unwrap_or_default();
                    if dialog.drag.pointer_move(pointer, &mut dialog.position, size) {
                        self.surface.apply(SurfaceEvent::DialogMoved {
                            id: dialog.id.clone(),
                            position: dialog.position,
                        });
                    }
                }
            }
            Some(DragTarget::Icon(id)) => {
                if let Some(icon) = session.desktop.icon_mut(id) {
                    if icon.drag.pointer_move(pointer, &mut icon.position, icon.size) {
                        self.surface.apply(SurfaceEvent::IconMoved {
                            id: icon.id.clone(),
                            position: icon.position,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Pointer released, or left the viewport
    pub fn pointer_up(&self) -> Result<(), DesktopError> {
        let mut guard = self.lock()?;
        self.end_drag(&mut guard);
        Ok(())
    }

    /// Click on a shortcut. Returns the open outcome when it targets a dialog.
    /// The click that ends a drag which moved the icon is swallowed.
    pub fn activate_icon(&self, id: &str) -> Result<Option<OpenOutcome>, DesktopError> {
        let target = {
            let mut guard = self.lock()?;
            let icon = guard
                .desktop
                .icon_mut(id)
                .ok_or_else(|| DesktopError::UnknownIcon(id.to_string()))?;
            if !icon.take_click() {
                log::debug!("[Desktop] Click on {} swallowed after drag", id);
                return Ok(None);
            }
            icon.target.clone()
        };

        match target {
            ShortcutTarget::Dialog(activation) => self.open(activation).map(Some),
            ShortcutTarget::External { url } => {
                let _guard = self.lock()?;
                self.surface.apply(SurfaceEvent::ExternalLink { url });
                Ok(None)
            }
        }
    }

    // ===== Internals =====

    fn raise(&self, session: &mut Session, key: &DialogKey) -> Option<u32> {
        let z_order = session.registry.focus(key)?;
        if let Some(dialog) = session.registry.get(key) {
            self.surface.apply(SurfaceEvent::DialogRaised {
                id: dialog.id.clone(),
                z_order,
            });
        }
        self.publish_restack(session);
        Some(z_order)
    }

    /// Re-send every z-order after the registry renumbered its dialogs
    fn publish_restack(&self, session: &mut Session) {
        if !session.registry.take_restacked() {
            return;
        }
        for dialog in session.registry.stacked() {
            self.surface.apply(SurfaceEvent::DialogRaised {
                id: dialog.id.clone(),
                z_order: dialog.z_order,
            });
        }
    }

    fn end_drag(&self, session: &mut Session) {
        let Some(target) = session.active_drag.take() else {
            return;
        };

        match target {
            DragTarget::Dialog(key) => {
                if let Some(dialog) = session.registry.get_mut(&key) {
                    if dialog.drag.pointer_up().is_some() {
                        dialog.phase = DialogPhase::Interactive;
                        self.surface.apply(SurfaceEvent::DialogDrag {
                            id: dialog.id.clone(),
                            state: DragState::Idle,
                        });
                    }
                }
            }
            DragTarget::Icon(id) => {
                if let Some(icon) = session.desktop.icon_mut(&id) {
                    if let Some(release) = icon.drag.pointer_up() {
                        icon.suppress_click = release.moved;
                        icon.z_order = stacking::icon_resting_z(&self.config.stacking);
                        self.surface.apply(SurfaceEvent::IconStacked {
                            id: icon.id.clone(),
                            z_order: icon.z_order,
                        });
                        self.surface.apply(SurfaceEvent::IconDrag {
                            id: icon.id.clone(),
                            state: DragState::Idle,
                        });
                    }
                }
            }
        }
    }

    fn sync_scroll_lock(&self, session: &mut Session) {
        if let Some(engaged) = session.scroll_lock.sync(session.registry.len()) {
            log::debug!("[Dialog] Scroll lock {}", if engaged { "engaged" } else { "released" });
            self.surface.apply(SurfaceEvent::ScrollLock { engaged });
        }
    }

    fn spawn_typing(&self, key: DialogKey, id: String, title: String) -> Option<AbortHandle> {
        if title.is_empty() {
            return None;
        }
        let session = Arc::clone(&self.session);
        let surface = Arc::clone(&self.surface);
        let delay = Duration::from_millis(self.config.typing.char_delay_ms);

        let handle = self.runtime.spawn(async move {
            for (i, frame) in reveal_frames(&title).enumerate() {
                if i > 0 {
                    tokio::time::sleep(delay).await;
                }
                let event = SurfaceEvent::DialogTitle {
                    id: id.clone(),
                    text: frame.to_string(),
                };
                let written = with_live_dialog(&session, &key, &id, |_| surface.apply(event));
                if written.is_none() {
                    return;
                }
            }
            with_live_dialog(&session, &key, &id, |session| {
                if let Some(tasks) = session.tasks.get_mut(&id) {
                    tasks.typing = None;
                }
            });
        });
        Some(handle.abort_handle())
    }

    fn spawn_fetch(&self, key: DialogKey, id: String, activation: Activation) -> AbortHandle {
        let session = Arc::clone(&self.session);
        let surface = Arc::clone(&self.surface);
        let loader = Arc::clone(&self.loader);

        let handle = self.runtime.spawn(async move {
            let content = loader.load(&activation).await;
            with_live_dialog(&session, &key, &id, |session| {
                if let Some(dialog) = session.registry.get_mut(&key) {
                    dialog.content = content.clone();
                }
                if let Some(tasks) = session.tasks.get_mut(&id) {
                    tasks.fetch = None;
                }
                surface.apply(SurfaceEvent::DialogContent {
                    id: id.clone(),
                    content,
                });
            });
        });
        handle.abort_handle()
    }
}

fn build_dialog(activation: &Activation, content: DialogContent) -> Dialog {
    Dialog {
        id: Uuid::new_v4().to_string(),
        key: activation.key(),
        title: activation.title.clone(),
        locator: activation.locator.clone(),
        kind: activation.kind,
        content,
        phase: DialogPhase::Creating,
        position: Point::default(),
        size: None,
        z_order: 0,
        drag: Draggable::detached(StackCategory::Dialog),
    }
}

/// Run `f` under the session lock if the dialog instance `id` is still open
fn with_live_dialog<R>(
    session: &Mutex<Session>,
    key: &DialogKey,
    id: &str,
    f: impl FnOnce(&mut Session) -> R,
) -> Option<R> {
    let mut guard = match session.lock() {
        Ok(guard) => guard,
        Err(e) => {
            log::warn!("[Dialog] Session lock poisoned: {}", e);
            return None;
        }
    };
    if !guard.registry.is_live(key, id) {
        return None;
    }
    Some(f(&mut *guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::RecordingCue;
    use crate::content::testing::StubFetcher;
    use crate::state::dialog::ContentKind;
    use crate::surface::testing::RecordingSurface;

    type TestShell = Shell<RecordingSurface, StubFetcher>;

    fn shell_with(fetcher: StubFetcher) -> (TestShell, Arc<RecordingCue>) {
        let cue = Arc::new(RecordingCue::default());
        let shell = Shell::new(
            DesktopConfig::default(),
            RecordingSurface::default(),
            fetcher,
            cue.clone(),
            Handle::current(),
        );
        (shell, cue)
    }

    fn shell() -> TestShell {
        shell_with(StubFetcher::default().with("/about.txt", "Hello")).0
    }

    fn about() -> Activation {
        Activation::new("about.txt", "/about.txt", ContentKind::InlineText)
    }

    fn work() -> Activation {
        Activation::new("work", "/work/index.html", ContentKind::FramedDocument)
    }

    /// Let spawned tasks run; with paused time this also fires due timers
    async fn settle(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    fn mounted_count(shell: &TestShell) -> usize {
        shell.surface.count("dialog-mounted")
    }

    #[tokio::test(start_paused = true)]
    async fn about_txt_shows_wrapped_text_and_reopen_raises() {
        let (shell, cue) = shell_with(StubFetcher::default().with("/about.txt", "Hello"));

        let first = shell.open(about()).unwrap();
        assert!(first.is_created());
        settle(1).await;

        let dialog = shell.dialog(&about().key()).unwrap().unwrap();
        assert_eq!(
            dialog.content,
            DialogContent::Text {
                text: "Hello".to_string(),
                style: "text-content".to_string(),
            }
        );
        assert!(shell.surface.events().contains(&SurfaceEvent::DialogContent {
            id: first.id().to_string(),
            content: dialog.content.clone(),
        }));

        let second = shell.open(about()).unwrap();
        assert!(!second.is_created());
        assert_eq!(second.id(), first.id());
        assert!(second.z_order() > first.z_order());
        assert_eq!(mounted_count(&shell), 1);
        assert_eq!(cue.played(), vec![Cue::DialogOpened]);
    }

    #[tokio::test(start_paused = true)]
    async fn broken_txt_shows_an_error_state() {
        let shell = shell();
        let broken = Activation::new("broken.txt", "/broken.txt", ContentKind::InlineText);
        let outcome = shell.open(broken.clone()).unwrap();
        settle(1).await;

        let dialog = shell.dialog(&broken.key()).unwrap().unwrap();
        assert!(matches!(dialog.content, DialogContent::Error { .. }));
        assert!(shell.is_open(&broken.key()).unwrap());
        assert!(shell
            .surface
            .for_dialog(outcome.id())
            .iter()
            .any(|e| matches!(e, SurfaceEvent::DialogContent { content: DialogContent::Error { .. }, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn framed_documents_mount_ready() {
        let shell = shell();
        shell.open(work()).unwrap();
        settle(1).await;

        match &shell.surface.events()[0] {
            SurfaceEvent::DialogMounted { kind, content, .. } => {
                assert_eq!(*kind, ContentKind::FramedDocument);
                assert_eq!(
                    *content,
                    DialogContent::Frame {
                        src: "/work/index.html".to_string()
                    }
                );
            }
            other => panic!("expected mount first, got {:?}", other),
        }
        assert_eq!(shell.surface.count("dialog-content"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_opens_never_duplicate_the_node() {
        let shell = shell();
        for _ in 0..5 {
            shell.open(about()).unwrap();
            settle(3).await;
        }
        assert_eq!(mounted_count(&shell), 1);
        assert_eq!(shell.dialogs().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn z_order_grows_with_every_open_and_focus() {
        let shell = shell();
        let mut last = shell.config().stacking.dialog_z_base;

        for z in [
            shell.open(about()).unwrap().z_order(),
            shell.open(work()).unwrap().z_order(),
            shell.focus(&about().key()).unwrap().unwrap(),
            shell.open(work()).unwrap().z_order(),
            shell.focus(&work().key()).unwrap().unwrap(),
        ] {
            assert!(z > last, "{} should exceed {}", z, last);
            last = z;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn focus_brings_the_older_dialog_to_front() {
        let shell = shell();
        shell.open(about()).unwrap();
        shell.open(work()).unwrap();

        let za = shell.focus(&about().key()).unwrap().unwrap();
        let zb = shell.dialog(&work().key()).unwrap().unwrap().z_order;
        assert!(za > zb);
        let stacked = shell.dialogs().unwrap();
        assert_eq!(stacked.last().unwrap().key, about().key());
    }

    #[tokio::test(start_paused = true)]
    async fn close_twice_is_the_same_as_once() {
        let shell = shell();
        shell.open(work()).unwrap();

        assert!(shell.close(&work().key()).unwrap());
        assert!(!shell.is_open(&work().key()).unwrap());
        assert!(!shell.close(&work().key()).unwrap());
        assert!(!shell.is_open(&work().key()).unwrap());
        assert_eq!(shell.surface.count("dialog-removed"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn focus_and_close_of_unknown_keys_are_no_ops() {
        let shell = shell();
        let ghost = DialogKey::from("ghost");
        assert_eq!(shell.focus(&ghost).unwrap(), None);
        assert!(!shell.close(&ghost).unwrap());
        shell
            .dialog_pointer_down(&ghost, Point::default(), HitRegion::Header)
            .unwrap();
        shell.dialog_measured(&ghost, Size::new(10.0, 10.0)).unwrap();
        assert!(shell.surface.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn scroll_lock_follows_the_open_count() {
        let shell = shell();
        shell.open(about()).unwrap();
        assert!(shell.scroll_locked().unwrap());
        shell.open(work()).unwrap();
        assert!(shell.scroll_locked().unwrap());

        shell.close(&about().key()).unwrap();
        assert!(shell.scroll_locked().unwrap());
        shell.close(&work().key()).unwrap();
        assert!(!shell.scroll_locked().unwrap());

        let locks: Vec<bool> = shell
            .surface
            .events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::ScrollLock { engaged } => Some(engaged),
                _ => None,
            })
            .collect();
        assert_eq!(locks, vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_mid_animation_stops_all_writes() {
        let shell = shell();
        let title = Activation::new("readme.txt", "/readme.txt", ContentKind::InlineText);
        assert_eq!(title.title.chars().count(), 10);
        let outcome = shell.open(title.clone()).unwrap();

        settle(20).await;
        shell.close(&title.key()).unwrap();
        settle(1000).await;

        let events = shell.surface.for_dialog(outcome.id());
        let removed_at = events
            .iter()
            .position(|e| matches!(e, SurfaceEvent::DialogRemoved { .. }))
            .unwrap();
        assert_eq!(removed_at, events.len() - 1, "writes after removal: {:?}", events);

        let titles = events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::DialogTitle { .. }))
            .count();
        assert!(titles < 10);
        assert!(!shell.is_open(&title.key()).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn late_fetch_never_reaches_a_reopened_dialog() {
        let (shell, _) = shell_with(
            StubFetcher::default()
                .with("/about.txt", "Hello")
                .delayed(Duration::from_millis(100)),
        );
        let old = shell.open(about()).unwrap();
        settle(10).await;
        shell.close(&about().key()).unwrap();
        let new = shell.open(about()).unwrap();
        settle(500).await;

        let old_writes = shell.surface.for_dialog(old.id());
        assert!(matches!(old_writes.last(), Some(SurfaceEvent::DialogRemoved { .. })));
        assert!(shell
            .surface
            .for_dialog(new.id())
            .iter()
            .any(|e| matches!(e, SurfaceEvent::DialogContent { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn title_is_revealed_one_character_per_tick() {
        let shell = shell();
        let outcome = shell.open(work()).unwrap();
        settle(1000).await;

        let frames: Vec<String> = shell
            .surface
            .for_dialog(outcome.id())
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::DialogTitle { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(frames, vec!["w", "wo", "wor", "work"]);
        assert_eq!(shell.usage().unwrap().active_animations, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn first_measure_centers_later_ones_do_not() {
        let shell = shell();
        shell.set_viewport(Size::new(1200.0, 800.0)).unwrap();
        shell.open(work()).unwrap();
        let key = work().key();

        shell.dialog_measured(&key, Size::new(600.0, 400.0)).unwrap();
        let dialog = shell.dialog(&key).unwrap().unwrap();
        assert_eq!(dialog.position, Point::new(300.0, 200.0));
        assert_eq!(dialog.phase, DialogPhase::Interactive);

        // User drags it away
        shell
            .dialog_pointer_down(&key, Point::new(400.0, 210.0), HitRegion::Header)
            .unwrap();
        shell.pointer_move(Point::new(300.0, 260.0)).unwrap();
        shell.pointer_up().unwrap();

        // Reopen and re-measure keep the dragged position
        shell.open(work()).unwrap();
        shell.dialog_measured(&key, Size::new(640.0, 400.0)).unwrap();
        let dialog = shell.dialog(&key).unwrap().unwrap();
        assert_eq!(dialog.position, Point::new(200.0, 250.0));
        assert_eq!(dialog.size, Some(Size::new(640.0, 400.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn dragging_a_dialog_raises_and_moves_it() {
        let shell = shell();
        shell.open(about()).unwrap();
        shell.open(work()).unwrap();
        let key = about().key();
        shell.dialog_measured(&key, Size::new(400.0, 300.0)).unwrap();

        shell
            .dialog_pointer_down(&key, Point::new(500.0, 300.0), HitRegion::Header)
            .unwrap();
        let dialog = shell.dialog(&key).unwrap().unwrap();
        assert_eq!(dialog.phase, DialogPhase::Dragging);
        assert_eq!(shell.dialogs().unwrap().last().unwrap().key, key);

        shell.pointer_move(Point::new(520.0, 290.0)).unwrap();
        let moved = shell.dialog(&key).unwrap().unwrap();
        assert_eq!(moved.position, Point::new(dialog.position.x + 20.0, dialog.position.y - 10.0));

        shell.pointer_up().unwrap();
        assert_eq!(
            shell.dialog(&key).unwrap().unwrap().phase,
            DialogPhase::Interactive
        );
    }

    #[tokio::test(start_paused = true)]
    async fn resized_viewport_moves_the_dialog_containment() {
        let shell = shell();
        shell.open(work()).unwrap();
        let key = work().key();
        shell.dialog_measured(&key, Size::new(400.0, 300.0)).unwrap();

        shell.set_viewport(Size::new(1920.0, 1080.0)).unwrap();
        shell
            .dialog_pointer_down(&key, Point::new(500.0, 300.0), HitRegion::Header)
            .unwrap();
        shell.pointer_move(Point::new(1900.0, 1000.0)).unwrap();
        shell.pointer_up().unwrap();
        assert_eq!(
            shell.dialog(&key).unwrap().unwrap().position,
            Point::new(1520.0, 780.0)
        );

        shell.set_viewport(Size::new(800.0, 600.0)).unwrap();
        shell
            .dialog_pointer_down(&key, Point::new(1600.0, 800.0), HitRegion::Header)
            .unwrap();
        shell.pointer_move(Point::new(1700.0, 900.0)).unwrap();
        assert_eq!(
            shell.dialog(&key).unwrap().unwrap().position,
            Point::new(400.0, 300.0)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn close_control_neither_raises_nor_drags() {
        let shell = shell();
        shell.open(about()).unwrap();
        shell.open(work()).unwrap();
        let key = about().key();
        shell.dialog_measured(&key, Size::new(400.0, 300.0)).unwrap();
        let before = shell.dialog(&key).unwrap().unwrap().z_order;

        shell
            .dialog_pointer_down(&key, Point::new(10.0, 10.0), HitRegion::CloseControl)
            .unwrap();
        let dialog = shell.dialog(&key).unwrap().unwrap();
        assert_eq!(dialog.z_order, before);
        assert_eq!(dialog.phase, DialogPhase::Interactive);
    }

    #[tokio::test(start_paused = true)]
    async fn dialogs_are_not_draggable_on_a_compact_viewport() {
        let shell = shell();
        shell.set_viewport(Size::new(390.0, 844.0)).unwrap();
        shell.open(work()).unwrap();
        let key = work().key();
        shell.dialog_measured(&key, Size::new(360.0, 600.0)).unwrap();

        shell
            .dialog_pointer_down(&key, Point::new(100.0, 150.0), HitRegion::Header)
            .unwrap();
        shell.pointer_move(Point::new(200.0, 250.0)).unwrap();
        let dialog = shell.dialog(&key).unwrap().unwrap();
        assert_eq!(dialog.phase, DialogPhase::Interactive);
        assert_eq!(dialog.position, Point::new(15.0, 122.0));
    }

    #[tokio::test(start_paused = true)]
    async fn closing_while_dragging_ends_the_drag() {
        let shell = shell();
        shell.open(work()).unwrap();
        let key = work().key();
        shell.dialog_measured(&key, Size::new(400.0, 300.0)).unwrap();
        shell
            .dialog_pointer_down(&key, Point::new(500.0, 300.0), HitRegion::Header)
            .unwrap();
        shell.close(&key).unwrap();

        shell.pointer_move(Point::new(600.0, 300.0)).unwrap();
        shell.pointer_up().unwrap();
        assert_eq!(shell.surface.count("dialog-moved"), 1);
    }

    fn icon(id: &str, target: ShortcutTarget) -> ShortcutSpec {
        ShortcutSpec {
            id: id.to_string(),
            position: Point::new(40.0, 40.0),
            size: Size::new(80.0, 80.0),
            target,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn icon_click_opens_its_dialog() {
        let shell = shell();
        shell
            .register_icon(icon("about", ShortcutTarget::Dialog(about())))
            .unwrap();

        let outcome = shell.activate_icon("about").unwrap().unwrap();
        assert!(outcome.is_created());
        assert!(shell.is_open(&about().key()).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn dragging_an_icon_lifts_it_below_dialogs_and_swallows_the_click() {
        let shell = shell();
        shell
            .register_icon(icon("about", ShortcutTarget::Dialog(about())))
            .unwrap();
        let stacking = shell.config().stacking.clone();

        shell.icon_pointer_down("about", Point::new(60.0, 60.0)).unwrap();
        shell.pointer_move(Point::new(160.0, 90.0)).unwrap();
        assert!(shell.surface.events().contains(&SurfaceEvent::IconStacked {
            id: "about".to_string(),
            z_order: stacking.icon_lifted_z,
        }));
        assert!(stacking.icon_lifted_z < stacking.dialog_z_base);
        assert!(shell.surface.events().contains(&SurfaceEvent::IconMoved {
            id: "about".to_string(),
            position: Point::new(140.0, 70.0),
        }));

        shell.pointer_up().unwrap();
        assert_eq!(
            shell.surface.events().iter().rev().find(|e| e.name() == "icon-stacked"),
            Some(&SurfaceEvent::IconStacked {
                id: "about".to_string(),
                z_order: stacking.icon_resting_z,
            })
        );

        // The click that ends the drag does nothing, the next one opens
        assert_eq!(shell.activate_icon("about").unwrap(), None);
        assert!(!shell.is_open(&about().key()).unwrap());
        assert!(shell.activate_icon("about").unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn press_without_movement_still_clicks() {
        let shell = shell();
        shell
            .register_icon(icon("about", ShortcutTarget::Dialog(about())))
            .unwrap();
        shell.icon_pointer_down("about", Point::new(60.0, 60.0)).unwrap();
        shell.pointer_up().unwrap();
        assert!(shell.activate_icon("about").unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn external_shortcuts_emit_a_link() {
        let shell = shell();
        let url = "https://github.com/".to_string();
        shell
            .register_icon(icon("code", ShortcutTarget::External { url: url.clone() }))
            .unwrap();

        assert_eq!(shell.activate_icon("code").unwrap(), None);
        assert_eq!(
            shell.surface.events(),
            vec![SurfaceEvent::ExternalLink { url }]
        );
        assert!(!shell.scroll_locked().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_icons_are_caller_errors() {
        let shell = shell();
        assert!(matches!(
            shell.icon_pointer_down("nope", Point::default()),
            Err(DesktopError::UnknownIcon(_))
        ));
        assert!(matches!(
            shell.activate_icon("nope"),
            Err(DesktopError::UnknownIcon(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn usage_counts_open_dialogs_and_animations() {
        let shell = shell();
        assert_eq!(shell.usage().unwrap().percentage, 15);

        shell.open(work()).unwrap();
        let report = shell.usage().unwrap();
        assert_eq!(report.active_dialogs, 1);
        assert_eq!(report.active_animations, 1);
        assert_eq!(report.percentage, 15 + 8 + 2);

        settle(1000).await;
        assert_eq!(shell.usage().unwrap().percentage, 15 + 8);
    }
}
