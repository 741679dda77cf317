use std::path::PathBuf;
use std::time::Duration;

use glass_ipc::{Bounds, Command, HostRequest, Response, WindowSetup};

use crate::core::{
    AssetResolver, Geometry, GlassState, GlassTransition, LoadContext, SettingsStore, Timer,
    TimerFired, TimerKind, TimerSender,
};
use crate::effect::Effect;
use crate::platform::{DisplayMetrics, IpcHost, Notifier, WindowHost};

use super::effects::execute_effects;

/// Page the content surface opens at startup.
pub const START_URL: &str = "https://www.crunchyroll.com";

/// Owns every piece of shell state and routes commands and timer firings to it.
/// Only ever driven from the event loop, one message at a time.
pub struct Dispatcher<H, D> {
    pub(super) host: H,
    pub(super) display: D,
    pub(super) resolver: AssetResolver,
    pub(super) store: SettingsStore,
    pub(super) glass: GlassState,
    pub(super) geometry: Geometry,
}

impl<H: WindowHost + Notifier, D: DisplayMetrics> Dispatcher<H, D> {
    pub async fn new(
        host: H,
        display: D,
        resolver: AssetResolver,
        settings_path: PathBuf,
        timer_tx: TimerSender,
    ) -> Self {
        let save_timer = Timer::new(TimerKind::SettingsSave, timer_tx.clone());
        let store = {
            let ctx = LoadContext {
                resolver: &resolver,
                display: &display,
                notifier: &host,
            };
            SettingsStore::open(settings_path, save_timer, &ctx).await
        };

        let settings = store.settings();
        let glass = GlassState::new(
            Duration::from_millis(settings.glass_close_timeout),
            timer_tx,
        );
        let geometry = Geometry::new(settings.bounds);
        tracing::info!(
            "Settings loaded from {} (window {})",
            store.path().display(),
            settings.bounds
        );

        Self {
            host,
            display,
            resolver,
            store,
            glass,
            geometry,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn glass(&self) -> &GlassState {
        &self.glass
    }

    /// Initial window description sent to a host when it attaches.
    pub fn window_setup(&self) -> WindowSetup {
        let settings = self.store.settings();
        WindowSetup {
            main_bounds: self.geometry.main(),
            overlay_bounds: self.overlay_bounds(),
            content_bounds: self.geometry.content_bounds(),
            fullscreen: settings.is_maximized,
            always_on_top: settings.is_always_on_top,
            user_agent: settings.user_agent.clone(),
            start_url: START_URL.to_string(),
        }
    }

    /// Process a command, then execute its effects against the host.
    pub async fn dispatch(&mut self, cmd: &Command) -> Response {
        tracing::debug!("Dispatching {}", cmd.name());
        let result = self.process_command(cmd).await;

        if let Err(e) = execute_effects(result.effects, &self.host).await {
            tracing::warn!("{} failed: {}", cmd.name(), e);
            return Response::Error {
                message: e.to_string(),
            };
        }

        if matches!(cmd, Command::Navigate { .. }) && result.response == Response::Ok {
            // Other events may have changed the glass while the host loaded the page.
            let effects = self.begin_collapse();
            self.execute(effects).await;
        }

        result.response
    }

    pub async fn on_timer(&mut self, fired: TimerFired) {
        let effects = match fired.kind {
            TimerKind::SettingsSave => {
                self.store.on_timer(fired).await;
                vec![]
            }
            TimerKind::GlassClose | TimerKind::GlassGrace => match self.glass.on_timer(fired) {
                Some(GlassTransition::CollapseStarted) => vec![Effect::CloseGlass],
                Some(GlassTransition::Collapsed) => {
                    vec![Effect::SetOverlayBounds(self.overlay_bounds())]
                }
                None => vec![],
            },
        };
        self.execute(effects).await;
    }

    /// Write any pending settings before the process exits.
    pub async fn shutdown(&mut self) {
        self.store.flush().await;
    }

    pub(super) fn overlay_bounds(&self) -> Bounds {
        self.geometry.overlay_bounds(self.glass.phase())
    }

    pub(super) fn begin_collapse(&mut self) -> Vec<Effect> {
        if self.glass.begin_collapse() {
            vec![Effect::CloseGlass]
        } else {
            vec![]
        }
    }

    async fn execute(&self, effects: Vec<Effect>) {
        if let Err(e) = execute_effects(effects, &self.host).await {
            tracing::warn!("Failed to apply effects: {}", e);
        }
    }
}

impl<D: DisplayMetrics> Dispatcher<IpcHost, D> {
    /// Everything a newly attached host needs: the window setup, then any
    /// notifications raised while no host could take them.
    pub fn host_snapshot(&self) -> Vec<HostRequest> {
        let mut snapshot = vec![HostRequest::Setup {
            window: self.window_setup(),
        }];
        snapshot.extend(self.host.take_undelivered());
        snapshot
    }
}
