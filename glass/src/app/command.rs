use std::time::Duration;

use glass_ipc::{Bounds, Command, Response, StateInfo};

use crate::core::LoadContext;
use crate::effect::{CommandResult, Effect};
use crate::platform::{DisplayMetrics, Notifier, WindowHost};

use super::dispatch::Dispatcher;

impl<H: WindowHost + Notifier, D: DisplayMetrics> Dispatcher<H, D> {
    /// Apply a command to the shell state and collect the host effects it needs.
    pub(super) async fn process_command(&mut self, cmd: &Command) -> CommandResult {
        match cmd {
            Command::PopOut => self.pop_out(),
            Command::PopIn => self.pop_in(),
            Command::HoverIn => {
                self.glass.hover_in();
                CommandResult::ok()
            }
            Command::HoverOut => {
                self.glass.hover_out();
                CommandResult::ok()
            }
            Command::Close => {
                tracing::info!("Close requested");
                CommandResult::ok_with_effects(vec![Effect::Quit])
            }
            Command::Minimize => CommandResult::ok_with_effects(vec![Effect::Minimize]),
            Command::ToggleMaximize => self.toggle_maximize(),
            Command::ToggleAlwaysOnTop => self.toggle_always_on_top(),
            Command::Navigate { url } => self.navigate(url),
            Command::ClickedIn => CommandResult::ok_with_effects(self.begin_collapse()),
            Command::OnLoadedContent => {
                let bounds = self.geometry.show_content();
                CommandResult::ok_with_effects(vec![Effect::SetContentBounds(bounds)])
            }
            Command::OnLeaving => {
                let bounds = self.geometry.hide_content();
                CommandResult::ok_with_effects(vec![Effect::SetContentBounds(bounds)])
            }
            Command::WindowResized { bounds } => self.window_resized(*bounds),
            Command::WindowMoved { bounds } => self.window_moved(*bounds),
            Command::GetConfiguration => self.get_configuration().await,
            Command::GetContentCss => self.get_content_css().await,
            Command::GetState => CommandResult::with_response(Response::State {
                state: self.state_info(),
            }),
        }
    }

    fn pop_out(&mut self) -> CommandResult {
        if !self.glass.pop_out() {
            return CommandResult::ok();
        }
        CommandResult::ok_with_effects(vec![Effect::SetOverlayBounds(self.overlay_bounds())])
    }

    fn pop_in(&mut self) -> CommandResult {
        if !self.glass.pop_in() {
            return CommandResult::ok();
        }
        CommandResult::ok_with_effects(vec![Effect::SetOverlayBounds(self.overlay_bounds())])
    }

    fn toggle_maximize(&mut self) -> CommandResult {
        let mut enabled = false;
        self.store.mutate(|s| {
            s.is_maximized = !s.is_maximized;
            enabled = s.is_maximized;
        });
        self.store.schedule_save();
        tracing::info!("Fullscreen {}", if enabled { "on" } else { "off" });
        CommandResult::ok_with_effects(vec![Effect::SetFullscreen(enabled)])
    }

    fn toggle_always_on_top(&mut self) -> CommandResult {
        let mut enabled = false;
        self.store.mutate(|s| {
            s.is_always_on_top = !s.is_always_on_top;
            enabled = s.is_always_on_top;
        });
        self.store.schedule_save();
        tracing::info!("Always on top {}", if enabled { "on" } else { "off" });
        CommandResult::ok_with_effects(vec![Effect::SetAlwaysOnTop(enabled)])
    }

    // The collapse is started by the dispatcher once the load has been handed off.
    fn navigate(&mut self, url: &str) -> CommandResult {
        if url.is_empty() {
            return CommandResult::error("navigate requires a url");
        }
        CommandResult::ok_with_effects(vec![Effect::LoadUrl {
            url: url.to_string(),
            user_agent: self.store.settings().user_agent.clone(),
        }])
    }

    fn window_resized(&mut self, bounds: Bounds) -> CommandResult {
        self.geometry.resize(bounds);
        self.remember_bounds();

        let mut effects = vec![Effect::SetOverlayBounds(self.overlay_bounds())];
        if self.geometry.content_visible() {
            effects.push(Effect::SetContentBounds(self.geometry.content_bounds()));
        }
        CommandResult::ok_with_effects(effects)
    }

    fn window_moved(&mut self, bounds: Bounds) -> CommandResult {
        self.geometry.move_to(bounds);
        self.remember_bounds();
        CommandResult::ok()
    }

    fn remember_bounds(&mut self) {
        let main = self.geometry.main();
        self.store.mutate(|s| s.bounds = main);
        self.store.schedule_save();
    }

    async fn get_configuration(&mut self) -> CommandResult {
        let live = self.store.settings();
        let (maximized, on_top) = (live.is_maximized, live.is_always_on_top);
        let main = self.geometry.main();

        let ctx = LoadContext {
            resolver: &self.resolver,
            display: &self.display,
            notifier: &self.host,
        };
        let reloaded = self.store.load(&ctx).await.settings.clone();

        let close_timeout = Duration::from_millis(reloaded.glass_close_timeout);
        self.glass.set_close_timeout(close_timeout);

        // Window state belongs to the live window; an edit on disk cannot move it.
        if reloaded.bounds != main
            || reloaded.is_maximized != maximized
            || reloaded.is_always_on_top != on_top
        {
            tracing::info!("Keeping live window state over the edited settings");
            self.store.mutate(|s| {
                s.bounds = main;
                s.is_maximized = maximized;
                s.is_always_on_top = on_top;
            });
            self.store.schedule_save();
        }

        CommandResult::with_response(Response::Configuration {
            configuration: Box::new(self.store.configuration().clone()),
        })
    }

    async fn get_content_css(&self) -> CommandResult {
        match self.resolver.content_css().await {
            Ok(text) => CommandResult::with_response(Response::Css { text }),
            Err(e) => {
                tracing::warn!("Content stylesheet unavailable: {}", e);
                CommandResult::error(e.to_string())
            }
        }
    }

    fn state_info(&self) -> StateInfo {
        let settings = self.store.settings();
        StateInfo {
            is_out: self.glass.is_out(),
            main_bounds: self.geometry.main(),
            overlay_bounds: self.overlay_bounds(),
            content_visible: self.geometry.content_visible(),
            is_maximized: settings.is_maximized,
            is_always_on_top: settings.is_always_on_top,
            settings_path: self.store.path().display().to_string(),
        }
    }
}
