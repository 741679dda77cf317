use std::cell::RefCell;

use glass_ipc::{Bounds, HostRequest, Size};

use crate::error::GlassError;
use crate::ipc::HostBroadcaster;

/// Trait for driving the host window system (main window, content surface, overlay).
/// This abstraction allows mocking in tests.
#[allow(async_fn_in_trait)]
pub trait WindowHost {
    fn set_overlay_bounds(&self, bounds: Bounds);
    fn set_content_bounds(&self, bounds: Bounds);
    fn set_fullscreen(&self, enabled: bool);
    fn set_always_on_top(&self, enabled: bool);
    fn minimize(&self);
    /// Ask the glass UI to play its closing transition.
    fn close_glass(&self);
    async fn load_url(&self, url: &str, user_agent: &str) -> Result<(), GlassError>;
    fn quit(&self);
}

/// Fire-and-forget desktop notifications.
pub trait Notifier {
    fn notify(&self, title: &str, body: &str);
}

pub trait DisplayMetrics {
    /// Usable area of the primary display.
    fn work_area(&self) -> Size;
}

/// Host implementation that forwards every operation to the processes
/// subscribed on the host socket.
///
/// Notifications nobody accepted are kept until a host attaches, since the
/// first-run welcome is raised before any host can be listening.
pub struct IpcHost {
    broadcaster: HostBroadcaster,
    undelivered: RefCell<Vec<HostRequest>>,
}

impl IpcHost {
    pub fn new(broadcaster: HostBroadcaster) -> Self {
        Self {
            broadcaster,
            undelivered: RefCell::new(Vec::new()),
        }
    }

    /// Drain the notifications waiting for a host.
    pub fn take_undelivered(&self) -> Vec<HostRequest> {
        self.undelivered.take()
    }

    fn send(&self, request: HostRequest) -> bool {
        tracing::debug!("Host request: {:?}", request);
        self.broadcaster.send(request)
    }
}

impl WindowHost for IpcHost {
    fn set_overlay_bounds(&self, bounds: Bounds) {
        self.send(HostRequest::SetOverlayBounds { bounds });
    }

    fn set_content_bounds(&self, bounds: Bounds) {
        self.send(HostRequest::SetContentBounds { bounds });
    }

    fn set_fullscreen(&self, enabled: bool) {
        self.send(HostRequest::SetFullscreen { enabled });
    }

    fn set_always_on_top(&self, enabled: bool) {
        self.send(HostRequest::SetAlwaysOnTop { enabled });
    }

    fn minimize(&self) {
        self.send(HostRequest::Minimize);
    }

    fn close_glass(&self) {
        self.send(HostRequest::CloseGlass);
    }

    async fn load_url(&self, url: &str, user_agent: &str) -> Result<(), GlassError> {
        let delivered = self.send(HostRequest::LoadUrl {
            url: url.to_string(),
            user_agent: user_agent.to_string(),
        });
        if delivered {
            Ok(())
        } else {
            Err(GlassError::NavigationFailure {
                url: url.to_string(),
                reason: "no host attached".to_string(),
            })
        }
    }

    fn quit(&self) {
        self.send(HostRequest::Quit);
    }
}

impl Notifier for IpcHost {
    fn notify(&self, title: &str, body: &str) {
        let request = HostRequest::Notify {
            title: title.to_string(),
            body: body.to_string(),
        };
        if !self.send(request.clone()) {
            tracing::debug!("No host for notification '{}', queued", title);
            self.undelivered.borrow_mut().push(request);
        }
    }
}

/// Display metrics handed in by the launcher.
pub struct FixedDisplay {
    work_area: Size,
}

impl FixedDisplay {
    pub fn new(work_area: Size) -> Self {
        Self { work_area }
    }
}

impl DisplayMetrics for FixedDisplay {
    fn work_area(&self) -> Size {
        self.work_area
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use glass_ipc::HostFilter;

    #[test]
    fn test_notification_queued_until_host_attaches() {
        let broadcaster = HostBroadcaster::new(8);
        let host = IpcHost::new(broadcaster.clone());

        host.notify("Glass Initialized!", "Welcome");
        assert_eq!(
            host.take_undelivered(),
            vec![HostRequest::Notify {
                title: "Glass Initialized!".to_string(),
                body: "Welcome".to_string(),
            }]
        );
        assert!(host.take_undelivered().is_empty());

        let _subscription = broadcaster.subscribe(HostFilter::all());
        host.notify("Later", "Delivered");
        assert!(host.take_undelivered().is_empty());
    }

    #[tokio::test]
    async fn test_navigation_needs_a_content_host() {
        let broadcaster = HostBroadcaster::new(8);
        let host = IpcHost::new(broadcaster.clone());
        let _overlay = broadcaster.subscribe(HostFilter {
            overlay: true,
            ..Default::default()
        });

        let err = host.load_url("https://www.netflix.com", "ua").await.unwrap_err();
        assert!(matches!(err, GlassError::NavigationFailure { .. }));

        let _content = broadcaster.subscribe(HostFilter {
            content: true,
            ..Default::default()
        });
        host.load_url("https://www.netflix.com", "ua").await.unwrap();
    }
}
