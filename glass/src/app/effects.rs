use crate::effect::Effect;
use crate::error::GlassError;
use crate::platform::WindowHost;

/// Execute side effects in order, stopping at the first failure.
pub async fn execute_effects<H: WindowHost>(
    effects: Vec<Effect>,
    host: &H,
) -> Result<(), GlassError> {
    for effect in effects {
        match effect {
            Effect::SetOverlayBounds(bounds) => host.set_overlay_bounds(bounds),
            Effect::SetContentBounds(bounds) => host.set_content_bounds(bounds),
            Effect::SetFullscreen(enabled) => host.set_fullscreen(enabled),
            Effect::SetAlwaysOnTop(enabled) => host.set_always_on_top(enabled),
            Effect::Minimize => host.minimize(),
            Effect::CloseGlass => host.close_glass(),
            Effect::LoadUrl { url, user_agent } => {
                host.load_url(&url, &user_agent).await?;
                tracing::info!("Navigated to {}", url);
            }
            Effect::Quit => host.quit(),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockHost;
    use glass_ipc::{Bounds, HostRequest};

    #[tokio::test]
    async fn test_effects_run_in_order() {
        let host = MockHost::new();
        let effects = vec![
            Effect::CloseGlass,
            Effect::SetOverlayBounds(Bounds::new(50, 0, 900, 16)),
            Effect::SetFullscreen(true),
        ];

        execute_effects(effects, &host).await.unwrap();
        assert_eq!(
            host.requests(),
            vec![
                HostRequest::CloseGlass,
                HostRequest::SetOverlayBounds {
                    bounds: Bounds::new(50, 0, 900, 16)
                },
                HostRequest::SetFullscreen { enabled: true },
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_navigation_stops_execution() {
        let host = MockHost::new();
        host.set_fail_navigation(true);
        let effects = vec![
            Effect::LoadUrl {
                url: "https://www.netflix.com".to_string(),
                user_agent: "ua".to_string(),
            },
            Effect::CloseGlass,
        ];

        let err = execute_effects(effects, &host).await.unwrap_err();
        assert!(matches!(err, GlassError::NavigationFailure { .. }));
        assert!(host.requests().is_empty());
    }
}
