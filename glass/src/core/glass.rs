use std::time::Duration;

use super::timer::{Timer, TimerFired, TimerKind, TimerSender};

/// Time the glass UI gets for its closing transition before the overlay shrinks.
pub const GLASS_GRACE_PERIOD: Duration = Duration::from_millis(125);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GlassPhase {
    #[default]
    Collapsed,
    Expanded,
}

/// Visible consequence of a timer firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlassTransition {
    /// The UI should start closing; the overlay collapses after the grace period.
    CollapseStarted,
    Collapsed,
}

/// Expanded/collapsed state of the glass bar with its auto-collapse timers.
pub struct GlassState {
    phase: GlassPhase,
    pointer_inside: bool,
    close_timeout: Duration,
    close_timer: Timer,
    grace_timer: Timer,
}

impl GlassState {
    pub fn new(close_timeout: Duration, timer_tx: TimerSender) -> Self {
        Self {
            phase: GlassPhase::Collapsed,
            pointer_inside: false,
            close_timeout,
            close_timer: Timer::new(TimerKind::GlassClose, timer_tx.clone()),
            grace_timer: Timer::new(TimerKind::GlassGrace, timer_tx),
        }
    }

    pub fn phase(&self) -> GlassPhase {
        self.phase
    }

    pub fn is_out(&self) -> bool {
        self.phase == GlassPhase::Expanded
    }

    pub fn pointer_inside(&self) -> bool {
        self.pointer_inside
    }

    pub fn close_timeout(&self) -> Duration {
        self.close_timeout
    }

    pub fn set_close_timeout(&mut self, timeout: Duration) {
        self.close_timeout = timeout;
    }

    pub fn close_pending(&self) -> bool {
        self.close_timer.is_pending()
    }

    pub fn collapsing(&self) -> bool {
        self.grace_timer.is_pending()
    }

    /// Expand the bar. Returns false if it already was.
    pub fn pop_out(&mut self) -> bool {
        if self.phase == GlassPhase::Expanded {
            return false;
        }
        self.phase = GlassPhase::Expanded;
        tracing::debug!("Glass expanded");
        true
    }

    /// Collapse the bar immediately. Returns false if it already was.
    pub fn pop_in(&mut self) -> bool {
        if self.phase == GlassPhase::Collapsed {
            return false;
        }
        self.close_timer.cancel();
        self.grace_timer.cancel();
        self.phase = GlassPhase::Collapsed;
        tracing::debug!("Glass collapsed");
        true
    }

    pub fn hover_in(&mut self) {
        self.pointer_inside = true;
        if self.phase == GlassPhase::Expanded && self.close_timer.cancel() {
            tracing::debug!("Auto-collapse cancelled");
        }
    }

    pub fn hover_out(&mut self) {
        self.pointer_inside = false;
        if self.phase == GlassPhase::Expanded {
            self.close_timer.schedule(self.close_timeout);
        }
    }

    /// Start the closing sequence: the caller tells the UI to close, and the
    /// overlay collapses once the grace timer fires.
    ///
    /// Returns false when collapsed or when a sequence is already running.
    pub fn begin_collapse(&mut self) -> bool {
        if self.phase == GlassPhase::Collapsed || self.grace_timer.is_pending() {
            return false;
        }
        self.close_timer.cancel();
        self.grace_timer.schedule(GLASS_GRACE_PERIOD);
        true
    }

    pub fn on_timer(&mut self, fired: TimerFired) -> Option<GlassTransition> {
        match fired.kind {
            TimerKind::GlassClose => {
                if self.close_timer.accept(fired) && self.begin_collapse() {
                    tracing::debug!("Glass idle, collapsing");
                    Some(GlassTransition::CollapseStarted)
                } else {
                    None
                }
            }
            TimerKind::GlassGrace => {
                if self.grace_timer.accept(fired) && self.pop_in() {
                    Some(GlassTransition::Collapsed)
                } else {
                    None
                }
            }
            TimerKind::SettingsSave => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    const CLOSE_TIMEOUT: Duration = Duration::from_millis(5000);

    fn glass() -> (GlassState, mpsc::UnboundedReceiver<TimerFired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (GlassState::new(CLOSE_TIMEOUT, tx), rx)
    }

    /// Feed every queued firing to the state machine, as the event loop does.
    fn pump(
        glass: &mut GlassState,
        rx: &mut mpsc::UnboundedReceiver<TimerFired>,
    ) -> Vec<GlassTransition> {
        let mut transitions = Vec::new();
        while let Ok(fired) = rx.try_recv() {
            transitions.extend(glass.on_timer(fired));
        }
        transitions
    }

    #[tokio::test]
    async fn test_pop_out_and_pop_in() {
        let (mut glass, _rx) = glass();
        assert_eq!(glass.phase(), GlassPhase::Collapsed);

        assert!(glass.pop_out());
        assert!(glass.is_out());

        assert!(glass.pop_in());
        assert_eq!(glass.phase(), GlassPhase::Collapsed);
    }

    #[tokio::test]
    async fn test_pop_out_and_pop_in_are_idempotent() {
        let (mut glass, _rx) = glass();
        assert!(!glass.pop_in());

        assert!(glass.pop_out());
        assert!(!glass.pop_out());
        assert!(glass.is_out());

        assert!(glass.pop_in());
        assert!(!glass.pop_in());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_out_collapses_after_timeout_and_grace() {
        let (mut glass, mut rx) = glass();
        glass.pop_out();
        glass.hover_in();
        glass.hover_out();
        assert!(glass.close_pending());

        tokio::time::sleep(CLOSE_TIMEOUT - Duration::from_millis(1)).await;
        assert!(pump(&mut glass, &mut rx).is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(
            pump(&mut glass, &mut rx),
            vec![GlassTransition::CollapseStarted]
        );
        assert!(glass.is_out());
        assert!(glass.collapsing());

        tokio::time::sleep(GLASS_GRACE_PERIOD + Duration::from_millis(1)).await;
        assert_eq!(pump(&mut glass, &mut rx), vec![GlassTransition::Collapsed]);
        assert_eq!(glass.phase(), GlassPhase::Collapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_in_cancels_auto_collapse() {
        let (mut glass, mut rx) = glass();
        glass.pop_out();
        glass.hover_out();

        tokio::time::sleep(Duration::from_millis(4000)).await;
        glass.hover_in();
        assert!(glass.pointer_inside());
        assert!(!glass.close_pending());

        tokio::time::sleep(CLOSE_TIMEOUT * 2).await;
        assert!(pump(&mut glass, &mut rx).is_empty());
        assert!(glass.is_out());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_out_restarts_timer() {
        let (mut glass, mut rx) = glass();
        glass.pop_out();
        glass.hover_out();

        tokio::time::sleep(Duration::from_millis(4000)).await;
        glass.hover_out();

        tokio::time::sleep(Duration::from_millis(4000)).await;
        assert!(pump(&mut glass, &mut rx).is_empty());

        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert_eq!(
            pump(&mut glass, &mut rx),
            vec![GlassTransition::CollapseStarted]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_out_while_collapsed_starts_nothing() {
        let (mut glass, mut rx) = glass();
        glass.hover_out();
        assert!(!glass.close_pending());
        assert!(!glass.pointer_inside());

        tokio::time::sleep(CLOSE_TIMEOUT * 2).await;
        assert!(pump(&mut glass, &mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pop_in_cancels_pending_timers() {
        let (mut glass, mut rx) = glass();
        glass.pop_out();
        glass.hover_out();
        glass.pop_in();
        assert!(!glass.close_pending());

        // Expanding again must not inherit the old countdown.
        glass.pop_out();
        tokio::time::sleep(CLOSE_TIMEOUT * 2).await;
        assert!(pump(&mut glass, &mut rx).is_empty());
        assert!(glass.is_out());
    }

    #[tokio::test(start_paused = true)]
    async fn test_begin_collapse_runs_once() {
        let (mut glass, mut rx) = glass();
        assert!(!glass.begin_collapse());

        glass.pop_out();
        assert!(glass.begin_collapse());
        assert!(!glass.begin_collapse());

        tokio::time::sleep(GLASS_GRACE_PERIOD + Duration::from_millis(1)).await;
        assert_eq!(pump(&mut glass, &mut rx), vec![GlassTransition::Collapsed]);
        assert!(!glass.begin_collapse());
    }

    #[tokio::test(start_paused = true)]
    async fn test_grace_after_manual_pop_in_is_noop() {
        let (mut glass, mut rx) = glass();
        glass.pop_out();
        glass.begin_collapse();
        glass.pop_in();

        glass.pop_out();
        tokio::time::sleep(GLASS_GRACE_PERIOD * 2).await;
        assert!(pump(&mut glass, &mut rx).is_empty());
        assert!(glass.is_out());
    }
}
