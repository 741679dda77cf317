use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    SettingsSave,
    GlassClose,
    GlassGrace,
}

/// Expiry notice delivered to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub kind: TimerKind,
    pub generation: u64,
}

pub type TimerSender = mpsc::UnboundedSender<TimerFired>;

/// Cancellable single-shot timer.
///
/// Expiry is not handled on the timer task itself: the task only posts a
/// [`TimerFired`] back to the event loop, which hands it to [`Timer::accept`].
/// Each schedule or cancel bumps the generation, so a firing that was already
/// queued when the timer was superseded is rejected.
pub struct Timer {
    kind: TimerKind,
    tx: TimerSender,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl Timer {
    pub fn new(kind: TimerKind, tx: TimerSender) -> Self {
        Self {
            kind,
            tx,
            generation: 0,
            pending: None,
        }
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// Start the timer, replacing any pending schedule.
    pub fn schedule(&mut self, after: Duration) {
        self.cancel();
        self.generation += 1;

        let fired = TimerFired {
            kind: self.kind,
            generation: self.generation,
        };
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if tx.send(fired).is_err() {
                tracing::debug!("Timer {:?} fired after the event loop stopped", fired.kind);
            }
        }));
    }

    /// Returns true if a pending schedule was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                handle.abort();
                self.generation += 1;
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Claim a firing. Returns false for firings of another timer or stale ones.
    pub fn accept(&mut self, fired: TimerFired) -> bool {
        if fired.kind != self.kind || fired.generation != self.generation {
            return false;
        }
        self.pending.take().is_some()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
