use tokio::sync::mpsc;

use crate::core::TimerFired;
use crate::ipc::{CommandWithResponse, HostBroadcaster, SnapshotRequest};

pub struct CommandRelay {
    pub server_tx: mpsc::Sender<CommandWithResponse>,
    pub cmd_rx: mpsc::Receiver<CommandWithResponse>,
}

pub struct TimerRelay {
    pub timer_tx: mpsc::UnboundedSender<TimerFired>,
    pub timer_rx: mpsc::UnboundedReceiver<TimerFired>,
}

pub struct SnapshotRelay {
    pub request_tx: mpsc::Sender<SnapshotRequest>,
    pub request_rx: mpsc::Receiver<SnapshotRequest>,
}

pub struct Channels {
    pub commands: CommandRelay,
    pub timers: TimerRelay,
    pub snapshots: SnapshotRelay,
    pub broadcaster: HostBroadcaster,
}

pub fn create_channels() -> Channels {
    // IPC server -> event loop
    let (server_tx, cmd_rx) = mpsc::channel::<CommandWithResponse>(256);

    // Timer tasks -> event loop
    let (timer_tx, timer_rx) = mpsc::unbounded_channel::<TimerFired>();

    // Host server -> event loop, answered with the current window setup
    let (request_tx, request_rx) = mpsc::channel::<SnapshotRequest>(16);

    // Event loop -> attached hosts
    let broadcaster = HostBroadcaster::new(256);

    Channels {
        commands: CommandRelay { server_tx, cmd_rx },
        timers: TimerRelay { timer_tx, timer_rx },
        snapshots: SnapshotRelay {
            request_tx,
            request_rx,
        },
        broadcaster,
    }
}
