mod client;
mod host_server;
mod server;

pub use client::{send_command, subscribe_and_print};
pub use host_server::{HostBroadcaster, HostServer, SnapshotRequest};
pub use server::{CommandWithResponse, IpcServer};

/// Command socket used by the UI and the CLI.
pub const SOCKET_PATH: &str = "/tmp/glass.sock";
/// Socket the host process subscribes on to receive window operations.
pub const HOST_SOCKET_PATH: &str = "/tmp/glass-host.sock";
