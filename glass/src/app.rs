mod channels;
mod command;
mod dispatch;
mod effects;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use glass_ipc::{Command, Size};

use crate::core::AssetResolver;
use crate::ipc::{HostServer, IpcServer};
use crate::platform::{FixedDisplay, IpcHost, WindowHost};

use channels::{create_channels, Channels, CommandRelay, SnapshotRelay, TimerRelay};
use dispatch::Dispatcher;

/// Time given to host connections to drain the final quit request.
const SHUTDOWN_LINGER: Duration = Duration::from_millis(100);

pub struct StartOptions {
    pub settings_path: PathBuf,
    pub resources: PathBuf,
    pub work_area: Size,
}

pub struct App {}

impl App {
    pub fn run(options: StartOptions) -> Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        rt.block_on(Self::run_async(options))
    }

    async fn run_async(options: StartOptions) -> Result<()> {
        let Channels {
            commands: CommandRelay { server_tx, mut cmd_rx },
            timers: TimerRelay {
                timer_tx,
                mut timer_rx,
            },
            snapshots: SnapshotRelay {
                request_tx,
                mut request_rx,
            },
            broadcaster,
        } = create_channels();

        let ipc_server = IpcServer::new(server_tx);
        tokio::spawn(async move {
            if let Err(e) = ipc_server.run().await {
                tracing::error!("IPC server error: {}", e);
            }
        });

        let host_server = HostServer::new(broadcaster.clone(), request_tx);
        tokio::spawn(async move {
            if let Err(e) = host_server.run().await {
                tracing::error!("Host server error: {}", e);
            }
        });

        tracing::info!(
            "Starting glass (resources {}, work area {})",
            options.resources.display(),
            options.work_area
        );
        let mut dispatcher = Dispatcher::new(
            IpcHost::new(broadcaster),
            FixedDisplay::new(options.work_area),
            AssetResolver::new(options.resources),
            options.settings_path,
            timer_tx,
        )
        .await;

        loop {
            tokio::select! {
                Some((cmd, resp_tx)) = cmd_rx.recv() => {
                    let closing = cmd == Command::Close;
                    let response = dispatcher.dispatch(&cmd).await;
                    let _ = resp_tx.send(response).await;
                    if closing {
                        break;
                    }
                }
                Some(fired) = timer_rx.recv() => {
                    dispatcher.on_timer(fired).await;
                }
                Some(resp_tx) = request_rx.recv() => {
                    let _ = resp_tx.send(dispatcher.host_snapshot());
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted");
                    dispatcher.host().quit();
                    break;
                }
                else => break,
            }
        }

        dispatcher.shutdown().await;
        tokio::time::sleep(SHUTDOWN_LINGER).await;
        tracing::info!("Glass exiting");
        Ok(())
    }
}
