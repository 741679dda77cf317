use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;

use glass_ipc::{Command, Response};

use super::SOCKET_PATH;

pub type CommandWithResponse = (Command, mpsc::Sender<Response>);

/// Accepts newline-delimited JSON commands and answers each with one response line.
pub struct IpcServer {
    socket_path: PathBuf,
    cmd_tx: mpsc::Sender<CommandWithResponse>,
}

impl IpcServer {
    pub fn new(cmd_tx: mpsc::Sender<CommandWithResponse>) -> Self {
        Self::with_socket_path(PathBuf::from(SOCKET_PATH), cmd_tx)
    }

    pub fn with_socket_path(socket_path: PathBuf, cmd_tx: mpsc::Sender<CommandWithResponse>) -> Self {
        Self {
            socket_path,
            cmd_tx,
        }
    }

    pub async fn run(&self) -> Result<()> {
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        tracing::info!("IPC server listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let cmd_tx = self.cmd_tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_connection(stream, cmd_tx).await {
                            tracing::error!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Accept error: {}", e);
                }
            }
        }
    }

    async fn handle_connection(
        stream: UnixStream,
        cmd_tx: mpsc::Sender<CommandWithResponse>,
    ) -> Result<()> {
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<Command>(line) {
                Ok(cmd) => Self::forward(cmd, &cmd_tx).await,
                Err(e) => Response::Error {
                    message: format!("Invalid command: {}", e),
                },
            };

            let mut json = serde_json::to_string(&response)?;
            json.push('\n');
            writer.write_all(json.as_bytes()).await?;
            writer.flush().await?;
        }

        Ok(())
    }

    /// Hand a command to the event loop and wait for its answer.
    async fn forward(cmd: Command, cmd_tx: &mpsc::Sender<CommandWithResponse>) -> Response {
        tracing::debug!("Received command: {}", cmd.name());
        let (resp_tx, mut resp_rx) = mpsc::channel(1);

        if cmd_tx.send((cmd, resp_tx)).await.is_err() {
            return Response::Error {
                message: "Internal error: command channel closed".to_string(),
            };
        }
        resp_rx.recv().await.unwrap_or(Response::Error {
            message: "Internal error: no response".to_string(),
        })
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}
