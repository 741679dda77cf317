use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc, oneshot};

use glass_ipc::{HostFilter, HostRequest, SubscribeRequest};

use super::HOST_SOCKET_PATH;

/// Answered by the event loop with the window setup followed by any
/// requests that were queued while no host was attached.
pub type SnapshotRequest = oneshot::Sender<Vec<HostRequest>>;

/// Streams host requests to every attached host process.
pub struct HostServer {
    socket_path: PathBuf,
    broadcaster: HostBroadcaster,
    snapshot_tx: mpsc::Sender<SnapshotRequest>,
}

impl HostServer {
    pub fn new(broadcaster: HostBroadcaster, snapshot_tx: mpsc::Sender<SnapshotRequest>) -> Self {
        Self::with_socket_path(PathBuf::from(HOST_SOCKET_PATH), broadcaster, snapshot_tx)
    }

    pub fn with_socket_path(
        socket_path: PathBuf,
        broadcaster: HostBroadcaster,
        snapshot_tx: mpsc::Sender<SnapshotRequest>,
    ) -> Self {
        Self {
            socket_path,
            broadcaster,
            snapshot_tx,
        }
    }

    pub async fn run(self) -> Result<()> {
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        tracing::info!("Host server listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let broadcaster = self.broadcaster.clone();
                    let snapshot_tx = self.snapshot_tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) =
                            Self::handle_connection(stream, broadcaster, snapshot_tx).await
                        {
                            tracing::debug!("Host subscriber disconnected: {}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Host server accept error: {}", e);
                }
            }
        }
    }

    async fn handle_connection(
        stream: UnixStream,
        broadcaster: HostBroadcaster,
        snapshot_tx: mpsc::Sender<SnapshotRequest>,
    ) -> Result<()> {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            return Ok(());
        }

        let request: SubscribeRequest = serde_json::from_str(line.trim()).unwrap_or_default();
        let filter = request.effective_filter();
        tracing::debug!("New host subscriber with filter: {:?}", filter);

        // Subscribe before asking for the snapshot so nothing falls in between.
        let mut subscription = broadcaster.subscribe(filter.clone());

        let (resp_tx, resp_rx) = oneshot::channel();
        if snapshot_tx.send(resp_tx).await.is_ok() {
            if let Ok(snapshot) = resp_rx.await {
                for queued in snapshot {
                    let wanted = match queued {
                        HostRequest::Setup { .. } => request.snapshot,
                        _ => filter.matches(&queued),
                    };
                    if wanted {
                        write_line(&mut writer, &queued).await?;
                    }
                }
            }
        }

        loop {
            match subscription.recv().await {
                Ok(request) => {
                    if filter.matches(&request) {
                        write_line(&mut writer, &request).await?;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Host subscriber lagged by {} requests", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }

        Ok(())
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, request: &HostRequest) -> Result<()> {
    let json = serde_json::to_string(request)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

impl Drop for HostServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// Sender side of the host request channel. Keeps the filter of every
/// attached host so a send can tell whether anyone wanted the request.
#[derive(Clone)]
pub struct HostBroadcaster {
    request_tx: broadcast::Sender<HostRequest>,
    filters: Arc<Mutex<HashMap<u64, HostFilter>>>,
    next_id: Arc<AtomicU64>,
}

impl HostBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (request_tx, _) = broadcast::channel(capacity);
        Self {
            request_tx,
            filters: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe(&self, filter: HostFilter) -> HostSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut filters) = self.filters.lock() {
            filters.insert(id, filter);
        }
        HostSubscription {
            id,
            request_rx: self.request_tx.subscribe(),
            filters: Arc::clone(&self.filters),
        }
    }

    /// Returns false when no attached host accepts this kind of request.
    pub fn send(&self, request: HostRequest) -> bool {
        let wanted = self
            .filters
            .lock()
            .map(|filters| filters.values().any(|f| f.matches(&request)))
            .unwrap_or(false);
        wanted && self.request_tx.send(request).is_ok()
    }
}

/// One attached host; unregisters its filter when dropped.
pub struct HostSubscription {
    id: u64,
    request_rx: broadcast::Receiver<HostRequest>,
    filters: Arc<Mutex<HashMap<u64, HostFilter>>>,
}

impl HostSubscription {
    pub async fn recv(&mut self) -> Result<HostRequest, broadcast::error::RecvError> {
        self.request_rx.recv().await
    }
}

impl Drop for HostSubscription {
    fn drop(&mut self) {
        if let Ok(mut filters) = self.filters.lock() {
            filters.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glass_ipc::{Bounds, WindowSetup};
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    fn setup() -> HostRequest {
        HostRequest::Setup {
            window: WindowSetup {
                main_bounds: Bounds::new(0, 0, 1000, 600),
                overlay_bounds: Bounds::new(50, 0, 900, 16),
                content_bounds: Bounds::default(),
                fullscreen: false,
                always_on_top: false,
                user_agent: "ua".to_string(),
                start_url: "https://www.crunchyroll.com".to_string(),
            },
        }
    }

    async fn read_request(stream: &mut UnixStream) -> HostRequest {
        let mut out = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            stream.read_exact(&mut byte).await.unwrap();
            if byte[0] == b'\n' {
                break;
            }
            out.push(byte[0]);
        }
        serde_json::from_slice(&out).unwrap()
    }

    fn welcome() -> HostRequest {
        HostRequest::Notify {
            title: "Glass Initialized!".to_string(),
            body: "Welcome".to_string(),
        }
    }

    async fn start(dir: &TempDir, snapshot: Vec<HostRequest>) -> (PathBuf, HostBroadcaster) {
        let path = dir.path().join("host.sock");
        let broadcaster = HostBroadcaster::new(8);
        let (snapshot_tx, mut snapshot_rx) = mpsc::channel::<SnapshotRequest>(4);

        let server = HostServer::with_socket_path(path.clone(), broadcaster.clone(), snapshot_tx);
        tokio::spawn(server.run());
        tokio::spawn(async move {
            while let Some(resp_tx) = snapshot_rx.recv().await {
                let _ = resp_tx.send(snapshot.clone());
            }
        });
        while !path.exists() {
            tokio::task::yield_now().await;
        }
        (path, broadcaster)
    }

    async fn attach(path: &std::path::Path, request: &SubscribeRequest) -> UnixStream {
        let mut stream = UnixStream::connect(path).await.unwrap();
        let json = serde_json::to_string(request).unwrap();
        stream.write_all(json.as_bytes()).await.unwrap();
        stream.write_all(b"\n").await.unwrap();
        stream
    }

    #[test]
    fn test_send_without_subscribers_reports_undelivered() {
        let broadcaster = HostBroadcaster::new(8);
        assert!(!broadcaster.send(HostRequest::Minimize));

        let subscription = broadcaster.subscribe(HostFilter::all());
        assert!(broadcaster.send(HostRequest::Minimize));

        drop(subscription);
        assert!(!broadcaster.send(HostRequest::Minimize));
    }

    #[test]
    fn test_send_respects_subscriber_filters() {
        let broadcaster = HostBroadcaster::new(8);
        let _overlay_only = broadcaster.subscribe(HostFilter {
            overlay: true,
            ..Default::default()
        });

        let load = HostRequest::LoadUrl {
            url: "https://www.netflix.com".to_string(),
            user_agent: "ua".to_string(),
        };
        assert!(!broadcaster.send(load.clone()));
        assert!(broadcaster.send(HostRequest::CloseGlass));

        let _content = broadcaster.subscribe(HostFilter {
            content: true,
            ..Default::default()
        });
        assert!(broadcaster.send(load));
    }

    #[tokio::test]
    async fn test_subscriber_gets_snapshot_then_filtered_requests() {
        let dir = TempDir::new().unwrap();
        let (path, broadcaster) = start(&dir, vec![setup(), welcome()]).await;

        let request = SubscribeRequest {
            snapshot: true,
            filter: HostFilter {
                window: true,
                ..Default::default()
            },
        };
        let mut stream = attach(&path, &request).await;
        assert_eq!(read_request(&mut stream).await, setup());

        assert!(!broadcaster.send(welcome()));
        assert!(broadcaster.send(HostRequest::Minimize));
        assert_eq!(read_request(&mut stream).await, HostRequest::Minimize);
    }

    #[tokio::test]
    async fn test_queued_notification_reaches_late_host() {
        let dir = TempDir::new().unwrap();
        let (path, broadcaster) = start(&dir, vec![setup(), welcome()]).await;

        let mut stream = attach(&path, &SubscribeRequest::default()).await;
        assert_eq!(read_request(&mut stream).await, welcome());

        assert!(broadcaster.send(HostRequest::Quit));
        assert_eq!(read_request(&mut stream).await, HostRequest::Quit);
    }
}
