//! Listener, session registry and graceful shutdown.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{error, info};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::config::ServerOpts;
use crate::constants::{DEFAULT_LISTEN_ADDR, DEFAULT_PORT};
use crate::error::ServerError;
use crate::session;

/// Accepts control connections and runs one session task per client.
///
/// Shared behind an `Arc` so `shutdown` can be called from another task
/// while `listen_and_serve` blocks.
pub struct Server {
    opts: Arc<ServerOpts>,
    sessions: Arc<Mutex<HashMap<u64, JoinHandle<()>>>>,
    next_id: AtomicU64,
    shutdown_tx: watch::Sender<bool>,
}

impl Server {
    pub fn new(mut opts: ServerOpts) -> Self {
        if opts.name.is_empty() {
            opts.name = "ferroftpd".to_string();
        }
        if opts.hostname.is_empty() {
            opts.hostname = DEFAULT_LISTEN_ADDR.to_string();
        }
        if opts.port == 0 {
            opts.port = DEFAULT_PORT;
        }
        let (shutdown_tx, _) = watch::channel(false);
        Server {
            opts: Arc::new(opts),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
            shutdown_tx,
        }
    }

    /// Binds according to the options and serves until shutdown.
    pub async fn listen_and_serve(&self) -> Result<(), ServerError> {
        // IPv6 hosts need bracketing to survive the port join.
        let addr = if self.opts.hostname.contains(':') {
            format!("[{}]:{}", self.opts.hostname, self.opts.port)
        } else {
            format!("{}:{}", self.opts.hostname, self.opts.port)
        };
        let listener = TcpListener::bind(&addr).await?;
        info!("{} listening on {}", self.opts.name, addr);
        self.serve(listener).await
    }

    /// Serves on an externally bound listener until shutdown, at which
    /// point the listener is dropped and [`ServerError::Closed`] is
    /// returned.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        let mut shutdown = self.shutdown_tx.subscribe();
        if *shutdown.borrow() {
            return Err(ServerError::Closed);
        }
        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, _)) => self.spawn_session(stream).await,
                    Err(e) => error!("accept failed: {}", e),
                },
                _ = shutdown.changed() => return Err(ServerError::Closed),
            }
        }
    }

    async fn spawn_session(&self, stream: TcpStream) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let opts = Arc::clone(&self.opts);
        let rx = self.shutdown_tx.subscribe();
        let registry = Arc::clone(&self.sessions);

        // Holding the registry lock across the spawn delays the task's
        // self-removal until its handle is registered.
        let mut sessions = self.sessions.lock().await;
        let handle = tokio::spawn(async move {
            session::run_session(id, stream, opts, rx).await;
            registry.lock().await.remove(&id);
        });
        sessions.insert(id, handle);
    }

    /// Initiates a graceful stop: the accept loop returns
    /// [`ServerError::Closed`], every live session is told to close, and
    /// this call returns once all of their tasks have ended. Safe to call
    /// more than once.
    pub async fn shutdown(&self) -> Result<(), ServerError> {
        self.shutdown_tx.send_replace(true);
        loop {
            let drained: Vec<JoinHandle<()>> = {
                let mut sessions = self.sessions.lock().await;
                sessions.drain().map(|(_, handle)| handle).collect()
            };
            if drained.is_empty() {
                return Ok(());
            }
            for handle in drained {
                let _ = handle.await;
            }
        }
    }
}
