//! Online/offline tracking.
//!
//! The current state lives in a `watch` channel so views can both read it
//! synchronously and await transitions. It can be driven by hand or by a
//! background TCP reachability probe against the API host.

use std::sync::Arc;

use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use url::Url;

use crate::config::{PROBE_INTERVAL, PROBE_TIMEOUT};
use crate::error::PokedexError;

/// Shared connectivity flag. Clones observe the same state.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityMonitor {
    /// Creates a monitor starting in the given state.
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx: Arc::new(tx) }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Updates the state, notifying subscribers only on an actual change.
    pub fn set_online(&self, online: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            if online {
                tracing::info!("Connectivity restored");
            } else {
                tracing::warn!("Connectivity lost");
            }
        }
    }

    /// Receiver that wakes on every online/offline transition.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Spawns a task that periodically checks whether the host behind
    /// `base_url` accepts TCP connections and updates the state accordingly.
    pub fn spawn_probe(&self, base_url: &str) -> Result<JoinHandle<()>, PokedexError> {
        let (host, port) = probe_target(base_url)?;
        let monitor = self.clone();
        Ok(tokio::spawn(async move {
            loop {
                let reachable = matches!(
                    timeout(PROBE_TIMEOUT, TcpStream::connect((host.as_str(), port))).await,
                    Ok(Ok(_))
                );
                monitor.set_online(reachable);
                sleep(PROBE_INTERVAL).await;
            }
        }))
    }
}

/// Host and port to probe for an API root URL.
fn probe_target(base_url: &str) -> Result<(String, u16), PokedexError> {
    let url = Url::parse(base_url)
        .map_err(|e| PokedexError::InvalidInput(format!("invalid base URL: {}", e)))?;
    let host = url
        .host_str()
        .ok_or_else(|| PokedexError::InvalidInput(format!("base URL has no host: {}", base_url)))?
        .to_string();
    let port = url
        .port_or_known_default()
        .ok_or_else(|| PokedexError::InvalidInput(format!("base URL has no port: {}", base_url)))?;
    Ok((host, port))
}
