//! WebSocket hub for managing peer connections and broadcasting chat traffic.

use dashmap::DashMap;
use log::{debug, info, warn};
use std::net::SocketAddr;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::wordlist;

/// Size of the per-connection send buffer.
const CONNECTION_BUFFER_SIZE: usize = 64;

/// Identifier a connection keeps for its registry lifetime.
pub type PeerId = Uuid;

/// A sender for text frames to a specific peer.
pub type PeerSender = mpsc::Sender<String>;

/// One registered connection.
struct Peer {
    name: String,
    addr: SocketAddr,
    outbound: PeerSender,
}

/// Hub managing all live WebSocket connections.
///
/// The hub is responsible for:
/// - Tracking active connections and their assigned display names
/// - Fanning chat messages out to the whole room
/// - Delivering command replies to a single peer
pub struct ChatHub {
    peers: DashMap<PeerId, Peer>,
}

impl ChatHub {
    /// Create a new hub with no connections.
    pub fn new() -> Self {
        Self {
            peers: DashMap::new(),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the peer id, the display name derived from it, and the
    /// receiver the connection's writer task drains.
    pub fn register(&self, addr: SocketAddr) -> (PeerId, String, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(CONNECTION_BUFFER_SIZE);
        let id = Uuid::new_v4();
        let name = wordlist::display_name(&id);
        self.peers.insert(
            id,
            Peer {
                name: name.clone(),
                addr,
                outbound: tx,
            },
        );
        info!("{addr} connects as {name}");
        (id, name, rx)
    }

    /// Remove a connection from the registry.
    ///
    /// Safe to call more than once; only the call that actually removes the
    /// entry logs the disconnect and returns `true`.
    pub fn release(&self, id: &PeerId) -> bool {
        match self.peers.remove(id) {
            Some((_, peer)) => {
                info!("{} ({}) disconnects", peer.addr, peer.name);
                true
            }
            None => false,
        }
    }

    /// Broadcast a text frame to every connected peer, the sender included.
    ///
    /// Delivery never blocks: a peer whose buffer is full has this frame
    /// dropped, so one slow reader cannot stall the room. Peers that
    /// disconnect mid-broadcast are skipped; their own teardown removes them.
    pub fn broadcast(&self, message: &str) {
        let targets: Vec<(String, PeerSender)> = self
            .peers
            .iter()
            .map(|entry| (entry.value().name.clone(), entry.value().outbound.clone()))
            .collect();

        for (name, tx) in targets {
            match tx.try_send(message.to_string()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("Dropping frame for slow peer {name}");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("Peer {name} is gone, skipping");
                }
            }
        }
    }

    /// Send a frame to one peer only.
    pub async fn send_to(&self, id: &PeerId, message: String) {
        let tx = self.peers.get(id).map(|peer| peer.outbound.clone());
        if let Some(tx) = tx {
            if tx.send(message).await.is_err() {
                warn!("Failed to deliver reply to peer {id}");
            }
        }
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.peers.len()
    }
}

impl Default for ChatHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn test_addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[tokio::test]
    async fn test_register_assigns_display_name() {
        let hub = ChatHub::new();
        let (_id, name, _rx) = hub.register(test_addr(40001));

        let parts: Vec<&str> = name.split('-').collect();
        assert_eq!(parts.len(), 2);
        assert!(!parts[0].is_empty() && !parts[1].is_empty());
        assert_eq!(hub.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let hub = ChatHub::new();
        let (id, _name, _rx) = hub.register(test_addr(40002));

        assert!(hub.release(&id));
        assert!(!hub.release(&id));
        assert_eq!(hub.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_peer() {
        let hub = ChatHub::new();
        let (_a, _, mut rx_a) = hub.register(test_addr(40003));
        let (_b, _, mut rx_b) = hub.register(test_addr(40004));

        hub.broadcast("room: hello");

        assert_eq!(rx_a.recv().await.as_deref(), Some("room: hello"));
        assert_eq!(rx_b.recv().await.as_deref(), Some("room: hello"));
    }

    #[tokio::test]
    async fn test_broadcast_skips_released_peer() {
        let hub = ChatHub::new();
        let (_a, _, mut rx_a) = hub.register(test_addr(40005));
        let (b, _, mut rx_b) = hub.register(test_addr(40006));

        hub.release(&b);
        hub.broadcast("still here?");

        assert_eq!(rx_a.recv().await.as_deref(), Some("still here?"));
        // The released peer's sender was dropped with its registry entry.
        assert!(rx_b.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_full_buffer_drops_frames_without_blocking() {
        let hub = ChatHub::new();
        let (_id, _, mut rx) = hub.register(test_addr(40007));

        for i in 0..CONNECTION_BUFFER_SIZE + 5 {
            hub.broadcast(&format!("frame {i}"));
        }

        let mut delivered = 0;
        while rx.try_recv().is_ok() {
            delivered += 1;
        }
        assert_eq!(delivered, CONNECTION_BUFFER_SIZE);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_settle() {
        let hub = Arc::new(ChatHub::new());

        let mut handles = Vec::new();
        for port in 0..16u16 {
            let hub = hub.clone();
            handles.push(tokio::spawn(async move {
                hub.register(test_addr(41000 + port))
            }));
        }

        let mut peers = Vec::new();
        for handle in handles {
            peers.push(handle.await.unwrap());
        }
        assert_eq!(hub.connection_count(), 16);

        for (id, _, _) in &peers {
            assert!(hub.release(id));
        }
        assert_eq!(hub.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_send_to_targets_one_peer() {
        let hub = ChatHub::new();
        let (a, _, mut rx_a) = hub.register(test_addr(40008));
        let (_b, _, mut rx_b) = hub.register(test_addr(40009));

        hub.send_to(&a, "private reply".to_string()).await;

        assert_eq!(rx_a.recv().await.as_deref(), Some("private reply"));
        assert!(rx_b.try_recv().is_err());
    }
}
