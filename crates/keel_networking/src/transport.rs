//! # Transport Layer
//!
//! Message delivery between a host and its peers. The backends only see the
//! [`Transport`] trait; [`ChannelHub`] provides an in-process implementation
//! over `crossbeam-channel`.
//!
//! ```text
//!              ┌──────────── inbound (PeerId, Packet) ◀─────────────┐
//!              ▼                                                    │
//! ┌────────────────┐   per-peer Sender<Packet>   ┌─────────────────┐
//! │ HostEndpoint   │────────────────────────────▶│ PeerEndpoint ×N │
//! └────────────────┘                             └─────────────────┘
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use parking_lot::Mutex;
use thiserror::Error;

/// Identifier of a connected peer, assigned by the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u32);

impl PeerId {
    /// The host side of a connection.
    pub const HOST: Self = Self(0);
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer#{}", self.0)
    }
}

/// Messages exchanged between host and peers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Packet {
    /// Peer asks to join.
    Connect {
        /// Name the player registers with.
        username: String,
    },
    /// Host admitted the peer.
    Accept {
        /// ID the host knows the peer by.
        peer: PeerId,
    },
    /// Host refused the peer.
    Reject {
        /// Human-readable reason.
        reason: String,
    },
    /// Either side is leaving.
    Disconnect,
    /// Gameplay data.
    Payload(Vec<u8>),
}

impl Packet {
    /// Approximate encoded size, used for traffic statistics.
    #[must_use]
    pub fn wire_size(&self) -> usize {
        1 + match self {
            Self::Connect { username } => username.len(),
            Self::Accept { .. } => 4,
            Self::Reject { reason } => reason.len(),
            Self::Disconnect => 0,
            Self::Payload(bytes) => bytes.len(),
        }
    }
}

/// Transport failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// No peer with this ID is connected.
    #[error("{0} is not connected")]
    UnknownPeer(PeerId),
    /// The other side is gone.
    #[error("channel closed")]
    Closed,
}

/// Transport statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Packets sent.
    pub packets_sent: u64,
    /// Packets received.
    pub packets_received: u64,
    /// Bytes sent.
    pub bytes_sent: u64,
    /// Bytes received.
    pub bytes_received: u64,
    /// Send errors.
    pub send_errors: u64,
}

impl TransportStats {
    fn record_send(&mut self, packet: &Packet) {
        self.packets_sent += 1;
        self.bytes_sent += packet.wire_size() as u64;
    }

    fn record_recv(&mut self, packet: &Packet) {
        self.packets_received += 1;
        self.bytes_received += packet.wire_size() as u64;
    }
}

/// Packet delivery used by the network backends.
pub trait Transport {
    /// Sends `packet` to `to`. Peers ignore `to` and always reach the host.
    ///
    /// # Errors
    ///
    /// [`TransportError::UnknownPeer`] or [`TransportError::Closed`].
    fn send(&mut self, to: PeerId, packet: Packet) -> Result<(), TransportError>;

    /// Next pending packet, `None` when the queue is empty.
    ///
    /// # Errors
    ///
    /// [`TransportError::Closed`] once the other side is gone and the
    /// queue is drained.
    fn recv(&mut self) -> Result<Option<(PeerId, Packet)>, TransportError>;

    /// Drops a peer; later sends to it fail.
    fn disconnect(&mut self, _peer: PeerId) {}

    /// Traffic counters.
    fn stats(&self) -> TransportStats;
}

type PeerTable = Arc<Mutex<HashMap<PeerId, Sender<Packet>>>>;

/// In-process switchboard handing out a host endpoint and peer endpoints.
#[derive(Debug)]
pub struct ChannelHub {
    inbound_tx: Sender<(PeerId, Packet)>,
    inbound_rx: Receiver<(PeerId, Packet)>,
    peers: PeerTable,
    next_peer: u32,
}

impl Default for ChannelHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        let (inbound_tx, inbound_rx) = unbounded();
        Self {
            inbound_tx,
            inbound_rx,
            peers: PeerTable::default(),
            next_peer: 1,
        }
    }

    /// The host side. Every call returns a handle on the same inbound queue.
    #[must_use]
    pub fn host(&self) -> HostEndpoint {
        HostEndpoint {
            inbound: self.inbound_rx.clone(),
            peers: Arc::clone(&self.peers),
            stats: TransportStats::default(),
        }
    }

    /// A new peer side with a fresh [`PeerId`].
    pub fn connect(&mut self) -> PeerEndpoint {
        let id = PeerId(self.next_peer);
        self.next_peer += 1;

        let (to_peer, from_host) = unbounded();
        self.peers.lock().insert(id, to_peer);

        PeerEndpoint {
            id,
            to_host: self.inbound_tx.clone(),
            from_host,
            stats: TransportStats::default(),
        }
    }

    /// Number of peers the host can still reach.
    #[must_use]
    pub fn peer_count(&self) -> usize {
        self.peers.lock().len()
    }
}

/// Host end of a [`ChannelHub`].
#[derive(Debug)]
pub struct HostEndpoint {
    inbound: Receiver<(PeerId, Packet)>,
    peers: PeerTable,
    stats: TransportStats,
}

impl Transport for HostEndpoint {
    fn send(&mut self, to: PeerId, packet: Packet) -> Result<(), TransportError> {
        let sent = match self.peers.lock().get(&to) {
            Some(sender) => {
                let size_probe = packet.clone();
                sender
                    .send(packet)
                    .map(|()| size_probe)
                    .map_err(|_| TransportError::Closed)
            }
            None => Err(TransportError::UnknownPeer(to)),
        };

        match sent {
            Ok(packet) => {
                self.stats.record_send(&packet);
                Ok(())
            }
            Err(e) => {
                self.stats.send_errors += 1;
                Err(e)
            }
        }
    }

    fn recv(&mut self) -> Result<Option<(PeerId, Packet)>, TransportError> {
        match self.inbound.try_recv() {
            Ok((peer, packet)) => {
                self.stats.record_recv(&packet);
                Ok(Some((peer, packet)))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TransportError::Closed),
        }
    }

    fn disconnect(&mut self, peer: PeerId) {
        self.peers.lock().remove(&peer);
    }

    fn stats(&self) -> TransportStats {
        self.stats
    }
}

/// Peer end of a [`ChannelHub`].
#[derive(Debug)]
pub struct PeerEndpoint {
    id: PeerId,
    to_host: Sender<(PeerId, Packet)>,
    from_host: Receiver<Packet>,
    stats: TransportStats,
}

impl PeerEndpoint {
    /// ID the host knows this endpoint by.
    #[must_use]
    pub const fn id(&self) -> PeerId {
        self.id
    }
}

impl Transport for PeerEndpoint {
    fn send(&mut self, _to: PeerId, packet: Packet) -> Result<(), TransportError> {
        let size = packet.wire_size() as u64;
        match self.to_host.send((self.id, packet)) {
            Ok(()) => {
                self.stats.packets_sent += 1;
                self.stats.bytes_sent += size;
                Ok(())
            }
            Err(_) => {
                self.stats.send_errors += 1;
                Err(TransportError::Closed)
            }
        }
    }

    fn recv(&mut self) -> Result<Option<(PeerId, Packet)>, TransportError> {
        match self.from_host.try_recv() {
            Ok(packet) => {
                self.stats.record_recv(&packet);
                Ok(Some((PeerId::HOST, packet)))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TransportError::Closed),
        }
    }

    fn stats(&self) -> TransportStats {
        self.stats
    }
}
