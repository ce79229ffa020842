//! # Server Backend
//!
//! Authoritative host. Keeps a registry of connected players keyed by peer,
//! admits newcomers up to [`ServerConfig::max_clients`], and queues gameplay
//! payloads for the game to drain.
//!
//! The hosting player is registered under [`PeerId::HOST`] on `init` and
//! does not count against the client limit.

use std::collections::{BTreeMap, VecDeque};

use keel_core::{BackendError, EntityId, NetworkBackend, NetworkParams};
use tracing::{debug, info, warn};

use crate::transport::{Packet, PeerId, Transport, TransportError};
use crate::DEFAULT_MAX_CLIENTS;

/// Reason sent to a peer turned away because the server is full.
pub const REJECT_FULL: &str = "server full";

/// Server settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Remote players admitted at once, host excluded.
    pub max_clients: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_clients: DEFAULT_MAX_CLIENTS,
        }
    }
}

/// A player known to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    /// Name given on connect.
    pub username: String,
    /// Transport identity.
    pub peer: PeerId,
    /// Entity the game assigned to this player, if any.
    pub entity: Option<EntityId>,
    /// Server tick at which the player joined.
    pub joined_tick: u64,
}

/// Server backend over any [`Transport`].
#[derive(Debug)]
pub struct Server<T: Transport> {
    transport: T,
    config: ServerConfig,
    players: BTreeMap<PeerId, Player>,
    inbox: VecDeque<(PeerId, Vec<u8>)>,
    port: Option<u16>,
    tick: u64,
}

impl<T: Transport> Server<T> {
    /// Creates a stopped server on `transport`.
    pub fn new(transport: T, config: ServerConfig) -> Self {
        Self {
            transport,
            config,
            players: BTreeMap::new(),
            inbox: VecDeque::new(),
            port: None,
            tick: 0,
        }
    }

    /// Every registered player, host first.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Player registered under `peer`.
    #[must_use]
    pub fn player(&self, peer: PeerId) -> Option<&Player> {
        self.players.get(&peer)
    }

    /// The hosting player, once started.
    #[must_use]
    pub fn host(&self) -> Option<&Player> {
        self.players.get(&PeerId::HOST)
    }

    /// Connected remote players.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.players.keys().filter(|p| **p != PeerId::HOST).count()
    }

    /// Updates processed since start.
    #[inline]
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Port given on `init`.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Settings in use.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Underlying transport.
    #[inline]
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Takes every queued payload in arrival order.
    pub fn drain_payloads(&mut self) -> impl Iterator<Item = (PeerId, Vec<u8>)> + '_ {
        self.inbox.drain(..)
    }

    /// Records the entity driving `peer`'s player. Returns `false` for an
    /// unknown peer.
    pub fn assign_entity(&mut self, peer: PeerId, entity: EntityId) -> bool {
        match self.players.get_mut(&peer) {
            Some(player) => {
                player.entity = Some(entity);
                true
            }
            None => false,
        }
    }

    /// Sends `bytes` to every remote player. Returns how many were reached.
    pub fn broadcast(&mut self, bytes: &[u8]) -> usize {
        let remotes = self.remote_peers();

        let mut reached = 0;
        for peer in remotes {
            match self.transport.send(peer, Packet::Payload(bytes.to_vec())) {
                Ok(()) => reached += 1,
                Err(e) => warn!(%peer, error = %e, "Broadcast failed"),
            }
        }
        reached
    }

    fn remote_peers(&self) -> Vec<PeerId> {
        self.players
            .keys()
            .copied()
            .filter(|p| *p != PeerId::HOST)
            .collect()
    }

    fn admit(&mut self, peer: PeerId, username: String) {
        if self.players.contains_key(&peer) {
            warn!(%peer, "Duplicate connect ignored");
            return;
        }

        if self.client_count() >= self.config.max_clients {
            let max_clients = self.config.max_clients;
            info!(%peer, %username, max_clients, "Rejecting player, server full");
            let reject = Packet::Reject {
                reason: REJECT_FULL.to_owned(),
            };
            if let Err(e) = self.transport.send(peer, reject) {
                warn!(%peer, error = %e, "Reject not delivered");
            }
            self.transport.disconnect(peer);
            return;
        }

        if let Err(e) = self.transport.send(peer, Packet::Accept { peer }) {
            warn!(%peer, error = %e, "Peer vanished during handshake");
            self.transport.disconnect(peer);
            return;
        }

        info!(%peer, %username, tick = self.tick, "Player joined");
        self.players.insert(
            peer,
            Player {
                username,
                peer,
                entity: None,
                joined_tick: self.tick,
            },
        );
    }

    fn drop_player(&mut self, peer: PeerId) {
        if let Some(player) = self.players.remove(&peer) {
            info!(%peer, username = %player.username, "Player left");
        }
        self.transport.disconnect(peer);
    }
}

impl<T: Transport> NetworkBackend for Server<T> {
    fn init(&mut self, params: &NetworkParams) -> Result<(), BackendError> {
        let NetworkParams::Server { port, username } = params else {
            return Err(BackendError::new("server", "expected server parameters"));
        };

        self.players.clear();
        self.inbox.clear();
        self.tick = 0;
        self.port = Some(*port);
        self.players.insert(
            PeerId::HOST,
            Player {
                username: username.clone(),
                peer: PeerId::HOST,
                entity: None,
                joined_tick: 0,
            },
        );

        info!(port, %username, max_clients = self.config.max_clients, "Server started");
        Ok(())
    }

    fn destroy(&mut self) {
        let remotes = self.remote_peers();
        for peer in remotes {
            if let Err(e) = self.transport.send(peer, Packet::Disconnect) {
                warn!(%peer, error = %e, "Disconnect not delivered");
            }
            self.transport.disconnect(peer);
        }

        self.players.clear();
        self.inbox.clear();
        self.port = None;
        info!(tick = self.tick, "Server stopped");
    }

    fn update(&mut self) -> Result<(), BackendError> {
        if self.port.is_none() {
            return Ok(());
        }

        loop {
            let (peer, packet) = match self.transport.recv() {
                Ok(Some(message)) => message,
                Ok(None) | Err(TransportError::Closed) => break,
                Err(e) => return Err(BackendError::new("server", e.to_string())),
            };

            match packet {
                Packet::Connect { username } => self.admit(peer, username),
                Packet::Disconnect => self.drop_player(peer),
                Packet::Payload(bytes) => {
                    if self.players.contains_key(&peer) {
                        self.inbox.push_back((peer, bytes));
                    } else {
                        debug!(%peer, "Payload from unknown peer dropped");
                    }
                }
                Packet::Accept { .. } | Packet::Reject { .. } => {
                    warn!(%peer, "Unexpected handshake reply sent to server");
                }
            }
        }

        self.tick += 1;
        Ok(())
    }

    fn initialized(&self) -> bool {
        self.port.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ChannelHub;

    fn start(max_clients: usize) -> (ChannelHub, Server<crate::HostEndpoint>) {
        let hub = ChannelHub::new();
        let mut server = Server::new(hub.host(), ServerConfig { max_clients });
        server
            .init(&NetworkParams::Server {
                port: 7777,
                username: "host".into(),
            })
            .unwrap();
        (hub, server)
    }

    #[test]
    fn test_init_registers_host() {
        let (_hub, server) = start(2);
        assert!(server.initialized());
        assert_eq!(server.port(), Some(7777));
        assert_eq!(server.host().map(|p| p.username.as_str()), Some("host"));
        assert_eq!(server.client_count(), 0);
    }

    #[test]
    fn test_rejects_client_params() {
        let hub = ChannelHub::new();
        let mut server = Server::new(hub.host(), ServerConfig::default());
        let result = server.init(&NetworkParams::Client {
            address: "127.0.0.1:7777".into(),
            username: "guest".into(),
        });
        assert!(result.is_err());
        assert!(!server.initialized());
    }

    #[test]
    fn test_payloads_queue_per_player() {
        let (mut hub, mut server) = start(2);
        let mut peer = hub.connect();

        peer.send(PeerId::HOST, Packet::Connect { username: "a".into() }).unwrap();
        peer.send(PeerId::HOST, Packet::Payload(vec![9])).unwrap();
        server.update().unwrap();

        let drained: Vec<_> = server.drain_payloads().collect();
        assert_eq!(drained, vec![(peer.id(), vec![9])]);
        assert_eq!(server.tick(), 1);
        assert!(server.assign_entity(peer.id(), EntityId::new(3)));
        assert_eq!(server.player(peer.id()).and_then(|p| p.entity), Some(EntityId::new(3)));
    }

    #[test]
    fn test_reject_to_a_vanished_peer_is_counted() {
        let (mut hub, mut server) = start(0);
        let peer = hub.connect();
        let mut gone = hub.connect();
        gone.send(PeerId::HOST, Packet::Connect { username: "late".into() }).unwrap();
        drop(gone);

        server.update().unwrap();

        assert_eq!(server.client_count(), 0);
        assert_eq!(server.transport().stats().send_errors, 1);
        assert_eq!(hub.peer_count(), 1);
        drop(peer);
    }

    #[test]
    fn test_shutdown_survives_vanished_players() {
        let (mut hub, mut server) = start(2);
        let mut a = hub.connect();
        let mut b = hub.connect();
        a.send(PeerId::HOST, Packet::Connect { username: "a".into() }).unwrap();
        b.send(PeerId::HOST, Packet::Connect { username: "b".into() }).unwrap();
        server.update().unwrap();
        assert_eq!(server.client_count(), 2);
        drop(b);

        server.destroy();

        assert!(!server.initialized());
        assert_eq!(server.transport().stats().send_errors, 1);
        assert_eq!(hub.peer_count(), 0);
        assert!(matches!(a.recv().unwrap(), Some((_, Packet::Accept { .. }))));
        assert_eq!(a.recv().unwrap(), Some((PeerId::HOST, Packet::Disconnect)));
    }

    #[test]
    fn test_broadcast_reaches_remotes_only() {
        let (mut hub, mut server) = start(4);
        let mut a = hub.connect();
        let mut b = hub.connect();
        a.send(PeerId::HOST, Packet::Connect { username: "a".into() }).unwrap();
        b.send(PeerId::HOST, Packet::Connect { username: "b".into() }).unwrap();
        server.update().unwrap();

        assert_eq!(server.broadcast(&[1, 2]), 2);
        for peer in [&mut a, &mut b] {
            assert!(matches!(peer.recv().unwrap(), Some((_, Packet::Accept { .. }))));
            assert_eq!(peer.recv().unwrap(), Some((PeerId::HOST, Packet::Payload(vec![1, 2]))));
        }
    }
}
