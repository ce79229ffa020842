//! # Client Backend
//!
//! ```text
//! Disconnected ──init──▶ Connecting ──Accept──▶ Connected
//!      ▲                     │                      │
//!      └──── Reject/timeout ─┘◀── Disconnect/loss ──┘
//! ```
//!
//! The client reports itself initialized while connecting or connected. A
//! lost server drops it back to `Disconnected`, which the world notices on
//! its next resume.

use std::collections::VecDeque;

use keel_core::{BackendError, NetworkBackend, NetworkParams};
use tracing::{debug, info, warn};

use crate::transport::{Packet, PeerId, Transport, TransportError};

/// Default number of updates to wait for the host's answer.
pub const DEFAULT_CONNECT_TIMEOUT_TICKS: u32 = 300;

/// Connection state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClientState {
    /// Not connected.
    #[default]
    Disconnected,
    /// Connect sent, waiting for the host.
    Connecting,
    /// Admitted by the host.
    Connected,
}

/// Client settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Updates spent in `Connecting` before giving up.
    pub connect_timeout_ticks: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ticks: DEFAULT_CONNECT_TIMEOUT_TICKS,
        }
    }
}

/// Client backend over any [`Transport`].
#[derive(Debug)]
pub struct Client<T: Transport> {
    transport: T,
    config: ClientConfig,
    state: ClientState,
    address: Option<String>,
    username: String,
    peer: Option<PeerId>,
    waited: u32,
    inbox: VecDeque<Vec<u8>>,
}

impl<T: Transport> Client<T> {
    /// Creates a disconnected client on `transport`.
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            state: ClientState::Disconnected,
            address: None,
            username: String::new(),
            peer: None,
            waited: 0,
            inbox: VecDeque::new(),
        }
    }

    /// Current connection state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ClientState {
        self.state
    }

    /// ID the host assigned, once connected.
    #[inline]
    #[must_use]
    pub const fn peer(&self) -> Option<PeerId> {
        self.peer
    }

    /// Address given on `init`.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Name registered with the host.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Underlying transport.
    #[inline]
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Takes every payload received from the host.
    pub fn drain_payloads(&mut self) -> impl Iterator<Item = Vec<u8>> + '_ {
        self.inbox.drain(..)
    }

    /// Sends gameplay data to the host.
    ///
    /// # Errors
    ///
    /// Not connected, or the transport failed.
    pub fn send(&mut self, bytes: Vec<u8>) -> Result<(), BackendError> {
        if self.state != ClientState::Connected {
            return Err(BackendError::new("client", "not connected"));
        }
        self.transport
            .send(PeerId::HOST, Packet::Payload(bytes))
            .map_err(|e| BackendError::new("client", e.to_string()))
    }

    fn lose(&mut self, why: &str) {
        if self.state != ClientState::Disconnected {
            warn!(reason = why, "Disconnected from server");
        }
        self.state = ClientState::Disconnected;
        self.peer = None;
    }
}

impl<T: Transport> NetworkBackend for Client<T> {
    fn init(&mut self, params: &NetworkParams) -> Result<(), BackendError> {
        let NetworkParams::Client { address, username } = params else {
            return Err(BackendError::new("client", "expected client parameters"));
        };

        self.transport
            .send(
                PeerId::HOST,
                Packet::Connect {
                    username: username.clone(),
                },
            )
            .map_err(|e| BackendError::new("client", e.to_string()))?;

        self.address = Some(address.clone());
        self.username.clone_from(username);
        self.state = ClientState::Connecting;
        self.peer = None;
        self.waited = 0;
        self.inbox.clear();

        info!(%address, %username, "Connecting to server");
        Ok(())
    }

    fn destroy(&mut self) {
        if self.state != ClientState::Disconnected {
            if let Err(e) = self.transport.send(PeerId::HOST, Packet::Disconnect) {
                warn!(error = %e, "Disconnect not delivered");
            }
        }
        self.state = ClientState::Disconnected;
        self.peer = None;
        self.inbox.clear();
        info!("Client stopped");
    }

    fn update(&mut self) -> Result<(), BackendError> {
        if self.state == ClientState::Disconnected {
            return Ok(());
        }

        loop {
            let packet = match self.transport.recv() {
                Ok(Some((_, packet))) => packet,
                Ok(None) => break,
                Err(TransportError::Closed) => {
                    self.lose("connection lost");
                    return Ok(());
                }
                Err(e) => return Err(BackendError::new("client", e.to_string())),
            };

            match packet {
                Packet::Accept { peer } => {
                    self.state = ClientState::Connected;
                    self.peer = Some(peer);
                    info!(%peer, "Connected to server");
                }
                Packet::Reject { reason } => {
                    self.lose(&reason);
                    return Ok(());
                }
                Packet::Disconnect => {
                    self.lose("server closed the connection");
                    return Ok(());
                }
                Packet::Payload(bytes) => {
                    if self.state == ClientState::Connected {
                        self.inbox.push_back(bytes);
                    } else {
                        debug!("Payload before handshake dropped");
                    }
                }
                Packet::Connect { .. } => warn!("Unexpected connect sent to client"),
            }
        }

        if self.state == ClientState::Connecting {
            self.waited += 1;
            if self.waited > self.config.connect_timeout_ticks {
                self.lose("handshake timed out");
            }
        }
        Ok(())
    }

    fn initialized(&self) -> bool {
        self.state != ClientState::Disconnected
    }
}
