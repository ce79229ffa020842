//! # KEEL Networking
//!
//! Server and client backends for the world's network slot.
//!
//! - **Server**: registry of connected players, admission up to a client
//!   limit, payload queue, tick counter
//! - **Client**: connect handshake with timeout, loss detection
//! - **Transport**: the delivery seam both backends sit on, with an
//!   in-process implementation over channels
//!
//! ```text
//! CLIENT                           SERVER
//!   |--- Connect { username } ------->|
//!   |<-- Accept { peer } / Reject ----|
//!   |<========= Payload =============>|
//!   |--- Disconnect ----------------->|
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use keel_networking::{ChannelHub, Client, ClientConfig, Server, ServerConfig};
//!
//! let mut hub = ChannelHub::new();
//! let server = Server::new(hub.host(), ServerConfig::default());
//! let client = Client::new(hub.connect(), ClientConfig::default());
//!
//! let deps = Dependencies::new(render, environment)
//!     .with_server(Box::new(server))
//!     .with_client(Box::new(client));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod client;
pub mod server;
pub mod transport;

pub use client::{Client, ClientConfig, ClientState};
pub use server::{Player, Server, ServerConfig};
pub use transport::{
    ChannelHub, HostEndpoint, Packet, PeerEndpoint, PeerId, Transport, TransportError,
    TransportStats,
};

/// Port a server listens on when none is configured.
pub const DEFAULT_PORT: u16 = 7777;

/// Remote players a server admits by default.
pub const DEFAULT_MAX_CLIENTS: usize = 16;
