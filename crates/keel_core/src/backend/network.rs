//! Network backend interface and the no-op backend.

use std::fmt;

use super::BackendError;

/// Which network backend a world is driving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NetworkRole {
    /// The no-op backend.
    #[default]
    Offline,
    /// Authoritative server.
    Server,
    /// Client connected to a server.
    Client,
}

impl NetworkRole {
    /// Lower-case name used in logs and errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Server => "server",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for NetworkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arguments for starting a network backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkParams {
    /// Start hosting.
    Server {
        /// Port to listen on.
        port: u16,
        /// Name of the hosting player.
        username: String,
    },
    /// Connect to a host.
    Client {
        /// Server address, `host:port`.
        address: String,
        /// Name to register with.
        username: String,
    },
}

/// Network backend.
///
/// Exactly one backend is active per world. When no transport is running the
/// world holds a [`NullNetwork`], so the frame loop never needs to check for
/// a missing backend.
pub trait NetworkBackend {
    /// Starts the backend.
    ///
    /// # Errors
    ///
    /// Wrong parameter kind for this backend, or a transport failure.
    fn init(&mut self, params: &NetworkParams) -> Result<(), BackendError>;

    /// Stops the backend and drops every connection.
    fn destroy(&mut self);

    /// Receives and dispatches pending traffic. Called once per frame.
    ///
    /// # Errors
    ///
    /// Transport failure.
    fn update(&mut self) -> Result<(), BackendError>;

    /// Whether the backend is running.
    fn initialized(&self) -> bool;
}

/// Backend that does nothing and never reports itself initialized.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNetwork;

impl NetworkBackend for NullNetwork {
    fn init(&mut self, _params: &NetworkParams) -> Result<(), BackendError> {
        Ok(())
    }

    fn destroy(&mut self) {}

    fn update(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn initialized(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_network_never_initializes() {
        let mut net = NullNetwork;
        assert!(!net.initialized());

        net.init(&NetworkParams::Server {
            port: 7777,
            username: "host".into(),
        })
        .unwrap();
        net.update().unwrap();
        assert!(!net.initialized());
    }
}
