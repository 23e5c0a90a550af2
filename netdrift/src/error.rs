//! Error types for netdrift.
//!
//! Two families live here. The SSH stack (`TransportError`, `ChannelError`,
//! `PlatformError`) reports rich, layered failures. The sweep contract
//! (`ConnectionFailure`, `ExecutionFailure`, `InventoryError`) is what the
//! orchestrator records per device; the SSH errors normalize into it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for netdrift operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Platform/dialect errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Opening a device session failed
    #[error("Connection failure: {0}")]
    Connection(#[from] ConnectionFailure),

    /// Running a command on an open session failed
    #[error("Execution failure: {0}")]
    Execution(#[from] ExecutionFailure),

    /// Inventory lookups failed
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// The sweep could not begin
    #[error("Sweep error: {0}")]
    Sweep(#[from] SweepError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key does not match the known_hosts entry
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host is not present in known_hosts (strict checking)
    #[error("Host key for {host}:{port} is unknown")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Channel layer errors (prompt matching, PTY operations).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Pattern matching timed out
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(#[from] russh::Error),
}

/// Platform/dialect definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// No platform registered under this dialect tag
    #[error("Unknown platform: '{name}'")]
    UnknownPlatform { name: String },

    /// A platform with this name is already registered
    #[error("Platform '{name}' is already registered")]
    AlreadyRegistered { name: String },

    /// Prompt pattern does not compile
    #[error("Invalid platform definition '{name}': {message}")]
    InvalidDefinition { name: String, message: String },
}

/// Coarse classification of a [`ConnectionFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionFailureKind {
    Timeout,
    AuthRejected,
    Other,
}

/// Failure to open a session to a device.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionFailure {
    /// Handshake or authentication did not finish in time
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),

    /// The device rejected the credentials
    #[error("authentication rejected for user '{user}'")]
    AuthRejected { user: String },

    /// Any other transport problem
    #[error("connection failed: {0}")]
    Other(String),
}

impl ConnectionFailure {
    /// Get the failure classification.
    pub fn kind(&self) -> ConnectionFailureKind {
        match self {
            Self::Timeout(_) => ConnectionFailureKind::Timeout,
            Self::AuthRejected { .. } => ConnectionFailureKind::AuthRejected,
            Self::Other(_) => ConnectionFailureKind::Other,
        }
    }
}

impl From<TransportError> for ConnectionFailure {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(after) => Self::Timeout(after),
            TransportError::AuthenticationFailed { user } => Self::AuthRejected { user },
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<Error> for ConnectionFailure {
    fn from(err: Error) -> Self {
        match err {
            Error::Transport(e) => e.into(),
            Error::Connection(e) => e,
            Error::Channel(ChannelError::PatternTimeout(after)) => Self::Timeout(after),
            other => Self::Other(other.to_string()),
        }
    }
}

/// Failure to run a command on a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionFailure {
    /// The session is not open (never opened, or already closed)
    #[error("session is not open")]
    NotOpen,

    /// The command channel errored or the device rejected the command
    #[error("command '{command}' failed: {message}")]
    CommandError { command: String, message: String },

    /// No prompt came back in time
    #[error("command '{command}' timed out after {after:?}")]
    Timeout { command: String, after: Duration },
}

/// Inventory collaborator errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// The inventory could not be queried
    #[error("inventory unavailable: {message}")]
    Unavailable { message: String },

    /// The inventory has no record of this device
    #[error("device '{device}' is not in the inventory")]
    UnknownDevice { device: String },
}

/// Errors that prevent a sweep from starting at all.
#[derive(Error, Debug)]
pub enum SweepError {
    /// The target list could not be obtained
    #[error("could not list sweep targets: {0}")]
    Inventory(#[from] InventoryError),
}

/// Result type alias using netdrift's Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_timeout_normalizes() {
        let failure: ConnectionFailure = TransportError::Timeout(Duration::from_secs(10)).into();
        assert_eq!(failure.kind(), ConnectionFailureKind::Timeout);
    }

    #[test]
    fn test_transport_auth_normalizes() {
        let failure: ConnectionFailure = TransportError::AuthenticationFailed {
            user: "admin".to_string(),
        }
        .into();
        assert_eq!(
            failure,
            ConnectionFailure::AuthRejected {
                user: "admin".to_string()
            }
        );
    }

    #[test]
    fn test_other_transport_errors_normalize_to_other() {
        let failure: ConnectionFailure = TransportError::Key("bad passphrase".to_string()).into();
        assert_eq!(failure.kind(), ConnectionFailureKind::Other);

        let failure: ConnectionFailure = TransportError::HostKeyUnknown {
            host: "10.0.0.1".to_string(),
            port: 22,
        }
        .into();
        assert_eq!(failure.kind(), ConnectionFailureKind::Other);
        assert!(failure.to_string().contains("10.0.0.1:22"));
    }

    #[test]
    fn test_crate_error_normalizes() {
        let err: Error = ChannelError::PatternTimeout(Duration::from_secs(3)).into();
        let failure: ConnectionFailure = err.into();
        assert_eq!(failure, ConnectionFailure::Timeout(Duration::from_secs(3)));

        let err: Error = PlatformError::UnknownPlatform {
            name: "vyos".to_string(),
        }
        .into();
        let failure: ConnectionFailure = err.into();
        assert_eq!(failure.kind(), ConnectionFailureKind::Other);
    }
}
