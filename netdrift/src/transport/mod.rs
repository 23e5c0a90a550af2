//! Remote command transport.
//!
//! [`Transport`] and [`Session`] are the seam the sweep talks through: open a
//! session to a device, run a command, close it. The SSH implementation
//! lives in [`crate::driver`]; this module also holds the low-level russh
//! connection it is built on.

pub mod config;
mod ssh;

use std::future::Future;
use std::time::Duration;

pub use config::{AuthMethod, Credentials, HostKeyVerification, SshConfig};
pub use ssh::SshTransport;

use crate::error::{ConnectionFailure, ExecutionFailure};
use crate::inventory::DeviceTarget;

/// Default time allowed for handshake and authentication.
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens command sessions to devices.
pub trait Transport: Send + Sync + 'static {
    type Session: Session;

    /// Open a session to `target`.
    ///
    /// Must give up with [`ConnectionFailure::Timeout`] once `timeout` has
    /// elapsed.
    fn open(
        &self,
        target: &DeviceTarget,
        credentials: &Credentials,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Session, ConnectionFailure>> + Send;
}

/// An open command session to one device.
pub trait Session: Send + 'static {
    /// Run one command and return its output.
    fn execute(
        &mut self,
        command: &str,
    ) -> impl Future<Output = Result<String, ExecutionFailure>> + Send;

    /// Release the session.
    ///
    /// Idempotent and infallible: closing an already-closed or broken
    /// session is a no-op.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}
