//! SSH implementation of [`Transport`] and its builder.

use std::path::PathBuf;
use std::time::Duration;

use log::debug;

use super::session::SshSession;
use crate::error::{ConnectionFailure, PlatformError};
use crate::inventory::DeviceTarget;
use crate::platform::{PlatformDefinition, PlatformRegistry, vendors};
use crate::transport::{Credentials, HostKeyVerification, SshConfig, Transport};

/// Opens [`SshSession`]s, choosing the dialect from each target's platform tag.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
///
/// use netdrift::driver::SshCliTransport;
/// use netdrift::transport::HostKeyVerification;
///
/// let transport = SshCliTransport::builder()
///     .port(2222)
///     .default_platform("cisco_ios")
///     .host_key_verification(HostKeyVerification::Strict)
///     .command_timeout(Duration::from_secs(60))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SshCliTransport {
    registry: PlatformRegistry,
    default_platform: String,
    port: u16,
    command_timeout: Duration,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
}

impl SshCliTransport {
    /// Start building a transport.
    pub fn builder() -> SshCliTransportBuilder {
        SshCliTransportBuilder::new()
    }

    /// Get the platform registry.
    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// Resolve the platform for a target, falling back to the default dialect.
    pub fn platform_for(&self, target: &DeviceTarget) -> Result<&PlatformDefinition, PlatformError> {
        let name = target.platform.as_deref().unwrap_or(&self.default_platform);
        self.registry.resolve(name)
    }

    fn ssh_config(
        &self,
        host: &str,
        platform: &PlatformDefinition,
        credentials: &Credentials,
        timeout: Duration,
    ) -> SshConfig {
        SshConfig {
            host: host.to_string(),
            port: self.port,
            credentials: credentials.clone(),
            timeout,
            terminal_width: platform.terminal_width,
            terminal_height: platform.terminal_height,
            host_key_verification: self.host_key_verification.clone(),
            known_hosts_path: self.known_hosts_path.clone(),
        }
    }
}

impl Default for SshCliTransport {
    fn default() -> Self {
        Self {
            registry: PlatformRegistry::default(),
            default_platform: vendors::cisco_ios::NAME.to_string(),
            port: 22,
            command_timeout: Duration::from_secs(30),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }
}

impl Transport for SshCliTransport {
    type Session = SshSession;

    async fn open(
        &self,
        target: &DeviceTarget,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<SshSession, ConnectionFailure> {
        let host = target
            .management_address()
            .ok_or_else(|| ConnectionFailure::Other("no address configured".to_string()))?;

        let platform = self
            .platform_for(target)
            .map_err(|e| ConnectionFailure::Other(e.to_string()))?
            .clone();

        debug!("{}: opening {} session to {}", target.name, platform.name, host);
        let config = self.ssh_config(host, &platform, credentials, timeout);

        tokio::time::timeout(timeout, SshSession::open(config, platform, self.command_timeout))
            .await
            .map_err(|_| ConnectionFailure::Timeout(timeout))?
            .map_err(ConnectionFailure::from)
    }
}

/// Builder for [`SshCliTransport`].
pub struct SshCliTransportBuilder {
    transport: SshCliTransport,
    extra_platforms: Vec<PlatformDefinition>,
}

impl SshCliTransportBuilder {
    fn new() -> Self {
        Self {
            transport: SshCliTransport::default(),
            extra_platforms: vec![],
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.transport.port = port;
        self
    }

    /// Dialect used for targets without a platform tag (default: "cisco_ios").
    pub fn default_platform(mut self, platform: impl Into<String>) -> Self {
        self.transport.default_platform = platform.into();
        self
    }

    /// Register an additional platform definition.
    pub fn custom_platform(mut self, platform: PlatformDefinition) -> Self {
        self.extra_platforms.push(platform);
        self
    }

    /// Time allowed for each command's prompt to come back.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.transport.command_timeout = timeout;
        self
    }

    /// Set the host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.transport.host_key_verification = mode;
        self
    }

    /// Use a specific known_hosts file.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.transport.known_hosts_path = Some(path.into());
        self
    }

    /// Build the transport.
    ///
    /// Fails if a custom platform clashes with a registered one, or if the
    /// default platform is not registered.
    pub fn build(self) -> Result<SshCliTransport, PlatformError> {
        let mut transport = self.transport;
        for platform in self.extra_platforms {
            transport.registry.register(platform)?;
        }
        transport.registry.resolve(&transport.default_platform)?;
        Ok(transport)
    }
}
