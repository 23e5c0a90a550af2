//! SSH CLI session to a single device.

use std::time::{Duration, Instant};

use log::{debug, trace};

use super::response::Response;
use crate::channel::{DEFAULT_SEARCH_DEPTH, PtyChannel};
use crate::error::{ChannelError, ExecutionFailure, Result};
use crate::platform::PlatformDefinition;
use crate::transport::{Session, SshConfig, SshTransport};

/// An open interactive shell on a device.
///
/// Handles:
/// - SSH transport and PTY channel lifetime
/// - Command execution with prompt detection
/// - Dialect setup commands (paging off) on open
/// - Output normalization and failure detection
pub struct SshSession {
    /// Host the session is connected to, for log lines.
    host: String,

    platform: PlatformDefinition,

    /// SSH transport (None once closed).
    transport: Option<SshTransport>,

    /// Shell channel (None once closed).
    channel: Option<PtyChannel>,

    /// Time allowed for each command's prompt to come back.
    command_timeout: Duration,
}

impl SshSession {
    /// Connect, open a shell, wait for the first prompt and run the
    /// platform's on-open commands.
    ///
    /// On any failure after the SSH connection is up, the connection is
    /// torn down before the error is returned.
    pub async fn open(
        config: SshConfig,
        platform: PlatformDefinition,
        command_timeout: Duration,
    ) -> Result<Self> {
        let host = config.socket_addr();
        let prompt_timeout = config.timeout;

        let transport = SshTransport::connect(config).await?;
        let channel = match transport.open_channel().await {
            Ok(channel) => channel,
            Err(e) => {
                if let Err(close_err) = transport.close().await {
                    debug!("{}: disconnect failed: {}", host, close_err);
                }
                return Err(e.into());
            }
        };

        let mut session = Self {
            host,
            platform,
            transport: Some(transport),
            channel: Some(PtyChannel::new(channel, DEFAULT_SEARCH_DEPTH)),
            command_timeout,
        };

        if let Err(e) = session.initialize(prompt_timeout).await {
            session.shutdown().await;
            return Err(e);
        }

        debug!("session to {} ready ({})", session.host, session.platform.name);
        Ok(session)
    }

    async fn initialize(&mut self, prompt_timeout: Duration) -> Result<()> {
        let channel = self.channel.as_mut().ok_or(ExecutionFailure::NotOpen)?;
        channel
            .read_until_pattern(&self.platform.prompt_pattern, prompt_timeout)
            .await?;

        for command in self.platform.on_open_commands.clone() {
            let response = self.send_command(&command).await?;
            if let Some(failure) = response.failure_message {
                debug!("{}: on-open command {:?} rejected: {}", self.host, command, failure);
            }
        }
        Ok(())
    }

    /// Send a command and wait for the prompt.
    pub async fn send_command(&mut self, command: &str) -> Result<Response> {
        let channel = self.channel.as_mut().ok_or(ExecutionFailure::NotOpen)?;
        let start = Instant::now();

        channel.send(command).await?;
        let data = channel
            .read_until_pattern(&self.platform.prompt_pattern, self.command_timeout)
            .await?;

        let elapsed = start.elapsed();

        let prompt = self
            .platform
            .prompt_pattern
            .find_iter(&data)
            .last()
            .map(|m| String::from_utf8_lossy(m.as_bytes()).trim().to_string())
            .unwrap_or_default();

        let result = self.platform.normalize_output(&data, command);
        trace!("{}: {:?} -> {} bytes in {:?}", self.host, command, result.len(), elapsed);

        let response = Response::new(command, result, prompt, elapsed);
        match self.platform.detect_failure(&response.result).map(str::to_string) {
            Some(failure) => Ok(response.with_failure(failure)),
            None => Ok(response),
        }
    }

    /// Check if the session is open.
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// Check if the session is open and the SSH connection is still up.
    pub fn is_alive(&self) -> bool {
        let channel_up = self.channel.as_ref().is_some_and(|c| !c.is_closed());
        let transport_up = self.transport.as_ref().is_some_and(SshTransport::is_alive);
        channel_up && transport_up
    }

    /// Tear the session down. Safe to call more than once.
    pub async fn shutdown(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            channel.close().await;
        }
        if let Some(transport) = self.transport.take() {
            if let Err(e) = transport.close().await {
                debug!("{}: disconnect failed: {}", self.host, e);
            }
        }
    }
}

impl Session for SshSession {
    async fn execute(&mut self, command: &str) -> std::result::Result<String, ExecutionFailure> {
        let timeout = self.command_timeout;
        match self.send_command(command).await {
            Ok(response) => match response.failure_message {
                Some(message) => Err(ExecutionFailure::CommandError {
                    command: command.to_string(),
                    message,
                }),
                None => Ok(response.result),
            },
            Err(crate::Error::Execution(failure)) => Err(failure),
            Err(crate::Error::Channel(ChannelError::PatternTimeout(_))) => {
                Err(ExecutionFailure::Timeout {
                    command: command.to_string(),
                    after: timeout,
                })
            }
            Err(e) => Err(ExecutionFailure::CommandError {
                command: command.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn close(&mut self) {
        self.shutdown().await;
    }
}
