//! Sweep configuration.

use std::time::Duration;

use serde::{Deserialize, Deserializer};
use tokio::sync::Semaphore;

use crate::transport::DEFAULT_OPEN_TIMEOUT;

/// Command whose output the parser understands.
pub const DEFAULT_STATUS_COMMAND: &str = "show ip interface brief";

/// Default bound on concurrently open device sessions.
pub const DEFAULT_MAX_CONCURRENT_SESSIONS: usize = 5;

/// Default time allowed for the status command.
pub const DEFAULT_EXECUTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for a sweep.
///
/// Deserializable from any serde format; missing keys take their defaults
/// and timeouts are given in seconds:
///
/// ```toml
/// command = "show ip interface brief"
/// max_concurrent_sessions = 8
/// open_timeout = 10
/// execute_timeout = 45
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Interface status command sent to every device.
    pub command: String,

    /// Upper bound on sessions open at the same time.
    pub max_concurrent_sessions: usize,

    /// Time allowed to open a session (handshake, auth, first prompt).
    #[serde(deserialize_with = "duration_from_secs")]
    pub open_timeout: Duration,

    /// Time allowed for the status command to return.
    #[serde(deserialize_with = "duration_from_secs")]
    pub execute_timeout: Duration,
}

impl SweepConfig {
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Set the session bound. Zero is treated as one, and values above
    /// [`Semaphore::MAX_PERMITS`] are capped there.
    pub fn with_max_concurrent_sessions(mut self, max: usize) -> Self {
        self.max_concurrent_sessions = max;
        self
    }

    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = timeout;
        self
    }

    pub fn with_execute_timeout(mut self, timeout: Duration) -> Self {
        self.execute_timeout = timeout;
        self
    }

    /// The effective session bound: at least one, at most what a tokio
    /// semaphore can hold.
    pub fn session_limit(&self) -> usize {
        self.max_concurrent_sessions.clamp(1, Semaphore::MAX_PERMITS)
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_STATUS_COMMAND.to_string(),
            max_concurrent_sessions: DEFAULT_MAX_CONCURRENT_SESSIONS,
            open_timeout: DEFAULT_OPEN_TIMEOUT,
            execute_timeout: DEFAULT_EXECUTE_TIMEOUT,
        }
    }
}

fn duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SweepConfig::default();
        assert_eq!(config.command, "show ip interface brief");
        assert_eq!(config.max_concurrent_sessions, 5);
        assert_eq!(config.open_timeout, Duration::from_secs(10));
        assert_eq!(config.execute_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_partial_deserialize() {
        let config: SweepConfig =
            serde_json::from_str(r#"{"max_concurrent_sessions": 8, "open_timeout": 2.5}"#).unwrap();
        assert_eq!(config.max_concurrent_sessions, 8);
        assert_eq!(config.open_timeout, Duration::from_millis(2500));
        assert_eq!(config.execute_timeout, DEFAULT_EXECUTE_TIMEOUT);
        assert_eq!(config.command, DEFAULT_STATUS_COMMAND);
    }

    #[test]
    fn test_negative_timeout_rejected() {
        let result = serde_json::from_str::<SweepConfig>(r#"{"execute_timeout": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_session_limit_never_zero() {
        let config = SweepConfig::default().with_max_concurrent_sessions(0);
        assert_eq!(config.session_limit(), 1);
    }

    #[test]
    fn test_session_limit_capped_at_semaphore_max() {
        let config: SweepConfig =
            serde_json::from_str(r#"{"max_concurrent_sessions": 4611686018427387904}"#).unwrap();
        assert_eq!(config.session_limit(), Semaphore::MAX_PERMITS);

        let config = SweepConfig::default().with_max_concurrent_sessions(usize::MAX);
        assert_eq!(config.session_limit(), Semaphore::MAX_PERMITS);
        let slots = Semaphore::new(config.session_limit());
        assert_eq!(slots.available_permits(), Semaphore::MAX_PERMITS);
    }
}
