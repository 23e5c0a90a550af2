//! SSH connection configuration and device credentials.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys. Connection fails if the host
    /// is not already in known_hosts.
    Strict,

    /// Accept and auto-learn unknown keys, but reject changed keys.
    #[default]
    AcceptNew,

    /// Accept all keys without checking. For testing and lab use only.
    Disabled,
}

/// SSH connection configuration for one device.
#[derive(Debug, Clone)]
pub struct SshConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// SSH port (default: 22).
    pub port: u16,

    /// Login credentials.
    pub credentials: Credentials,

    /// Connection timeout, also used for the initial prompt.
    pub timeout: Duration,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,

    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,

    /// Path to known_hosts file; `None` uses the user's default.
    pub known_hosts_path: Option<PathBuf>,
}

impl SshConfig {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Authentication method for SSH connections.
pub enum AuthMethod {
    /// No authentication (for testing only).
    None,

    /// Password authentication.
    Password(SecretString),

    /// Private key authentication.
    PrivateKey {
        /// Path to the private key file.
        path: PathBuf,
        /// Optional passphrase for encrypted keys.
        passphrase: Option<SecretString>,
    },
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::new(secret.expose_secret().to_owned().into_boxed_str())
}

impl Clone for AuthMethod {
    fn clone(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Password(password) => Self::Password(copy_secret(password)),
            Self::PrivateKey { path, passphrase } => Self::PrivateKey {
                path: path.clone(),
                passphrase: passphrase.as_ref().map(copy_secret),
            },
        }
    }
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Password(_) => f.write_str("Password(<redacted>)"),
            Self::PrivateKey { path, passphrase } => f
                .debug_struct("PrivateKey")
                .field("path", path)
                .field("passphrase", &passphrase.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

/// Username plus authentication method used for every device in a sweep.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub auth: AuthMethod,
}

impl Credentials {
    /// Password login.
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            auth: AuthMethod::Password(SecretString::new(password.into().into_boxed_str())),
        }
    }

    /// Private key login.
    pub fn private_key(username: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            username: username.into(),
            auth: AuthMethod::PrivateKey {
                path: path.into(),
                passphrase: None,
            },
        }
    }

    /// Private key login with an encrypted key.
    pub fn private_key_with_passphrase(
        username: impl Into<String>,
        path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            auth: AuthMethod::PrivateKey {
                path: path.into(),
                passphrase: Some(SecretString::new(passphrase.into().into_boxed_str())),
            },
        }
    }

    /// No authentication.
    pub fn none(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            auth: AuthMethod::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::password("admin", "hunter2");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_clone_keeps_secret() {
        let creds = Credentials::private_key_with_passphrase("netops", "/keys/id", "s3cret");
        match creds.clone().auth {
            AuthMethod::PrivateKey { path, passphrase } => {
                assert_eq!(path, PathBuf::from("/keys/id"));
                assert_eq!(passphrase.unwrap().expose_secret(), "s3cret");
            }
            other => panic!("unexpected auth method: {:?}", other),
        }
    }

    #[test]
    fn test_host_key_verification_from_config() {
        let mode: HostKeyVerification = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(mode, HostKeyVerification::Strict);
        assert_eq!(HostKeyVerification::default(), HostKeyVerification::AcceptNew);
    }
}
