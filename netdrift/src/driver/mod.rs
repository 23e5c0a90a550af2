//! SSH CLI driver.
//!
//! [`SshCliTransport`] implements [`Transport`](crate::transport::Transport)
//! over an interactive SSH shell; each open device session is an
//! [`SshSession`].

mod builder;
mod response;
mod session;

pub use builder::{SshCliTransport, SshCliTransportBuilder};
pub use response::Response;
pub use session::SshSession;
