//! # netdrift
//!
//! Interface drift detection for network devices.
//!
//! netdrift compares what an inventory says a device's interfaces should be
//! (present, enabled or disabled) with what the device actually reports over
//! its CLI, and produces a per-interface verdict for every device in a sweep.
//!
//! ## Pieces
//!
//! - [`transport`]: the `Transport`/`Session` seam and the russh connection
//! - [`driver`]: the SSH CLI implementation of that seam
//! - [`parse`]: `show ip interface brief` parser
//! - [`reconcile`]: pure intended-vs-observed comparison
//! - [`sweep`]: bounded, cancellable multi-device orchestration
//! - [`inventory`] and [`cache`]: the caller-facing boundaries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netdrift::driver::SshCliTransport;
//! use netdrift::inventory::{DeviceTarget, IntendedInterface, StaticInventory};
//! use netdrift::sweep::Sweeper;
//! use netdrift::transport::Credentials;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), netdrift::Error> {
//!     let inventory = StaticInventory::new().with_device(
//!         DeviceTarget::new("edge1").with_address("192.168.1.1"),
//!         vec![IntendedInterface::new("GigabitEthernet0/0", true)],
//!     );
//!
//!     let sweeper = Sweeper::new(
//!         SshCliTransport::default(),
//!         inventory,
//!         Credentials::password("admin", "secret"),
//!     );
//!
//!     let report = sweeper.run_sweep(&CancellationToken::new()).await?;
//!     for result in &report.results {
//!         for verdict in result.drifted() {
//!             println!("{} {}: {:?}", result.device.name, verdict.interface_name, verdict.reason);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod channel;
pub mod driver;
pub mod error;
pub mod inventory;
pub mod parse;
pub mod platform;
pub mod reconcile;
pub mod sweep;
pub mod transport;

// Re-export main types for convenience
pub use cache::ReportCache;
pub use driver::{SshCliTransport, SshSession};
pub use error::{ConnectionFailure, Error, ExecutionFailure, InventoryError, Result, SweepError};
pub use inventory::{DeviceTarget, IntendedInterface, Inventory, StaticInventory};
pub use parse::{
    LinkStatus, ObservedInterface, ObservedInterfaces, ProtocolStatus, parse_interface_status,
};
pub use reconcile::{DriftReason, DriftVerdict, reconcile};
pub use sweep::{ConnectionOutcome, DeviceSweepResult, SweepConfig, SweepReport, Sweeper};
pub use transport::{Credentials, Session, Transport};
