//! Device sweep orchestration.
//!
//! A sweep visits every target device, collects its interface status,
//! reconciles it against the inventory and returns one
//! [`DeviceSweepResult`] per target, in target order.
//!
//! Each device is an independent unit of work on its own tokio task:
//!
//! ```text
//! acquire slot → open → execute → close → parse → intended → reconcile
//! ```
//!
//! A semaphore bounds how many sessions are open at once, every stage has
//! its own timeout, and a [`CancellationToken`] stops the whole sweep. A
//! failure anywhere only affects that device's result. Dropping the sweep
//! future aborts all in-flight units.

mod config;
mod report;

pub use config::{
    DEFAULT_EXECUTE_TIMEOUT, DEFAULT_MAX_CONCURRENT_SESSIONS, DEFAULT_STATUS_COMMAND, SweepConfig,
};
pub use report::{ConnectionOutcome, DeviceSweepResult, SweepReport, SweepSummary};

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::cache::ReportCache;
use crate::error::{ConnectionFailure, ExecutionFailure, SweepError};
use crate::inventory::{DeviceTarget, Inventory};
use crate::parse::parse_interface_status;
use crate::reconcile::reconcile;
use crate::transport::{Credentials, Session, Transport};

/// Error text for targets without a management address.
pub const NO_ADDRESS: &str = "no address configured";

/// Error text for units stopped by cancellation.
pub const CANCELLED: &str = "sweep cancelled";

/// Error text for units whose worker task panicked.
pub const WORKER_ABORTED: &str = "worker aborted";

/// Runs sweeps over an inventory through a transport.
///
/// # Example
///
/// ```rust,no_run
/// use netdrift::driver::SshCliTransport;
/// use netdrift::inventory::StaticInventory;
/// use netdrift::sweep::{SweepConfig, Sweeper};
/// use netdrift::transport::Credentials;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example(inventory: StaticInventory) -> Result<(), netdrift::Error> {
/// let sweeper = Sweeper::new(
///     SshCliTransport::default(),
///     inventory,
///     Credentials::password("admin", "secret"),
/// )
/// .with_config(SweepConfig::default().with_max_concurrent_sessions(10));
///
/// let report = sweeper.run_sweep(&CancellationToken::new()).await?;
/// for result in &report.results {
///     println!("{}: {} drifted", result.device.name, result.drift_count());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Sweeper<T, I> {
    transport: Arc<T>,
    inventory: Arc<I>,
    credentials: Arc<Credentials>,
    config: Arc<SweepConfig>,
}

impl<T, I> Sweeper<T, I>
where
    T: Transport,
    I: Inventory + 'static,
{
    /// Create a sweeper with the default configuration.
    pub fn new(transport: T, inventory: I, credentials: Credentials) -> Self {
        Self {
            transport: Arc::new(transport),
            inventory: Arc::new(inventory),
            credentials: Arc::new(credentials),
            config: Arc::new(SweepConfig::default()),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: SweepConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    /// Sweep every device the inventory lists.
    ///
    /// Only fails if the target list itself cannot be obtained; per-device
    /// problems are reported inside the [`SweepReport`].
    pub async fn run_sweep(&self, cancel: &CancellationToken) -> Result<SweepReport, SweepError> {
        let targets = self.inventory.targets()?;
        let results = self.sweep(targets, cancel).await;
        Ok(SweepReport::new(results))
    }

    /// Run a sweep and store the report in a caller-owned cache.
    pub async fn run_sweep_cached(
        &self,
        cache: &mut ReportCache,
        cancel: &CancellationToken,
    ) -> Result<Arc<SweepReport>, SweepError> {
        let report = self.run_sweep(cancel).await?;
        Ok(cache.store(report))
    }

    /// Sweep the given targets.
    ///
    /// Returns exactly one result per target, in the same order.
    pub async fn sweep(
        &self,
        targets: Vec<DeviceTarget>,
        cancel: &CancellationToken,
    ) -> Vec<DeviceSweepResult> {
        let limit = self.config.session_limit();
        info!(
            "sweep starting: {} devices, up to {} sessions",
            targets.len(),
            limit
        );

        let slots = Arc::new(Semaphore::new(limit));
        let mut workers = JoinSet::new();

        for (index, target) in targets.iter().cloned().enumerate() {
            let unit = DeviceUnit {
                transport: self.transport.clone(),
                inventory: self.inventory.clone(),
                credentials: self.credentials.clone(),
                config: self.config.clone(),
                slots: slots.clone(),
                cancel: cancel.clone(),
            };
            workers.spawn(async move { (index, unit.run(target).await) });
        }

        let mut results: Vec<Option<DeviceSweepResult>> = targets.iter().map(|_| None).collect();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => warn!("sweep worker did not finish: {}", e),
            }
        }

        let results: Vec<DeviceSweepResult> = results
            .into_iter()
            .zip(targets)
            .map(|(slot, target)| {
                slot.unwrap_or_else(|| DeviceSweepResult::failed(target, WORKER_ABORTED))
            })
            .collect();

        info!(
            "sweep finished: {} connected of {}",
            results
                .iter()
                .filter(|r| r.connection_outcome == ConnectionOutcome::Connected)
                .count(),
            results.len()
        );
        results
    }
}

/// Everything one device's unit of work needs.
struct DeviceUnit<T, I> {
    transport: Arc<T>,
    inventory: Arc<I>,
    credentials: Arc<Credentials>,
    config: Arc<SweepConfig>,
    slots: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl<T, I> DeviceUnit<T, I>
where
    T: Transport,
    I: Inventory,
{
    async fn run(self, target: DeviceTarget) -> DeviceSweepResult {
        if self.cancel.is_cancelled() {
            return DeviceSweepResult::not_attempted(target, CANCELLED);
        }
        if target.management_address().is_none() {
            debug!("{}: skipped, {}", target.name, NO_ADDRESS);
            return DeviceSweepResult::not_attempted(target, NO_ADDRESS);
        }

        // Held until the session is closed
        let slot = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                return DeviceSweepResult::not_attempted(target, CANCELLED);
            }
            permit = self.slots.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return DeviceSweepResult::not_attempted(target, CANCELLED),
            },
        };

        let mut session = match self.open(&target).await {
            Ok(session) => session,
            Err(result) => return result,
        };

        let output = self.execute(&mut session).await;
        self.close(&target, &mut session).await;
        drop(slot);

        let output = match output {
            Ok(output) => output,
            Err(message) => {
                warn!("{}: {}", target.name, message);
                return DeviceSweepResult::failed(target, message);
            }
        };

        let observed = parse_interface_status(&output);
        let intended = match self.inventory.intended_interfaces(&target) {
            Ok(intended) => intended,
            Err(e) => {
                warn!("{}: {}", target.name, e);
                return DeviceSweepResult::failed(target, e.to_string());
            }
        };

        let verdicts = reconcile(&intended, &observed);
        debug!(
            "{}: {} interfaces observed, {} intended, {} drifted",
            target.name,
            observed.len(),
            intended.len(),
            verdicts.iter().filter(|v| v.has_drift).count()
        );
        DeviceSweepResult::connected(target, verdicts)
    }

    async fn open(&self, target: &DeviceTarget) -> Result<T::Session, DeviceSweepResult> {
        let timeout = self.config.open_timeout;
        let opened = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                return Err(DeviceSweepResult::failed(target.clone(), CANCELLED));
            }
            opened = tokio::time::timeout(
                timeout,
                self.transport.open(target, &self.credentials, timeout),
            ) => opened,
        };

        let failure = match opened {
            Ok(Ok(session)) => return Ok(session),
            Ok(Err(failure)) => failure,
            Err(_) => ConnectionFailure::Timeout(timeout),
        };
        warn!("{}: {}", target.name, failure);
        Err(DeviceSweepResult::connection_failed(target.clone(), &failure))
    }

    async fn execute(&self, session: &mut T::Session) -> Result<String, String> {
        let command = self.config.command.as_str();
        let timeout = self.config.execute_timeout;

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(CANCELLED.to_string()),
            executed = tokio::time::timeout(timeout, session.execute(command)) => match executed {
                Ok(Ok(output)) => Ok(output),
                Ok(Err(failure)) => Err(failure.to_string()),
                Err(_) => Err(ExecutionFailure::Timeout {
                    command: command.to_string(),
                    after: timeout,
                }
                .to_string()),
            },
        }
    }

    async fn close(&self, target: &DeviceTarget, session: &mut T::Session) {
        if tokio::time::timeout(self.config.open_timeout, session.close())
            .await
            .is_err()
        {
            warn!("{}: session close timed out", target.name);
        }
    }
}
