//! Per-device results and the aggregated sweep report.

use serde::{Deserialize, Serialize};

use crate::error::{ConnectionFailure, ConnectionFailureKind};
use crate::inventory::DeviceTarget;
use crate::reconcile::DriftVerdict;

/// How far a device got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionOutcome {
    /// Status collected and reconciled.
    Connected,
    /// Something failed after the device was attempted.
    Failed,
    /// The device was never contacted.
    NotAttempted,
}

/// Result for one device in a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSweepResult {
    pub device: DeviceTarget,
    pub connection_outcome: ConnectionOutcome,
    /// Sorted by interface name; empty unless connected.
    pub verdicts: Vec<DriftVerdict>,
    pub error: Option<String>,
    /// Set when the session could not be opened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<ConnectionFailureKind>,
}

impl DeviceSweepResult {
    pub fn connected(device: DeviceTarget, verdicts: Vec<DriftVerdict>) -> Self {
        Self {
            device,
            connection_outcome: ConnectionOutcome::Connected,
            verdicts,
            error: None,
            failure_kind: None,
        }
    }

    pub fn failed(device: DeviceTarget, error: impl Into<String>) -> Self {
        Self {
            device,
            connection_outcome: ConnectionOutcome::Failed,
            verdicts: vec![],
            error: Some(error.into()),
            failure_kind: None,
        }
    }

    pub fn connection_failed(device: DeviceTarget, failure: &ConnectionFailure) -> Self {
        Self {
            failure_kind: Some(failure.kind()),
            ..Self::failed(device, failure.to_string())
        }
    }

    pub fn not_attempted(device: DeviceTarget, error: impl Into<String>) -> Self {
        Self {
            device,
            connection_outcome: ConnectionOutcome::NotAttempted,
            verdicts: vec![],
            error: Some(error.into()),
            failure_kind: None,
        }
    }

    /// Number of drifted interfaces.
    pub fn drift_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.has_drift).count()
    }

    pub fn has_drift(&self) -> bool {
        self.verdicts.iter().any(|v| v.has_drift)
    }

    /// Drifted verdicts only.
    pub fn drifted(&self) -> impl Iterator<Item = &DriftVerdict> {
        self.verdicts.iter().filter(|v| v.has_drift)
    }
}

/// Counters over a whole sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub devices: usize,
    pub connected: usize,
    pub failed: usize,
    pub not_attempted: usize,
    /// Connected devices with at least one drifted interface.
    pub drifted_devices: usize,
    pub drifted_interfaces: usize,
}

/// Output of one sweep, in target order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub results: Vec<DeviceSweepResult>,
    pub summary: SweepSummary,
}

impl SweepReport {
    pub fn new(results: Vec<DeviceSweepResult>) -> Self {
        let mut summary = SweepSummary {
            devices: results.len(),
            ..Default::default()
        };

        for result in &results {
            match result.connection_outcome {
                ConnectionOutcome::Connected => summary.connected += 1,
                ConnectionOutcome::Failed => summary.failed += 1,
                ConnectionOutcome::NotAttempted => summary.not_attempted += 1,
            }
            let drifted = result.drift_count();
            if drifted > 0 {
                summary.drifted_devices += 1;
                summary.drifted_interfaces += drifted;
            }
        }

        Self { results, summary }
    }

    /// Look up a device's result by name.
    pub fn device(&self, name: &str) -> Option<&DeviceSweepResult> {
        self.results.iter().find(|r| r.device.name == name)
    }

    /// True when every device connected and none drifted.
    pub fn is_clean(&self) -> bool {
        self.summary.connected == self.summary.devices && self.summary.drifted_devices == 0
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::inventory::IntendedInterface;
    use crate::parse::ObservedInterfaces;
    use crate::reconcile::reconcile;

    fn drifted_result(name: &str) -> DeviceSweepResult {
        let verdicts = reconcile(
            &[
                IntendedInterface::new("Gi0/0", true),
                IntendedInterface::new("Gi0/1", true),
            ],
            &ObservedInterfaces::new(),
        );
        DeviceSweepResult::connected(DeviceTarget::new(name), verdicts)
    }

    #[test]
    fn test_summary_counts() {
        let report = SweepReport::new(vec![
            drifted_result("a"),
            DeviceSweepResult::connected(DeviceTarget::new("b"), vec![]),
            DeviceSweepResult::connection_failed(
                DeviceTarget::new("c"),
                &ConnectionFailure::Timeout(Duration::from_secs(10)),
            ),
            DeviceSweepResult::not_attempted(DeviceTarget::new("d"), "no address configured"),
        ]);

        assert_eq!(
            report.summary,
            SweepSummary {
                devices: 4,
                connected: 2,
                failed: 1,
                not_attempted: 1,
                drifted_devices: 1,
                drifted_interfaces: 2,
            }
        );
        assert!(!report.is_clean());
        assert_eq!(report.device("a").unwrap().drifted().count(), 2);
        assert_eq!(
            report.device("c").unwrap().failure_kind,
            Some(ConnectionFailureKind::Timeout)
        );
    }

    #[test]
    fn test_clean_report() {
        let report = SweepReport::new(vec![DeviceSweepResult::connected(
            DeviceTarget::new("a"),
            vec![],
        )]);
        assert!(report.is_clean());
    }

    #[test]
    fn test_report_json_shape() {
        let report = SweepReport::new(vec![
            drifted_result("edge1"),
            DeviceSweepResult::connection_failed(
                DeviceTarget::new("edge2").with_address("10.0.0.2"),
                &ConnectionFailure::AuthRejected {
                    user: "admin".to_string(),
                },
            ),
        ]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"][0]["connection_outcome"], "connected");
        assert_eq!(json["results"][0]["verdicts"][0]["reason"], "missing_on_device");
        assert!(json["results"][0].get("failure_kind").is_none());
        assert_eq!(json["results"][1]["connection_outcome"], "failed");
        assert_eq!(json["results"][1]["failure_kind"], "auth_rejected");
        assert_eq!(json["summary"]["drifted_interfaces"], 2);

        let back: SweepReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
