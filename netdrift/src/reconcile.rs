//! Drift reconciliation between intended and observed interfaces.
//!
//! [`reconcile`] is a pure function: no I/O, inputs untouched, and the
//! output is fully determined by the two input sets.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::inventory::IntendedInterface;
use crate::parse::{LinkStatus, ObservedInterface, ObservedInterfaces, ProtocolStatus};

/// Why an interface is considered drifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftReason {
    /// Declared in the inventory, not reported by the device.
    MissingOnDevice,
    /// Reported by the device, not declared in the inventory.
    MissingInInventory,
    /// Declared enabled, but link or protocol is not up.
    ExpectedUpGotDown,
    /// Declared disabled, but link and protocol are up.
    ExpectedDownGotUp,
}

impl fmt::Display for DriftReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MissingOnDevice => "missing_on_device",
            Self::MissingInInventory => "missing_in_inventory",
            Self::ExpectedUpGotDown => "expected_up_got_down",
            Self::ExpectedDownGotUp => "expected_down_got_up",
        };
        f.write_str(text)
    }
}

/// Comparison result for a single interface name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftVerdict {
    pub interface_name: String,
    pub in_intended: bool,
    pub in_observed: bool,
    pub intended_enabled: Option<bool>,
    pub observed_link: Option<LinkStatus>,
    pub observed_protocol: Option<ProtocolStatus>,
    pub has_drift: bool,
    pub reason: Option<DriftReason>,
}

impl DriftVerdict {
    fn new(
        name: &str,
        intended: Option<&IntendedInterface>,
        observed: Option<&ObservedInterface>,
    ) -> Self {
        let reason = drift_reason(intended, observed);
        Self {
            interface_name: name.to_string(),
            in_intended: intended.is_some(),
            in_observed: observed.is_some(),
            intended_enabled: intended.map(|i| i.enabled),
            observed_link: observed.map(|o| o.link_status),
            observed_protocol: observed.map(|o| o.protocol_status),
            has_drift: reason.is_some(),
            reason,
        }
    }
}

fn drift_reason(
    intended: Option<&IntendedInterface>,
    observed: Option<&ObservedInterface>,
) -> Option<DriftReason> {
    match (intended, observed) {
        (Some(intended), Some(observed)) => match (intended.enabled, observed.is_up()) {
            (true, false) => Some(DriftReason::ExpectedUpGotDown),
            (false, true) => Some(DriftReason::ExpectedDownGotUp),
            _ => None,
        },
        (Some(_), None) => Some(DriftReason::MissingOnDevice),
        (None, Some(_)) => Some(DriftReason::MissingInInventory),
        (None, None) => None,
    }
}

/// Compare intended against observed interfaces.
///
/// Returns one verdict per name in the union of both sets, sorted ascending
/// by name. Names are matched exactly and case-sensitively. If `intended`
/// lists a name twice the later entry wins.
pub fn reconcile(
    intended: &[IntendedInterface],
    observed: &ObservedInterfaces,
) -> Vec<DriftVerdict> {
    let mut union: BTreeMap<&str, (Option<&IntendedInterface>, Option<&ObservedInterface>)> =
        BTreeMap::new();

    for interface in intended {
        union.entry(interface.name.as_str()).or_default().0 = Some(interface);
    }
    for (name, interface) in observed {
        union.entry(name.as_str()).or_default().1 = Some(interface);
    }

    union
        .into_iter()
        .map(|(name, (intended, observed))| DriftVerdict::new(name, intended, observed))
        .collect()
}
