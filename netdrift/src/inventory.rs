//! Inventory boundary: the source of truth for devices and their intended
//! interfaces.
//!
//! The sweep only ever reads from the inventory. Anything that can answer
//! [`Inventory::targets`] and [`Inventory::intended_interfaces`] can drive a
//! sweep; [`StaticInventory`] is an in-memory implementation that can also be
//! deserialized from any serde format.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// A device to be checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTarget {
    /// Device name, unique within the inventory.
    pub name: String,

    /// Management address; `None` when the inventory has none configured.
    #[serde(default)]
    pub address: Option<String>,

    /// Command dialect tag (e.g. "cisco_ios"); `None` selects the transport default.
    #[serde(default)]
    pub platform: Option<String>,
}

impl DeviceTarget {
    /// Create a target with a name only.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            platform: None,
        }
    }

    /// Set the management address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the dialect tag.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// The management address, if one is usable.
    ///
    /// Blank addresses count as "none configured".
    pub fn management_address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
    }
}

/// An interface as the inventory says it should be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntendedInterface {
    pub name: String,
    pub enabled: bool,
}

impl IntendedInterface {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }
}

/// Read-only view of the source of truth.
pub trait Inventory: Send + Sync {
    /// All devices that a sweep should visit, in sweep order.
    fn targets(&self) -> Result<Vec<DeviceTarget>, InventoryError>;

    /// The intended interfaces of one device.
    fn intended_interfaces(
        &self,
        device: &DeviceTarget,
    ) -> Result<Vec<IntendedInterface>, InventoryError>;
}

/// One device record in a [`StaticInventory`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryDevice {
    #[serde(flatten)]
    pub target: DeviceTarget,

    #[serde(default)]
    pub interfaces: Vec<IntendedInterface>,
}

/// In-memory inventory.
///
/// ```rust
/// use netdrift::inventory::{DeviceTarget, IntendedInterface, Inventory, StaticInventory};
///
/// let inventory = StaticInventory::new().with_device(
///     DeviceTarget::new("edge1").with_address("10.0.0.1"),
///     vec![IntendedInterface::new("GigabitEthernet0/0", true)],
/// );
/// assert_eq!(inventory.targets().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<InventoryDevice>", into = "Vec<InventoryDevice>")]
pub struct StaticInventory {
    devices: IndexMap<String, InventoryDevice>,
}

impl StaticInventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a device and its intended interfaces.
    pub fn with_device(mut self, target: DeviceTarget, interfaces: Vec<IntendedInterface>) -> Self {
        self.insert(target, interfaces);
        self
    }

    /// Add (or replace) a device and its intended interfaces.
    pub fn insert(&mut self, target: DeviceTarget, interfaces: Vec<IntendedInterface>) {
        self.devices.insert(
            target.name.clone(),
            InventoryDevice { target, interfaces },
        );
    }

    /// Number of devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Check if the inventory has no devices.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl From<Vec<InventoryDevice>> for StaticInventory {
    fn from(devices: Vec<InventoryDevice>) -> Self {
        let mut inventory = Self::new();
        for device in devices {
            inventory.insert(device.target, device.interfaces);
        }
        inventory
    }
}

impl From<StaticInventory> for Vec<InventoryDevice> {
    fn from(inventory: StaticInventory) -> Self {
        inventory.devices.into_values().collect()
    }
}

impl Inventory for StaticInventory {
    fn targets(&self) -> Result<Vec<DeviceTarget>, InventoryError> {
        Ok(self.devices.values().map(|d| d.target.clone()).collect())
    }

    fn intended_interfaces(
        &self,
        device: &DeviceTarget,
    ) -> Result<Vec<IntendedInterface>, InventoryError> {
        self.devices
            .get(&device.name)
            .map(|d| d.interfaces.clone())
            .ok_or_else(|| InventoryError::UnknownDevice {
                device: device.name.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_management_address() {
        assert_eq!(DeviceTarget::new("a").management_address(), None);
        assert_eq!(
            DeviceTarget::new("a").with_address("  ").management_address(),
            None
        );
        assert_eq!(
            DeviceTarget::new("a")
                .with_address("192.0.2.1")
                .management_address(),
            Some("192.0.2.1")
        );
    }

    #[test]
    fn test_static_inventory_preserves_order() {
        let inventory = StaticInventory::new()
            .with_device(DeviceTarget::new("zeta"), vec![])
            .with_device(DeviceTarget::new("alpha"), vec![]);

        let names: Vec<String> = inventory
            .targets()
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_unknown_device() {
        let inventory = StaticInventory::new();
        let err = inventory
            .intended_interfaces(&DeviceTarget::new("ghost"))
            .unwrap_err();
        assert_eq!(
            err,
            InventoryError::UnknownDevice {
                device: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"[
            {
                "name": "edge1",
                "address": "10.0.0.1",
                "platform": "cisco_ios",
                "interfaces": [
                    {"name": "GigabitEthernet0/0", "enabled": true},
                    {"name": "GigabitEthernet0/1", "enabled": false}
                ]
            },
            {"name": "edge2"}
        ]"#;

        let inventory: StaticInventory = serde_json::from_str(json).unwrap();
        assert_eq!(inventory.len(), 2);

        let targets = inventory.targets().unwrap();
        assert_eq!(targets[0].management_address(), Some("10.0.0.1"));
        assert_eq!(targets[0].platform.as_deref(), Some("cisco_ios"));
        assert_eq!(targets[1].address, None);

        let intended = inventory.intended_interfaces(&targets[0]).unwrap();
        assert_eq!(intended.len(), 2);
        assert!(!intended[1].enabled);
        assert!(inventory.intended_interfaces(&targets[1]).unwrap().is_empty());
    }
}
