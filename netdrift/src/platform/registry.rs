//! Registry for looking up platform definitions by dialect tag.

use indexmap::IndexMap;

use super::definition::PlatformDefinition;
use super::vendors;
use crate::error::PlatformError;

/// Dialect tag → platform definition.
///
/// `PlatformRegistry::default()` holds the built-in platforms; `new()` is
/// empty.
#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    platforms: IndexMap<String, PlatformDefinition>,
}

impl PlatformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            platforms: IndexMap::new(),
        }
    }

    fn register_builtin_platforms(&mut self) {
        let ios = vendors::cisco_ios::platform();
        self.platforms
            .insert("cisco_iosxe".to_string(), ios.aliased("cisco_iosxe"));
        self.platforms.insert(ios.name.clone(), ios);
    }

    /// Register a platform definition.
    pub fn register(&mut self, platform: PlatformDefinition) -> Result<(), PlatformError> {
        if self.platforms.contains_key(&platform.name) {
            return Err(PlatformError::AlreadyRegistered {
                name: platform.name.clone(),
            });
        }
        self.platforms.insert(platform.name.clone(), platform);
        Ok(())
    }

    /// Get a platform by name.
    pub fn get(&self, name: &str) -> Option<&PlatformDefinition> {
        self.platforms.get(name)
    }

    /// Get a platform by name, failing for unknown tags.
    pub fn resolve(&self, name: &str) -> Result<&PlatformDefinition, PlatformError> {
        self.get(name).ok_or_else(|| PlatformError::UnknownPlatform {
            name: name.to_string(),
        })
    }

    /// Check if a platform is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.platforms.contains_key(name)
    }

    /// List all registered platform names.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.platforms.keys()
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_platforms();
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins() {
        let registry = PlatformRegistry::default();
        assert!(registry.contains("cisco_ios"));
        assert_eq!(registry.resolve("cisco_iosxe").unwrap().name, "cisco_iosxe");
        assert!(PlatformRegistry::new().names().next().is_none());
    }

    #[test]
    fn test_unknown_platform() {
        let registry = PlatformRegistry::default();
        assert!(matches!(
            registry.resolve("vyos"),
            Err(PlatformError::UnknownPlatform { .. })
        ));
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = PlatformRegistry::default();
        let custom = PlatformDefinition::new("nxos", r"[>#]\s*$").unwrap();
        registry.register(custom.clone()).unwrap();
        assert!(registry.contains("nxos"));
        assert!(matches!(
            registry.register(custom),
            Err(PlatformError::AlreadyRegistered { .. })
        ));
    }
}
