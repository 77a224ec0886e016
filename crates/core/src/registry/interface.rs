//! In-memory implementation of InterfaceRegistry.

use dashmap::DashMap;
use soundgraph_api::{ApiError, ApiResult, InterfaceDescriptor, InterfaceRegistry, InterfaceVersion};

/// Thread-safe interface registry keyed by interface version
pub struct InMemoryInterfaceRegistry {
    entries: DashMap<InterfaceVersion, InterfaceDescriptor>,
}

impl InMemoryInterfaceRegistry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Registers an interface. A version can only be registered once.
    pub fn register(&self, interface: InterfaceDescriptor) -> ApiResult<()> {
        if interface.version.name.is_empty() {
            return Err(ApiError::InvalidArgument(
                "interface name must not be empty".to_string(),
            ));
        }
        if self.entries.contains_key(&interface.version) {
            return Err(ApiError::InvalidArgument(format!(
                "interface '{}' already registered",
                interface.version
            )));
        }
        tracing::debug!("Registered interface {}", interface.version);
        self.entries.insert(interface.version.clone(), interface);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryInterfaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InterfaceRegistry for InMemoryInterfaceRegistry {
    fn find_interface_with_highest_version(&self, name: &str) -> Option<InterfaceDescriptor> {
        self.entries
            .iter()
            .filter(|entry| entry.key().name == name)
            .max_by_key(|entry| entry.key().number)
            .map(|entry| entry.value().clone())
    }

    fn find_interface_registry_entry(
        &self,
        version: &InterfaceVersion,
    ) -> Option<InterfaceDescriptor> {
        self.entries.get(version).map(|entry| entry.value().clone())
    }

    fn find_default_interface_versions(&self, class_path: &str) -> Vec<InterfaceVersion> {
        let mut versions: Vec<InterfaceVersion> = self
            .entries
            .iter()
            .filter(|entry| {
                entry
                    .value()
                    .find_class_options(class_path)
                    .is_some_and(|options| options.is_default)
            })
            .map(|entry| entry.key().clone())
            .collect();
        versions.sort();
        versions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundgraph_api::InterfaceClassOptions;

    #[test]
    fn test_highest_version_wins() {
        let registry = InMemoryInterfaceRegistry::new();
        registry
            .register(InterfaceDescriptor::new(InterfaceVersion::new("Source", 1, 0)))
            .unwrap();
        registry
            .register(InterfaceDescriptor::new(InterfaceVersion::new("Source", 1, 3)))
            .unwrap();
        registry
            .register(InterfaceDescriptor::new(InterfaceVersion::new("Other", 9, 0)))
            .unwrap();

        let found = registry.find_interface_with_highest_version("Source").unwrap();
        assert_eq!(found.version, InterfaceVersion::new("Source", 1, 3));
        assert!(registry.find_interface_with_highest_version("Missing").is_none());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = InMemoryInterfaceRegistry::new();
        let interface = InterfaceDescriptor::new(InterfaceVersion::new("Source", 1, 0));
        registry.register(interface.clone()).unwrap();
        assert!(matches!(
            registry.register(interface),
            Err(ApiError::InvalidArgument(_))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_default_versions_for_class_path() {
        let registry = InMemoryInterfaceRegistry::new();
        let options = InterfaceClassOptions {
            class_path: "/Script/Source".to_string(),
            is_modifiable: true,
            is_default: true,
        };
        registry
            .register(
                InterfaceDescriptor::new(InterfaceVersion::new("Source", 1, 0))
                    .with_class_options(options),
            )
            .unwrap();
        registry
            .register(InterfaceDescriptor::new(InterfaceVersion::new("Other", 1, 0)))
            .unwrap();

        assert_eq!(
            registry.find_default_interface_versions("/Script/Source"),
            vec![InterfaceVersion::new("Source", 1, 0)]
        );
        assert!(registry.find_default_interface_versions("/Script/Patch").is_empty());
    }
}
