//! In-memory implementation of NodeClassRegistry.

use dashmap::DashMap;
use soundgraph_api::{
    ApiError, ApiResult, ClassDescriptor, ClassName, ClassRegistryKey, InterfaceVersion,
    NodeClassRegistry,
};
use std::collections::BTreeSet;

#[derive(Clone)]
struct RegisteredClass {
    class: ClassDescriptor,
    interfaces: BTreeSet<InterfaceVersion>,
}

/// Node classes keyed by registry key, each with its implemented interfaces
pub struct InMemoryNodeClassRegistry {
    classes: DashMap<ClassRegistryKey, RegisteredClass>,
}

impl InMemoryNodeClassRegistry {
    pub fn new() -> Self {
        Self {
            classes: DashMap::new(),
        }
    }

    pub fn register(&self, class: ClassDescriptor) -> ApiResult<ClassRegistryKey> {
        self.register_with_interfaces(class, BTreeSet::new())
    }

    /// Registers `class`, replacing any class registered under the same key.
    pub fn register_with_interfaces(
        &self,
        class: ClassDescriptor,
        interfaces: BTreeSet<InterfaceVersion>,
    ) -> ApiResult<ClassRegistryKey> {
        if class.metadata.class_name.name.is_empty() {
            return Err(ApiError::InvalidArgument(
                "class name must not be empty".to_string(),
            ));
        }
        let key = ClassRegistryKey::from(&class.metadata);
        tracing::debug!("Registered node class {}", key);
        self.classes
            .insert(key.clone(), RegisteredClass { class, interfaces });
        Ok(key)
    }

    pub fn unregister(&self, key: &ClassRegistryKey) -> Option<ClassDescriptor> {
        self.classes.remove(key).map(|(_, registered)| registered.class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for InMemoryNodeClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeClassRegistry for InMemoryNodeClassRegistry {
    fn find_class(&self, key: &ClassRegistryKey) -> Option<ClassDescriptor> {
        self.classes.get(key).map(|entry| entry.class.clone())
    }

    fn find_class_with_highest_minor_version(
        &self,
        class_name: &ClassName,
        major_version: u32,
    ) -> Option<ClassDescriptor> {
        let full_name = class_name.full_name();
        self.classes
            .iter()
            .filter(|entry| {
                entry.key().full_name == full_name && entry.key().major == major_version
            })
            .max_by_key(|entry| entry.key().minor)
            .map(|entry| entry.class.clone())
    }

    fn find_implemented_interfaces(
        &self,
        key: &ClassRegistryKey,
    ) -> Option<BTreeSet<InterfaceVersion>> {
        self.classes.get(key).map(|entry| entry.interfaces.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundgraph_api::{ClassInterface, ClassMetadata, ClassType, VersionNumber};

    fn class(major: u32, minor: u32) -> ClassDescriptor {
        ClassDescriptor::new(
            ClassMetadata::new(
                ClassName::new("UE", "Sine", "Audio"),
                VersionNumber::new(major, minor),
                ClassType::External,
            ),
            ClassInterface::default(),
        )
    }

    #[test]
    fn test_highest_minor_within_major() {
        let registry = InMemoryNodeClassRegistry::new();
        registry.register(class(1, 0)).unwrap();
        registry.register(class(1, 4)).unwrap();
        registry.register(class(2, 0)).unwrap();

        let name = ClassName::new("UE", "Sine", "Audio");
        let found = registry.find_class_with_highest_minor_version(&name, 1).unwrap();
        assert_eq!(found.metadata.version, VersionNumber::new(1, 4));
        assert!(registry.find_class_with_highest_minor_version(&name, 3).is_none());
    }

    #[test]
    fn test_implemented_interfaces() {
        let registry = InMemoryNodeClassRegistry::new();
        let interfaces = BTreeSet::from([InterfaceVersion::new("Source", 1, 0)]);
        let key = registry
            .register_with_interfaces(class(1, 0), interfaces.clone())
            .unwrap();

        assert_eq!(registry.find_implemented_interfaces(&key), Some(interfaces));
        assert!(registry.unregister(&key).is_some());
        assert!(registry.find_implemented_interfaces(&key).is_none());
    }
}
