//! In-memory implementation of DataTypeRegistry.
//!
//! Member classes are created on first request and reused afterwards, so
//! every input or output member of a data type shares stable vertex ids.

use dashmap::DashMap;
use smol_str::SmolStr;
use soundgraph_api::{
    AccessType, ApiError, ApiResult, ClassDescriptor, ClassInterface, ClassMetadata, ClassName,
    ClassType, ClassVertex, DataTypeRegistry, LiteralType, VersionNumber,
};

/// Variant of member classes whose vertices have value access.
pub const CONSTRUCTOR_VARIANT: &str = "Constructor";

/// Registered data types and their lazily created member classes
pub struct InMemoryDataTypeRegistry {
    literal_types: DashMap<SmolStr, Vec<LiteralType>>,
    member_classes: DashMap<(SmolStr, AccessType, ClassType), ClassDescriptor>,
}

impl InMemoryDataTypeRegistry {
    pub fn new() -> Self {
        Self {
            literal_types: DashMap::new(),
            member_classes: DashMap::new(),
        }
    }

    /// Registers `type_name` accepting defaults of `literal_types`.
    pub fn register(
        &self,
        type_name: impl Into<SmolStr>,
        literal_types: impl IntoIterator<Item = LiteralType>,
    ) -> ApiResult<()> {
        let type_name = type_name.into();
        if type_name.is_empty() {
            return Err(ApiError::InvalidArgument(
                "data type name must not be empty".to_string(),
            ));
        }
        let mut supported: Vec<LiteralType> = literal_types.into_iter().collect();
        if !supported.contains(&LiteralType::None) {
            supported.push(LiteralType::None);
        }
        self.literal_types.insert(type_name, supported);
        Ok(())
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.literal_types.contains_key(type_name)
    }

    fn member_class(
        &self,
        type_name: &str,
        access_type: AccessType,
        class_type: ClassType,
    ) -> Option<ClassDescriptor> {
        if !self.is_registered(type_name) {
            tracing::warn!("Data type '{}' is not registered", type_name);
            return None;
        }

        let key = (SmolStr::new(type_name), access_type, class_type);
        let class = self
            .member_classes
            .entry(key)
            .or_insert_with(|| build_member_class(type_name, access_type, class_type));
        Some(class.value().clone())
    }
}

impl Default for InMemoryDataTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DataTypeRegistry for InMemoryDataTypeRegistry {
    fn input_class(&self, type_name: &str, access_type: AccessType) -> Option<ClassDescriptor> {
        self.member_class(type_name, access_type, ClassType::Input)
    }

    fn output_class(&self, type_name: &str, access_type: AccessType) -> Option<ClassDescriptor> {
        self.member_class(type_name, access_type, ClassType::Output)
    }

    fn is_literal_type_supported(&self, type_name: &str, literal_type: LiteralType) -> bool {
        self.literal_types
            .get(type_name)
            .is_some_and(|supported| supported.contains(&literal_type))
    }
}

/// Pass-through class with one input and one output vertex of `type_name`.
fn build_member_class(
    type_name: &str,
    access_type: AccessType,
    class_type: ClassType,
) -> ClassDescriptor {
    let variant = match access_type {
        AccessType::Value => CONSTRUCTOR_VARIANT,
        AccessType::Reference => "",
    };
    let metadata = ClassMetadata::new(
        ClassName::new("", type_name, variant),
        VersionNumber::new(1, 0),
        class_type,
    );
    let vertex = || ClassVertex::new(type_name, type_name).with_access_type(access_type);
    ClassDescriptor::new(
        metadata,
        ClassInterface {
            inputs: vec![vertex()],
            outputs: vec![vertex()],
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundgraph_api::ClassRegistryKey;

    #[test]
    fn test_member_classes_are_stable() {
        let registry = InMemoryDataTypeRegistry::new();
        registry.register("Float", [LiteralType::Float]).unwrap();

        let first = registry.input_class("Float", AccessType::Reference).unwrap();
        let second = registry.input_class("Float", AccessType::Reference).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.metadata.class_type, ClassType::Input);
    }

    #[test]
    fn test_access_type_selects_distinct_class() {
        let registry = InMemoryDataTypeRegistry::new();
        registry.register("Float", [LiteralType::Float]).unwrap();

        let reference = registry.output_class("Float", AccessType::Reference).unwrap();
        let value = registry.output_class("Float", AccessType::Value).unwrap();
        assert_ne!(
            ClassRegistryKey::from(&reference.metadata),
            ClassRegistryKey::from(&value.metadata)
        );
        assert_eq!(value.interface.inputs[0].access_type, AccessType::Value);
    }

    #[test]
    fn test_literal_support() {
        let registry = InMemoryDataTypeRegistry::new();
        registry.register("Float", [LiteralType::Float]).unwrap();

        assert!(registry.is_literal_type_supported("Float", LiteralType::Float));
        assert!(registry.is_literal_type_supported("Float", LiteralType::None));
        assert!(!registry.is_literal_type_supported("Float", LiteralType::String));
        assert!(!registry.is_literal_type_supported("Audio", LiteralType::Float));
        assert!(registry.input_class("Audio", AccessType::Reference).is_none());
        assert!(registry.register("", []).is_err());
    }
}
