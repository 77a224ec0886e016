//! Collaborators consumed by the document builder.
//!
//! Every lookup is synchronous and returns `None` (or an empty list) when
//! nothing is registered; the builder treats that as "could not resolve".

use crate::models::{
    AccessType, ClassDescriptor, ClassName, ClassRegistryKey, Document, InterfaceBindingEntry,
    InterfaceDescriptor, InterfaceVersion, LiteralType,
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Registered interfaces and their per-class options.
pub trait InterfaceRegistry: Send + Sync {
    /// Highest registered version of the interface called `name`.
    fn find_interface_with_highest_version(&self, name: &str) -> Option<InterfaceDescriptor>;

    /// Exact version lookup.
    fn find_interface_registry_entry(
        &self,
        version: &InterfaceVersion,
    ) -> Option<InterfaceDescriptor>;

    /// Versions declared by default on new documents of `class_path`.
    fn find_default_interface_versions(&self, class_path: &str) -> Vec<InterfaceVersion>;
}

/// Binding rules between interfaces.
pub trait InterfaceBindingRegistry: Send + Sync {
    /// All rules whose input side is `input_interface`, in registration order.
    fn find_interface_binding_entries(
        &self,
        input_interface: &InterfaceVersion,
    ) -> Vec<InterfaceBindingEntry>;
}

/// Node classes available to documents.
pub trait NodeClassRegistry: Send + Sync {
    fn find_class(&self, key: &ClassRegistryKey) -> Option<ClassDescriptor>;

    /// Highest minor version of `class_name` within `major_version`.
    fn find_class_with_highest_minor_version(
        &self,
        class_name: &ClassName,
        major_version: u32,
    ) -> Option<ClassDescriptor>;

    /// Interfaces implemented by a registered class, if known.
    fn find_implemented_interfaces(&self, key: &ClassRegistryKey)
    -> Option<BTreeSet<InterfaceVersion>>;
}

/// Loads documents backing graph classes.
pub trait AssetManager: Send + Sync {
    /// May block on storage. `None` when no asset is registered for `key`.
    fn try_load_asset_from_key(&self, key: &ClassRegistryKey) -> Option<Arc<Document>>;
}

/// Data types and the member classes created for them.
pub trait DataTypeRegistry: Send + Sync {
    /// Class of a graph input member node for `type_name`.
    fn input_class(&self, type_name: &str, access_type: AccessType) -> Option<ClassDescriptor>;

    /// Class of a graph output member node for `type_name`.
    fn output_class(&self, type_name: &str, access_type: AccessType) -> Option<ClassDescriptor>;

    fn is_literal_type_supported(&self, type_name: &str, literal_type: LiteralType) -> bool;
}
