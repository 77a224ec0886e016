//! In-memory implementation of InterfaceBindingRegistry.

use dashmap::DashMap;
use soundgraph_api::{InterfaceBindingEntry, InterfaceBindingRegistry, InterfaceVersion};

/// Binding rules grouped by their input interface
pub struct InMemoryInterfaceBindingRegistry {
    entries: DashMap<InterfaceVersion, Vec<InterfaceBindingEntry>>,
}

impl InMemoryInterfaceBindingRegistry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn register(&self, entry: InterfaceBindingEntry) {
        tracing::debug!(
            "Registered binding {} -> {} (priority {})",
            entry.output_interface,
            entry.input_interface,
            entry.priority
        );
        self.entries
            .entry(entry.input_interface.clone())
            .or_default()
            .push(entry);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for InMemoryInterfaceBindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InterfaceBindingRegistry for InMemoryInterfaceBindingRegistry {
    fn find_interface_binding_entries(
        &self,
        input_interface: &InterfaceVersion,
    ) -> Vec<InterfaceBindingEntry> {
        self.entries
            .get(input_interface)
            .map(|entries| entries.value().clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundgraph_api::VertexBinding;

    #[test]
    fn test_entries_keep_registration_order() {
        let registry = InMemoryInterfaceBindingRegistry::new();
        let input = InterfaceVersion::new("Output", 1, 0);
        for priority in [5, 1] {
            registry.register(InterfaceBindingEntry {
                input_interface: input.clone(),
                output_interface: InterfaceVersion::new("Source", 1, 0),
                priority,
                vertex_bindings: vec![VertexBinding::new("Out", "In")],
            });
        }

        let entries = registry.find_interface_binding_entries(&input);
        assert_eq!(
            entries.iter().map(|entry| entry.priority).collect::<Vec<_>>(),
            vec![5, 1]
        );
        assert!(registry
            .find_interface_binding_entries(&InterfaceVersion::new("Source", 1, 0))
            .is_empty());
    }
}
