//! In-memory implementation of AssetManager.

use dashmap::DashMap;
use soundgraph_api::{AssetManager, ClassRegistryKey, ClassType, Document};
use std::sync::Arc;

/// Documents of graph classes, keyed the way a referencing document sees them
pub struct InMemoryAssetManager {
    assets: DashMap<ClassRegistryKey, Arc<Document>>,
}

impl InMemoryAssetManager {
    pub fn new() -> Self {
        Self {
            assets: DashMap::new(),
        }
    }

    pub fn register(&self, key: ClassRegistryKey, document: Arc<Document>) {
        self.assets.insert(key, document);
    }

    /// Registers `document` under the external key of its root graph class.
    pub fn register_document(&self, document: Document) -> ClassRegistryKey {
        let metadata = &document.root_graph.metadata;
        let key =
            ClassRegistryKey::new(ClassType::External, &metadata.class_name, metadata.version);
        tracing::debug!("Registered asset {}", key);
        self.assets.insert(key.clone(), Arc::new(document));
        key
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl Default for InMemoryAssetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetManager for InMemoryAssetManager {
    fn try_load_asset_from_key(&self, key: &ClassRegistryKey) -> Option<Arc<Document>> {
        self.assets.get(key).map(|entry| Arc::clone(entry.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundgraph_api::{ClassName, InterfaceVersion};

    #[test]
    fn test_register_document_uses_external_key() {
        let manager = InMemoryAssetManager::new();
        let mut document = Document::new();
        document.root_graph.metadata.class_name = ClassName::new("", "Patch", "");
        document.interfaces.insert(InterfaceVersion::new("Source", 1, 0));

        let key = manager.register_document(document);
        assert_eq!(key.class_type, ClassType::External);

        let loaded = manager.try_load_asset_from_key(&key).unwrap();
        assert_eq!(loaded.interfaces.len(), 1);
    }
}
