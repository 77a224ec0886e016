//! Dependency lookups by registry key and by class id.

use crate::error::{FrontendError, Result};
use soundgraph_api::{ClassDescriptor, ClassRegistryKey, Document, DocumentArray, Guid};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyCache {
    key_to_index: HashMap<ClassRegistryKey, usize>,
    id_to_index: HashMap<Guid, usize>,
}

impl DependencyCache {
    pub fn from_document(document: &Document) -> Self {
        let mut cache = Self::default();
        cache.reload(document);
        cache
    }

    pub fn reload(&mut self, document: &Document) {
        self.key_to_index.clear();
        self.id_to_index.clear();
        for index in 0..document.dependencies.len() {
            self.on_added(document, index);
        }
    }

    pub fn on_added(&mut self, document: &Document, index: usize) {
        let Some(class) = document.dependencies.get(index) else {
            tracing::error!("Dependency added at out of range index {}", index);
            return;
        };
        self.key_to_index
            .insert(ClassRegistryKey::from(&class.metadata), index);
        self.id_to_index.insert(class.id, index);
    }

    pub fn on_removing(&mut self, document: &Document, index: usize) {
        let Some(class) = document.dependencies.get(index) else {
            tracing::error!("Dependency removing at out of range index {}", index);
            return;
        };
        let key = ClassRegistryKey::from(&class.metadata);
        if self.key_to_index.get(&key) == Some(&index) {
            self.key_to_index.remove(&key);
        }
        if self.id_to_index.get(&class.id) == Some(&index) {
            self.id_to_index.remove(&class.id);
        }
    }

    pub fn find_index(&self, class_id: &Guid) -> Option<usize> {
        self.id_to_index.get(class_id).copied()
    }

    pub fn find_index_by_key(&self, key: &ClassRegistryKey) -> Option<usize> {
        self.key_to_index.get(key).copied()
    }

    pub fn find<'a>(&self, document: &'a Document, class_id: &Guid) -> Option<&'a ClassDescriptor> {
        self.find_index(class_id)
            .and_then(|index| document.dependencies.get(index))
    }

    pub fn find_by_key<'a>(
        &self,
        document: &'a Document,
        key: &ClassRegistryKey,
    ) -> Option<&'a ClassDescriptor> {
        self.find_index_by_key(key)
            .and_then(|index| document.dependencies.get(index))
    }

    pub fn contains(&self, class_id: &Guid) -> bool {
        self.id_to_index.contains_key(class_id)
    }

    pub fn len(&self) -> usize {
        self.id_to_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_index.is_empty()
    }

    pub fn verify(&self, document: &Document) -> Result<()> {
        let fresh = Self::from_document(document);
        if *self == fresh {
            return Ok(());
        }
        Err(FrontendError::CacheDesync {
            array: DocumentArray::Dependencies,
            detail: format!(
                "cached {} ids / {} keys, document holds {} ids / {} keys",
                self.id_to_index.len(),
                self.key_to_index.len(),
                fresh.id_to_index.len(),
                fresh.key_to_index.len()
            ),
        })
    }
}
