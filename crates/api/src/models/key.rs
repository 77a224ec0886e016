use super::class::{ClassMetadata, ClassName, ClassType, VersionNumber};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite key of a node class in registries and dependency caches.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassRegistryKey {
    pub class_type: ClassType,
    pub full_name: String,
    pub major: u32,
    pub minor: u32,
}

impl ClassRegistryKey {
    pub fn new(class_type: ClassType, class_name: &ClassName, version: VersionNumber) -> Self {
        Self {
            class_type,
            full_name: class_name.full_name(),
            major: version.major,
            minor: version.minor,
        }
    }

    pub fn version(&self) -> VersionNumber {
        VersionNumber::new(self.major, self.minor)
    }
}

impl From<&ClassMetadata> for ClassRegistryKey {
    fn from(metadata: &ClassMetadata) -> Self {
        Self::new(metadata.class_type, &metadata.class_name, metadata.version)
    }
}

impl fmt::Display for ClassRegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}.{}",
            self.class_type, self.full_name, self.major, self.minor
        )
    }
}
