//! Builder configuration.

use serde::{Deserialize, Serialize};

/// Environment variable toggling post-mutation cache verification.
pub const VERIFY_CACHE_ENV: &str = "SOUNDGRAPH_VERIFY_CACHE";

/// Environment variable naming the builder's class path.
pub const CLASS_PATH_ENV: &str = "SOUNDGRAPH_CLASS_PATH";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BuilderConfig {
    /// Check every cache against the document after each mutating operation.
    pub verify_cache: bool,
    /// Class path used for interface modifiability and default interfaces.
    /// An empty path defers to the document handle.
    pub class_path: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            verify_cache: cfg!(debug_assertions),
            class_path: String::new(),
        }
    }
}

impl BuilderConfig {
    /// Defaults overridden by `SOUNDGRAPH_VERIFY_CACHE` and `SOUNDGRAPH_CLASS_PATH`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(VERIFY_CACHE_ENV) {
            if let Some(flag) = parse_flag(&value) {
                config.verify_cache = flag;
            } else {
                tracing::warn!("Ignoring unrecognized {}={:?}", VERIFY_CACHE_ENV, value);
            }
        }
        if let Ok(class_path) = std::env::var(CLASS_PATH_ENV) {
            config.class_path = class_path;
        }
        config
    }

    pub fn with_verify_cache(mut self, verify_cache: bool) -> Self {
        self.verify_cache = verify_cache;
        self
    }

    pub fn with_class_path(mut self, class_path: impl Into<String>) -> Self {
        self.class_path = class_path.into();
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_builder_methods() {
        let config = BuilderConfig::default()
            .with_verify_cache(true)
            .with_class_path("/Script/Soundgraph.Source");
        assert!(config.verify_cache);
        assert_eq!(config.class_path, "/Script/Soundgraph.Source");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: BuilderConfig =
            serde_json::from_str(r#"{ "class_path": "/Script/Soundgraph.Patch" }"#).unwrap();
        assert_eq!(config.class_path, "/Script/Soundgraph.Patch");
        assert_eq!(config.verify_cache, BuilderConfig::default().verify_cache);
    }
}
