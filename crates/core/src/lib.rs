//! Mutable node-graph documents: index caches, the document builder and
//! interface-driven wiring.

pub mod analysis;
pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;

pub use analysis::GraphTopology;
pub use builder::{
    DocumentBuilder, EdgeBatch, ModifyInterfaceOptions, NamePairingFn, interface_bound_edges,
};
pub use cache::{DocumentCache, DocumentObserver};
pub use config::BuilderConfig;
pub use error::{FrontendError, Result};
pub use logging::init_logging;
pub use registry::Registries;
