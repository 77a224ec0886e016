pub mod error;
pub mod handle;
pub mod models;
pub mod registry;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use handle::{ClassDocument, DocumentHandle};
pub use models::*;
pub use registry::{
    AssetManager, DataTypeRegistry, InterfaceBindingRegistry, InterfaceRegistry,
    NodeClassRegistry,
};
