use soundgraph_api::{ApiError, DocumentArray, Guid};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("Cache out of sync with {array:?} array: {detail}")]
    CacheDesync { array: DocumentArray, detail: String },
    #[error("Interface not registered: {0}")]
    InterfaceNotFound(String),
    #[error("Graph contains a cycle through node {0}")]
    GraphCycle(Guid),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, FrontendError>;
