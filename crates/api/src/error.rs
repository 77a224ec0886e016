#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Interface not registered: {0}")]
    InterfaceNotFound(String),
    #[error("Class not registered: {0}")]
    ClassNotFound(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
