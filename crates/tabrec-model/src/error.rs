use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid field descriptor {name}: {message}")]
    InvalidField { name: String, message: String },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
