//! Shared error types for the icon generation service

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Unknown provider: {name}")]
    UnknownProvider { name: String },

    #[error("Invalid sampling parameter: {field} = {value}")]
    InvalidSampling { field: String, value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
