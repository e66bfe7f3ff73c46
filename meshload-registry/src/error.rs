use thiserror::Error;

use meshload_core::CoreError;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid endpoint definition: {0}")]
    InvalidEndpoint(#[from] CoreError),

    #[error("Endpoint feed closed, definition for '{0}' was not delivered")]
    FeedClosed(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
