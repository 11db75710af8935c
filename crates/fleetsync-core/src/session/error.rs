//! Session errors

use thiserror::Error;

/// Errors from the persistent key-value session backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed session data: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Session store lock poisoned")]
    Poisoned,
}

/// Errors that can occur during driver sign-in
#[derive(Error, Debug)]
pub enum AuthError {
    /// Either credential field was empty. Recoverable: the form is shown
    /// again with a notification.
    #[error("Driver ID and password are required")]
    MissingCredentials,

    #[error("Session store error: {0}")]
    Store(#[from] StoreError),
}
