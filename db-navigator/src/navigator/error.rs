//! Navigator error types.

use std::io;

use crate::api::ApiError;

/// Errors that end the interactive session.
///
/// API failures inside a workflow are reported to the user and never reach
/// this type; only console I/O failures and client setup do.
#[derive(Debug, thiserror::Error)]
pub enum NavigatorError {
    /// Reading from or writing to the console failed
    #[error("console I/O error: {0}")]
    Io(#[from] io::Error),

    /// The API client could not be set up
    #[error("API client error: {0}")]
    Api(#[from] ApiError),
}
