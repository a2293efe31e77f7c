//! CLI output: what a command hands back to the binary, and error mapping.

use crate::error::ApiError;

/// Result of a successful command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Printed followed by a newline
    Text(String),
    /// Written to stdout unchanged
    Bytes(Vec<u8>),
    /// Nothing to print
    Empty,
}

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::InvalidContainer(_) | ApiError::Decode(_) => {
            format!("error reading or decoding file: {}", e)
        }
        _ => e.to_string(),
    }
}
