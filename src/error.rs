// src/error.rs
// =============================================================================
// This module defines the error taxonomy for the scan lifecycle.
//
// Every way a check can fail is an explicit variant:
// - EmptyInput / InvalidFormat: rejected locally, before any request is sent
// - Network: the scanning service could not be reached at all
// - Service: the service answered with a failure status (and maybe a reason)
// - Unexpected: anything else (e.g. a malformed success response)
//
// Rust concepts:
// - thiserror: Derive macro that implements Display and std::error::Error
// - Enums with data: Variants can carry the detail that caused them
// =============================================================================

use thiserror::Error;

// One variant per failure mode of a URL check.
//
// The #[error("...")] strings are the diagnostic form (what ends up in logs);
// user_message() below is the friendly form shown in the UI.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The input was empty after trimming whitespace
    #[error("no URL was entered")]
    EmptyInput,

    /// The input is not a URL with an http(s) scheme and a host
    #[error("input is not a valid URL")]
    InvalidFormat,

    /// Transport-level failure: no response from the service at all
    #[error("could not reach the scanning service: {0}")]
    Network(String),

    /// The service responded with a failure status; carries its message
    #[error("scanning service returned an error: {0}")]
    Service(String),

    /// Anything else that broke mid-lifecycle
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl CheckError {
    /// The message shown to the user in the notification area.
    ///
    /// Service errors show the service's own message verbatim (it is already
    /// user-facing, e.g. "rate limited"). The other variants map to fixed
    /// strings; their underlying detail only goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            CheckError::EmptyInput => "Please enter a URL to check.".to_string(),
            CheckError::InvalidFormat => {
                "Please enter a valid URL (e.g. https://example.com).".to_string()
            }
            CheckError::Network(_) => {
                "Could not reach the scanning service. Check your connection and try again."
                    .to_string()
            }
            CheckError::Service(message) => message.clone(),
            CheckError::Unexpected(_) => {
                "Something went wrong while checking the URL. Please try again.".to_string()
            }
        }
    }
}
