//! Client and session error types.

use dform_core::DescriptorError;

/// Errors from calls to the descriptor service.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The base URL could not be parsed or joined.
    #[error("invalid service URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    /// HTTP transport error (connection refused, timeout, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service returned a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The response body is not a descriptor list.
    #[error("undecodable response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: DescriptorError,
    },
    /// The submission response body has an unexpected shape.
    #[error("undecodable response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
}

/// Operation attempted on a session that is not ready.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("form is still loading")]
    Loading,
    /// The descriptor fetch failed; the session stays failed.
    #[error("form failed to load: {0}")]
    Failed(String),
    /// `load` was called on a session that already has its descriptors.
    #[error("form is already loaded")]
    AlreadyLoaded,
}
