//! Catalog client error types

use thiserror::Error;

/// Failure of a single round trip to the catalog API.
///
/// `Remote` means the server answered outside the 2xx range. Every other
/// variant means no usable response came back.
#[derive(Debug, Error)]
pub enum ClientError {
  /// Connection, DNS, TLS or timeout failure
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  /// Response body was not the JSON we expected
  #[error("invalid response body: {0}")]
  Decode(#[from] serde_json::Error),

  /// Base URL and path did not form a valid URL
  #[error("invalid request URL: {0}")]
  InvalidUrl(#[from] url::ParseError),

  /// Server answered with a non-success status
  #[error("HTTP {status}: {body}")]
  Remote { status: u16, body: String },
}

impl ClientError {
  /// HTTP status for `Remote` errors
  pub fn status(&self) -> Option<u16> {
    match self {
      ClientError::Remote { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// True when no HTTP response was received or it could not be used
  pub fn is_transport(&self) -> bool {
    !matches!(self, ClientError::Remote { .. })
  }
}

/// Result type for catalog client operations
pub type ClientResult<T> = Result<T, ClientError>;
