//! Client-level error types shared across the token manager, executor, and listers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Rate limiting and stale tokens are recovered locally with bounded retries; every other
/// condition surfaces here with its kind intact so callers can branch on it.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Endpoint descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::endpoint::DescriptorError),
	/// Transport or decoding failure that is not worth retrying.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The server kept rate limiting the operation past its retry budget.
	#[error("Unable to complete {operation}: still rate limited after {attempts} attempts.")]
	RateLimitExhausted {
		/// Operation label (`token_refresh`, `api_call`).
		operation: &'static str,
		/// Attempts spent before giving up.
		attempts: u32,
	},
	/// Credentials were rejected, or re-authentication ran out of attempts.
	#[error("Authorization failed: {reason}.")]
	AuthorizationFailed {
		/// Human-readable reason string.
		reason: String,
	},
	/// The server answered with a payload that violates the API contract.
	#[error("Server returned an invalid response: {reason}.")]
	InvalidServerResponse {
		/// Human-readable reason string.
		reason: String,
	},
	/// A listing visitor asked to stop early. Not a fault.
	#[error("Listing was interrupted by the visitor.")]
	Interrupted,
}
impl Error {
	/// Returns `true` when a visitor stopped the listing on purpose.
	///
	/// Callers should treat this as success with an early stop.
	pub fn is_interrupted(&self) -> bool {
		matches!(self, Self::Interrupted)
	}

	/// Returns `true` for rate-limit exhaustion.
	pub fn is_rate_limited(&self) -> bool {
		matches!(self, Self::RateLimitExhausted { .. })
	}

	/// Returns `true` for authorization failures.
	pub fn is_authorization(&self) -> bool {
		matches!(self, Self::AuthorizationFailed { .. })
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint string cannot be parsed.
	#[error("Endpoint `{url}` is not a valid URL.")]
	InvalidEndpoint {
		/// Raw endpoint string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Resource path produced an invalid URL.
	#[error("Resource `{resource}` does not form a valid URL.")]
	InvalidResource {
		/// Resource path that was appended to the API base.
		resource: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A filter timestamp could not be formatted.
	#[error("Filter timestamp could not be formatted.")]
	TimeFormat(#[from] time::error::Format),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, status, payload decoding).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The API answered with a status the client does not retry.
	#[error("API responded with HTTP {status}: {body}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body: String,
	},
	/// Response body did not match the expected shape.
	#[error("API response could not be decoded.")]
	Decode {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be encoded.")]
	Encode(#[source] serde_json::Error),
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
