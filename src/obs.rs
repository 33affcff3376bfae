//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `helpdesk_client.operation` with the
//!   `operation` and `stage` fields, plus retry events inside them.
//! - Enable `metrics` to increment the `helpdesk_client_operation_total` counter for every
//!   attempt/success/failure/retry, labeled by `operation` + `event`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Client-credentials token refresh.
	TokenRefresh,
	/// One logical API call through the executor.
	ApiCall,
	/// Sequential page-by-page listing.
	List,
	/// Concurrent page fetch.
	FetchPages,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::TokenRefresh => "token_refresh",
			Operation::ApiCall => "api_call",
			Operation::List => "list",
			Operation::FetchPages => "fetch_pages",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Event labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationEvent {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// The server throttled a request; the operation backs off.
	RateLimited,
	/// The server rejected the token; the operation re-authenticates.
	Unauthorized,
	/// A visitor stopped a listing early.
	Interrupted,
}
impl OperationEvent {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationEvent::Attempt => "attempt",
			OperationEvent::Success => "success",
			OperationEvent::Failure => "failure",
			OperationEvent::RateLimited => "rate_limited",
			OperationEvent::Unauthorized => "unauthorized",
			OperationEvent::Interrupted => "interrupted",
		}
	}

	/// Maps an operation result onto its terminal event.
	pub fn for_result<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => OperationEvent::Success,
			Err(Error::Interrupted) => OperationEvent::Interrupted,
			Err(_) => OperationEvent::Failure,
		}
	}
}
impl Display for OperationEvent {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
