// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, obs::Operation};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(operation: Operation, stage: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"helpdesk_client.operation",
				operation = operation.as_str(),
				stage
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a warning when a request was throttled and is about to back off.
pub(crate) fn log_rate_limited(
	operation: Operation,
	attempt: u32,
	backoff: StdDuration,
	retry_after: Option<Duration>,
) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			operation = operation.as_str(),
			attempt,
			backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
			retry_after_secs = retry_after.map(|value| value.whole_seconds()),
			"Request was rate limited; backing off."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (operation, attempt, backoff, retry_after);
	}
}

/// Emits a debug event when the server rejected the current token.
pub(crate) fn log_unauthorized(operation: Operation, attempt: u32) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			operation = operation.as_str(),
			attempt,
			"Token was rejected; forcing a refresh."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (operation, attempt);
	}
}

/// Emits a debug event when a fresh token was stored.
pub(crate) fn log_token_refreshed(expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(%expires_at, "Stored a refreshed access token.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = expires_at;
	}
}
