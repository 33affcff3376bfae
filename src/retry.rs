//! Retry bounds shared by the token manager and the request executor.
//!
//! [`RetryPolicy`] is long-lived configuration. [`RetryBudget`] is created fresh for every
//! logical operation and never shared between concurrent operations.

// std
use std::time::Duration as StdDuration;

/// Bounds and backoff applied to rate-limited and unauthorized requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Attempts allowed per request while the server keeps rate limiting.
	pub rate_limit_attempts: u32,
	/// Full attempts (each with a token) allowed while the server rejects the token.
	pub authorization_attempts: u32,
	/// Sleep between rate-limited attempts.
	pub backoff: StdDuration,
}
impl RetryPolicy {
	/// Default rate-limit attempts per request.
	pub const DEFAULT_RATE_LIMIT_ATTEMPTS: u32 = 10;
	/// Default authorization attempts per logical call.
	pub const DEFAULT_AUTHORIZATION_ATTEMPTS: u32 = 3;
	/// Default sleep between rate-limited attempts.
	pub const DEFAULT_BACKOFF: StdDuration = StdDuration::from_secs(1);

	/// Overrides the rate-limit attempt bound (clamped to at least one).
	pub fn with_rate_limit_attempts(mut self, attempts: u32) -> Self {
		self.rate_limit_attempts = attempts.max(1);

		self
	}

	/// Overrides the authorization attempt bound (clamped to at least one).
	pub fn with_authorization_attempts(mut self, attempts: u32) -> Self {
		self.authorization_attempts = attempts.max(1);

		self
	}

	/// Overrides the backoff between rate-limited attempts.
	pub fn with_backoff(mut self, backoff: StdDuration) -> Self {
		self.backoff = backoff;

		self
	}

	/// Upper bound on transport attempts for one logical call.
	pub fn max_transport_attempts(&self) -> u32 {
		self.rate_limit_attempts.saturating_mul(self.authorization_attempts)
	}

	/// Starts a fresh budget for one logical operation.
	pub fn budget(&self) -> RetryBudget {
		RetryBudget { policy: *self, rate_limited: 0, authorizations: 0 }
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			rate_limit_attempts: Self::DEFAULT_RATE_LIMIT_ATTEMPTS,
			authorization_attempts: Self::DEFAULT_AUTHORIZATION_ATTEMPTS,
			backoff: Self::DEFAULT_BACKOFF,
		}
	}
}

/// Per-operation retry counters.
#[derive(Clone, Debug)]
pub struct RetryBudget {
	policy: RetryPolicy,
	rate_limited: u32,
	authorizations: u32,
}
impl RetryBudget {
	/// Records a rate-limited attempt. Returns `false` once the bound is reached.
	pub fn spend_rate_limit(&mut self) -> bool {
		self.rate_limited += 1;

		self.rate_limited < self.policy.rate_limit_attempts
	}

	/// Resets the rate-limit counter; each new token starts a fresh inner loop.
	pub fn reset_rate_limit(&mut self) {
		self.rate_limited = 0;
	}

	/// Records the start of a full attempt. Returns `false` once the bound is exceeded.
	pub fn spend_authorization(&mut self) -> bool {
		self.authorizations += 1;

		self.authorizations <= self.policy.authorization_attempts
	}

	/// Rate-limited attempts recorded so far.
	pub fn rate_limited(&self) -> u32 {
		self.rate_limited
	}

	/// Full attempts recorded so far.
	pub fn authorizations(&self) -> u32 {
		self.authorizations
	}

	/// Backoff to sleep after a rate-limited attempt.
	pub fn backoff(&self) -> StdDuration {
		self.policy.backoff
	}
}
