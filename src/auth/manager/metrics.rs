// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for token endpoint traffic.
#[derive(Debug, Default)]
pub struct TokenMetrics {
	attempts: AtomicU64,
	requests: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
}
impl TokenMetrics {
	/// Returns the number of refresh operations started.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of HTTP requests sent to the token endpoint (retries included).
	pub fn requests(&self) -> u64 {
		self.requests.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes that stored a new token.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes that failed.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_request(&self) {
		self.requests.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}
}
