//! Token lifecycle orchestration with expiry skew, single-flight refresh, and bounded
//! rate-limit retry.
//!
//! [`TokenManager::token`] returns the held bearer token while it stays fresh for longer than
//! the expiry skew. Otherwise (or when forced) it performs a `client_credentials` exchange
//! against the token endpoint. Refreshes are serialized behind an async guard so concurrent
//! callers piggy-back on the same in-flight exchange instead of stampeding the endpoint.

mod metrics;

pub use metrics::TokenMetrics;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credentials, DEFAULT_EXPIRY_SKEW, Secret, token::TokenResponse},
	http::{ApiHttpClient, ApiRequest, HttpMethod, TransportFailure},
	obs::{self, Operation, OperationEvent, OperationSpan},
	retry::RetryPolicy,
};

/// Owns the bearer token for one API client and refreshes it on demand.
pub struct TokenManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	http_client: Arc<C>,
	credentials: Credentials,
	token_endpoint: Url,
	policy: RetryPolicy,
	expiry_skew: Duration,
	held: RwLock<Option<AccessToken>>,
	refresh_guard: AsyncMutex<()>,
	metrics: Arc<TokenMetrics>,
}
impl<C> TokenManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a manager that exchanges `credentials` at `token_endpoint`.
	pub fn new(
		http_client: impl Into<Arc<C>>,
		credentials: Credentials,
		token_endpoint: Url,
	) -> Self {
		Self {
			http_client: http_client.into(),
			credentials,
			token_endpoint,
			policy: RetryPolicy::default(),
			expiry_skew: DEFAULT_EXPIRY_SKEW,
			held: RwLock::new(None),
			refresh_guard: AsyncMutex::new(()),
			metrics: Default::default(),
		}
	}

	/// Overrides the retry policy used for token endpoint calls.
	pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Overrides the safety margin applied before expiry (defaults to 10 minutes).
	pub fn with_expiry_skew(mut self, skew: Duration) -> Self {
		self.expiry_skew = if skew.is_negative() { Duration::ZERO } else { skew };

		self
	}

	/// Returns the credentials this manager authenticates with.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Returns the shared counters for token endpoint traffic.
	pub fn metrics(&self) -> &Arc<TokenMetrics> {
		&self.metrics
	}

	/// Returns a snapshot of the held token, if any.
	pub fn current(&self) -> Option<AccessToken> {
		self.held.read().clone()
	}

	/// Seeds the held token, e.g. with one persisted by a previous process.
	pub fn set_token(&self, value: impl Into<String>, expires_at: OffsetDateTime) {
		*self.held.write() = Some(AccessToken::new(value, expires_at));
	}

	/// Returns a bearer token that stays valid for longer than the expiry skew.
	///
	/// With `force_refresh` set, the held token is never reused as is: the caller either gets
	/// the result of its own exchange or a token another caller refreshed while it waited for
	/// the guard.
	pub async fn token(&self, force_refresh: bool) -> Result<Secret> {
		let observed = self.current();

		if let Some(token) = observed.as_ref().filter(|t| !force_refresh && self.is_fresh(t)) {
			return Ok(token.value.clone());
		}

		let _singleflight = self.refresh_guard.lock().await;

		if let Some(current) = self.current().filter(|t| self.is_fresh(t)) {
			let refreshed_meanwhile = observed.as_ref() != Some(&current);

			if !force_refresh || refreshed_meanwhile {
				return Ok(current.value);
			}
		}

		let token = self.refresh().await?;

		Ok(token.value)
	}

	fn is_fresh(&self, token: &AccessToken) -> bool {
		token.is_fresh_at(OffsetDateTime::now_utc(), self.expiry_skew)
	}

	async fn refresh(&self) -> Result<AccessToken> {
		const OPERATION: Operation = Operation::TokenRefresh;

		let span = OperationSpan::new(OPERATION, "refresh");

		obs::record_operation_event(OPERATION, OperationEvent::Attempt);
		self.metrics.record_attempt();

		let result = span.instrument(self.exchange()).await;

		match &result {
			Ok(token) => {
				*self.held.write() = Some(token.clone());

				self.metrics.record_success();
				obs::log_token_refreshed(token.expires_at);
			},
			Err(_) => self.metrics.record_failure(),
		}

		obs::record_operation_event(OPERATION, OperationEvent::for_result(&result));

		result
	}

	async fn exchange(&self) -> Result<AccessToken> {
		const OPERATION: Operation = Operation::TokenRefresh;

		let body = serde_json::to_vec(&self.credentials.token_request())
			.map_err(crate::error::TransportError::Encode)?;
		let mut budget = self.policy.budget();
		let response = loop {
			let request = ApiRequest::new(HttpMethod::Post, self.token_endpoint.clone())
				.with_json_body(body.clone());

			self.metrics.record_request();

			match self.http_client.send(request).await {
				Ok(response) => break response,
				Err(TransportFailure::RateLimited { retry_after }) => {
					obs::record_operation_event(OPERATION, OperationEvent::RateLimited);
					obs::log_rate_limited(
						OPERATION,
						budget.rate_limited() + 1,
						budget.backoff(),
						retry_after,
					);
					tokio::time::sleep(budget.backoff()).await;

					if !budget.spend_rate_limit() {
						return Err(Error::RateLimitExhausted {
							operation: OPERATION.as_str(),
							attempts: budget.rate_limited(),
						});
					}
				},
				Err(TransportFailure::Unauthorized) =>
					return Err(Error::AuthorizationFailed {
						reason: "token endpoint rejected the client credentials".into(),
					}),
				Err(TransportFailure::Other(err)) => return Err(err.into()),
			}
		};
		let issued_at = OffsetDateTime::now_utc();
		let payload: TokenResponse = response.decode()?;

		payload.into_token(issued_at)
	}
}
impl<C> Debug for TokenManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("client_id", &self.credentials.client_id())
			.field("token_endpoint", &self.token_endpoint.as_str())
			.field("policy", &self.policy)
			.field("expiry_skew", &self.expiry_skew)
			.field("token_held", &self.held.read().is_some())
			.finish()
	}
}
