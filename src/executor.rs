//! Request execution with bearer injection, rate-limit backoff, and re-authentication.
//!
//! [`RequestExecutor::call`] runs two nested loops. The inner loop retries the same request
//! with the same token while the server rate limits it. The outer loop only advances on an
//! authorization failure and forces a fresh token for every attempt after the first, so a quota
//! condition never burns a refresh and a stale credential never loops forever.

// self
use crate::{
	_prelude::*,
	auth::TokenManager,
	endpoint::ApiDescriptor,
	error::TransportError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpMethod, Query, TransportFailure},
	obs::{self, Operation, OperationEvent, OperationSpan},
	retry::{RetryBudget, RetryPolicy},
};

/// Executes logical API calls on behalf of the client.
pub struct RequestExecutor<C>
where
	C: ?Sized + ApiHttpClient,
{
	http_client: Arc<C>,
	tokens: Arc<TokenManager<C>>,
	descriptor: ApiDescriptor,
	policy: RetryPolicy,
}
impl<C> RequestExecutor<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates an executor that shares `tokens` and the transport behind it.
	pub fn new(
		http_client: impl Into<Arc<C>>,
		tokens: Arc<TokenManager<C>>,
		descriptor: ApiDescriptor,
	) -> Self {
		Self { http_client: http_client.into(), tokens, descriptor, policy: RetryPolicy::default() }
	}

	/// Overrides the retry policy used for API calls.
	pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Returns the token manager backing this executor.
	pub fn tokens(&self) -> &Arc<TokenManager<C>> {
		&self.tokens
	}

	/// Returns the endpoint descriptor.
	pub fn descriptor(&self) -> &ApiDescriptor {
		&self.descriptor
	}

	/// Returns the retry policy.
	pub fn policy(&self) -> &RetryPolicy {
		&self.policy
	}

	/// Executes one logical call and decodes the response body into `T`.
	///
	/// An empty response body decodes as JSON `null`, so `()` and `Option<_>` targets work for
	/// endpoints without content.
	pub async fn call<T, B>(
		&self,
		method: HttpMethod,
		resource: &str,
		query: &Query,
		body: Option<&B>,
	) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		const OPERATION: Operation = Operation::ApiCall;

		let span = OperationSpan::new(OPERATION, resource);

		obs::record_operation_event(OPERATION, OperationEvent::Attempt);

		let result = span
			.instrument(async move {
				let url = self.descriptor.resource_url(resource, query)?;
				let body = body
					.map(serde_json::to_vec)
					.transpose()
					.map_err(TransportError::Encode)?;
				let response = self.execute(method, url, body).await?;

				Ok(response.decode::<T>()?)
			})
			.await;

		obs::record_operation_event(OPERATION, OperationEvent::for_result(&result));

		result
	}

	/// Convenience wrapper for `GET` calls without a body.
	pub async fn get<T>(&self, resource: &str, query: &Query) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.call::<T, ()>(HttpMethod::Get, resource, query, None).await
	}

	async fn execute(
		&self,
		method: HttpMethod,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<ApiResponse> {
		let mut budget = self.policy.budget();

		while budget.spend_authorization() {
			let force_refresh = budget.authorizations() > 1;
			let token = self.tokens.token(force_refresh).await?;

			budget.reset_rate_limit();

			let mut request = ApiRequest::new(method, url.clone()).with_bearer(token);

			request.body = body.clone();

			match self.send_with_backoff(request, &mut budget).await? {
				Some(response) => return Ok(response),
				None => obs::log_unauthorized(Operation::ApiCall, budget.authorizations()),
			}
		}

		Err(Error::AuthorizationFailed {
			reason: format!(
				"request was still unauthorized after {} token attempts",
				self.policy.authorization_attempts
			),
		})
	}

	/// Runs the inner loop. `Ok(None)` means the token was rejected.
	async fn send_with_backoff(
		&self,
		request: ApiRequest,
		budget: &mut RetryBudget,
	) -> Result<Option<ApiResponse>> {
		const OPERATION: Operation = Operation::ApiCall;

		loop {
			match self.http_client.send(request.clone()).await {
				Ok(response) => return Ok(Some(response)),
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
				Err(TransportFailure::Unauthorized) => {
					obs::record_operation_event(OPERATION, OperationEvent::Unauthorized);

					return Ok(None);
				},
				Err(TransportFailure::Other(err)) => return Err(err.into()),
			}
		}
	}
}
impl<C> Debug for RequestExecutor<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestExecutor")
			.field("descriptor", &self.descriptor)
			.field("policy", &self.policy)
			.field("tokens", &self.tokens)
			.finish()
	}
}
