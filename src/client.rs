//! Client facade tying the token manager, executor, and lister to one set of credentials.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, DEFAULT_EXPIRY_SKEW, Secret, TokenManager},
	endpoint::ApiDescriptor,
	executor::RequestExecutor,
	http::ApiHttpClient,
	pagination::{DEFAULT_MAX_CONCURRENCY, PaginatedLister},
	retry::RetryPolicy,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = Client<ReqwestHttpClient>;

/// Tunables applied when a [`Client`] is assembled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientOptions {
	/// Retry bounds shared by token refreshes and API calls.
	pub retry_policy: RetryPolicy,
	/// Safety margin before token expiry.
	pub expiry_skew: Duration,
	/// Cap on in-flight page requests for concurrent listings.
	pub max_concurrency: usize,
}
impl ClientOptions {
	/// Overrides the retry policy.
	pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
		self.retry_policy = policy;

		self
	}

	/// Overrides the token expiry skew.
	pub fn with_expiry_skew(mut self, skew: Duration) -> Self {
		self.expiry_skew = skew;

		self
	}

	/// Overrides the concurrent page cap (clamped to at least one).
	pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
		self.max_concurrency = max_concurrency.max(1);

		self
	}
}
impl Default for ClientOptions {
	fn default() -> Self {
		Self {
			retry_policy: RetryPolicy::default(),
			expiry_skew: DEFAULT_EXPIRY_SKEW,
			max_concurrency: DEFAULT_MAX_CONCURRENCY,
		}
	}
}

/// API client for one application.
///
/// Each client owns its token manager, so several clients with different credentials can
/// coexist in one process. Cloning is cheap and clones share the token.
pub struct Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	tokens: Arc<TokenManager<C>>,
	lister: PaginatedLister<C>,
	max_concurrency: usize,
}
impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client on top of a caller-provided transport with default options.
	pub fn with_http_client(
		descriptor: ApiDescriptor,
		credentials: Credentials,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self::with_options(descriptor, credentials, http_client, ClientOptions::default())
	}

	/// Creates a client on top of a caller-provided transport.
	pub fn with_options(
		descriptor: ApiDescriptor,
		credentials: Credentials,
		http_client: impl Into<Arc<C>>,
		options: ClientOptions,
	) -> Self {
		let http_client = http_client.into();
		let tokens = Arc::new(
			TokenManager::new(
				Arc::clone(&http_client),
				credentials,
				descriptor.token_endpoint.clone(),
			)
			.with_retry_policy(options.retry_policy)
			.with_expiry_skew(options.expiry_skew),
		);
		let executor = RequestExecutor::new(http_client, Arc::clone(&tokens), descriptor)
			.with_retry_policy(options.retry_policy);

		Self {
			tokens,
			lister: PaginatedLister::new(Arc::new(executor)),
			max_concurrency: options.max_concurrency.max(1),
		}
	}

	/// Returns a bearer token, refreshing it first when stale or when `force_refresh` is set.
	pub async fn auth_key(&self, force_refresh: bool) -> Result<Secret> {
		self.tokens.token(force_refresh).await
	}

	/// Seeds the bearer token, e.g. with one persisted by a previous process.
	pub fn set_auth_key(&self, value: impl Into<String>, expires_at: OffsetDateTime) {
		self.tokens.set_token(value, expires_at);
	}

	/// Returns the token manager.
	pub fn tokens(&self) -> &Arc<TokenManager<C>> {
		&self.tokens
	}

	/// Returns the request executor, for endpoints without a typed wrapper.
	pub fn executor(&self) -> &Arc<RequestExecutor<C>> {
		self.lister.executor()
	}

	/// Returns the paginated lister.
	pub fn lister(&self) -> &PaginatedLister<C> {
		&self.lister
	}

	/// Returns the cap on in-flight page requests.
	pub fn max_concurrency(&self) -> usize {
		self.max_concurrency
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient> {
	/// Creates a client for the hosted API backed by a default reqwest transport.
	pub fn new(credentials: Credentials) -> Result<Self> {
		Ok(Self::with_http_client(
			ApiDescriptor::hosted()?,
			credentials,
			ReqwestHttpClient::default(),
		))
	}
}
impl<C> Clone for Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			tokens: Arc::clone(&self.tokens),
			lister: self.lister.clone(),
			max_concurrency: self.max_concurrency,
		}
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("executor", self.executor())
			.field("max_concurrency", &self.max_concurrency)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn options_clamp_concurrency() {
		let options = ClientOptions::default().with_max_concurrency(0);

		assert_eq!(options.max_concurrency, 1);
		assert_eq!(ClientOptions::default().max_concurrency, DEFAULT_MAX_CONCURRENCY);
		assert_eq!(ClientOptions::default().expiry_skew, DEFAULT_EXPIRY_SKEW);
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn hosted_client_targets_public_token_endpoint() {
		let client = ReqwestApiClient::new(Credentials::new("app", "secret"))
			.expect("Hosted client should build.");

		assert_eq!(client.tokens().credentials().client_id(), "app");
		assert!(client.tokens().current().is_none());
		assert_eq!(client.executor().descriptor().api_base.as_str(), "https://api.example.com/v2");
	}
}
