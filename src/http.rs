//! Transport primitives for API calls.
//!
//! The module exposes [`ApiHttpClient`] alongside [`ApiRequest`], [`ApiResponse`], and
//! [`TransportFailure`] so downstream crates can plug in custom HTTP stacks. Transports own the
//! status classification: the executor and token manager only ever match on the three
//! [`TransportFailure`] variants and never look at raw status codes.

// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, auth::Secret, error::TransportError};

/// Boxed future returned by [`ApiHttpClient::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportFailure>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing API and token requests.
///
/// The trait is the client's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so a single transport can back the token manager and the executor
/// at the same time, and the returned futures must be `Send` so listings can be driven
/// concurrently.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Dispatches `request` and classifies the outcome.
	///
	/// # Classification Contract
	///
	/// - A throttled request (HTTP 429) yields [`TransportFailure::RateLimited`].
	/// - A rejected credential (HTTP 401) yields [`TransportFailure::Unauthorized`].
	/// - Every other failure, including unexpected statuses, yields [`TransportFailure::Other`].
	fn send(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// HTTP verbs used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `PATCH`.
	Patch,
	/// `DELETE`.
	Delete,
}
impl HttpMethod {
	/// Returns the canonical upper-case method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Ordered query parameters, one value per key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query(BTreeMap<String, String>);
impl Query {
	/// Creates an empty query.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `key` to `value`, replacing any previous value.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.insert(key.into(), value.into());
	}

	/// Builder-style variant of [`Query::set`].
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.set(key, value);

		self
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Removes `key`, returning its previous value.
	pub fn remove(&mut self, key: &str) -> Option<String> {
		self.0.remove(key)
	}

	/// Returns `true` when no parameters are set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over the parameters in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Appends the parameters to `url`.
	pub fn apply_to(&self, url: &mut Url) {
		if self.is_empty() {
			return;
		}

		let mut pairs = url.query_pairs_mut();

		for (key, value) in self.iter() {
			pairs.append_pair(key, value);
		}
	}
}

/// Fully resolved request handed to an [`ApiHttpClient`].
#[derive(Clone)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: HttpMethod,
	/// Absolute URL, query included.
	pub url: Url,
	/// Bearer token attached as `Authorization: Bearer <token>`.
	pub bearer: Option<Secret>,
	/// JSON request body.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates a request without credentials or body.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, bearer: None, body: None }
	}

	/// Attaches a bearer token.
	pub fn with_bearer(mut self, token: Secret) -> Self {
		self.bearer = Some(token);

		self
	}

	/// Attaches a pre-encoded JSON body.
	pub fn with_json_body(mut self, body: Vec<u8>) -> Self {
		self.body = Some(body);

		self
	}
}
impl Debug for ApiRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.finish()
	}
}

/// Successful response returned by an [`ApiHttpClient`].
#[derive(Clone, Debug, Default)]
pub struct ApiResponse {
	/// HTTP status code (2xx).
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Decodes the body into `T`, treating an empty body as JSON `null`.
	pub fn decode<T>(&self) -> Result<T, TransportError>
	where
		T: DeserializeOwned,
	{
		let raw: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
			b"null"
		} else {
			&self.body
		};
		let mut de = serde_json::Deserializer::from_slice(raw);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| TransportError::Decode { source })
	}
}

/// Three-way classification of a failed request.
#[derive(Debug, ThisError)]
pub enum TransportFailure {
	/// The server throttled the request.
	#[error("Request was rate limited.")]
	RateLimited {
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// The server rejected the presented credentials.
	#[error("Request was not authorized.")]
	Unauthorized,
	/// Any other transport, status, or decoding failure.
	#[error(transparent)]
	Other(#[from] TransportError),
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	const BODY_PREVIEW_LIMIT: usize = 512;

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportFailure> {
		let mut builder = self.0.request(reqwest_method(request.method), request.url);

		if let Some(token) = request.bearer {
			builder = builder.bearer_auth(token.expose());
		}
		if let Some(body) = request.body {
			builder = builder.header(reqwest::header::CONTENT_TYPE, "application/json").body(body);
		}

		let response = builder.send().await.map_err(TransportError::from)?;
		let status = response.status();

		if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
			return Err(TransportFailure::RateLimited {
				retry_after: parse_retry_after(response.headers()),
			});
		}
		if status == reqwest::StatusCode::UNAUTHORIZED {
			return Err(TransportFailure::Unauthorized);
		}

		let body = response.bytes().await.map_err(TransportError::from)?;

		if !status.is_success() {
			let preview = String::from_utf8_lossy(&body);
			let body = preview.chars().take(Self::BODY_PREVIEW_LIMIT).collect();

			return Err(TransportError::Status { status: status.as_u16(), body }.into());
		}

		Ok(ApiResponse::new(status.as_u16(), body.to_vec()))
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
		Box::pin(self.execute(request))
	}
}

#[cfg(feature = "reqwest")]
fn reqwest_method(method: HttpMethod) -> reqwest::Method {
	match method {
		HttpMethod::Get => reqwest::Method::GET,
		HttpMethod::Post => reqwest::Method::POST,
		HttpMethod::Put => reqwest::Method::PUT,
		HttpMethod::Patch => reqwest::Method::PATCH,
		HttpMethod::Delete => reqwest::Method::DELETE,
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
