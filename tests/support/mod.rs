//! Shared fixtures for integration tests: a scripted in-process transport plus client helpers.

#![allow(dead_code)]

// std
use std::{
	collections::{BTreeMap, VecDeque},
	sync::{
		Arc,
		atomic::{AtomicU32, Ordering},
	},
	time::Duration,
};
// crates.io
use parking_lot::Mutex;
use serde_json::{Value, json};
use url::Url;
// self
use helpdesk_client::{
	auth::Credentials,
	client::{Client, ClientOptions},
	endpoint::ApiDescriptor,
	error::TransportError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, TransportFailure, TransportFuture},
};

/// Token endpoint path used by [`descriptor`].
pub const TOKEN_PATH: &str = "/v2/oauth2/token";

/// One scripted transport outcome.
#[derive(Clone, Debug)]
pub enum Reply {
	/// 2xx with the given JSON body.
	Json(String),
	/// Rate-limit signal.
	RateLimited,
	/// Authorization failure.
	Unauthorized,
	/// Any other non-2xx status.
	Status(u16),
}

/// In-process [`ApiHttpClient`] that replays scripted replies and records every request.
///
/// Token requests drain the token script and fall back to issuing `token-<n>` valid for one
/// hour. API requests drain the script of the requested page (a request without `page` counts
/// as page 1) and fall back to HTTP 404.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
	token_replies: Mutex<VecDeque<Reply>>,
	page_replies: Mutex<BTreeMap<u32, VecDeque<Reply>>>,
	requests: Mutex<Vec<ApiRequest>>,
	issued: AtomicU32,
	token_delay: Option<Duration>,
	api_delay: Option<Duration>,
	in_flight: AtomicU32,
	peak_in_flight: AtomicU32,
}
impl ScriptedTransport {
	/// Creates an empty script.
	pub fn new() -> Self {
		Self::default()
	}

	/// Delays every token reply, so concurrent callers overlap on the refresh.
	pub fn with_token_delay(mut self, delay: Duration) -> Self {
		self.token_delay = Some(delay);

		self
	}

	/// Delays every API reply, so concurrent requests overlap.
	pub fn with_api_delay(mut self, delay: Duration) -> Self {
		self.api_delay = Some(delay);

		self
	}

	/// Highest number of API requests that were in flight at the same time.
	pub fn peak_in_flight(&self) -> u32 {
		self.peak_in_flight.load(Ordering::SeqCst)
	}

	/// Queues a token endpoint reply.
	pub fn push_token(&self, reply: Reply) -> &Self {
		self.token_replies.lock().push_back(reply);

		self
	}

	/// Queues `count` copies of a token endpoint reply.
	pub fn push_token_n(&self, reply: Reply, count: usize) -> &Self {
		self.token_replies.lock().extend(std::iter::repeat_n(reply, count));

		self
	}

	/// Queues a reply for API requests targeting `page`.
	pub fn push_page(&self, page: u32, reply: Reply) -> &Self {
		self.page_replies.lock().entry(page).or_default().push_back(reply);

		self
	}

	/// Queues `count` copies of a reply for API requests targeting `page`.
	pub fn push_page_n(&self, page: u32, reply: Reply, count: usize) -> &Self {
		self.page_replies.lock().entry(page).or_default().extend(std::iter::repeat_n(reply, count));

		self
	}

	/// Snapshot of every recorded request, in dispatch order.
	pub fn requests(&self) -> Vec<ApiRequest> {
		self.requests.lock().clone()
	}

	/// Recorded token endpoint requests.
	pub fn token_requests(&self) -> Vec<ApiRequest> {
		self.requests().into_iter().filter(is_token_request).collect()
	}

	/// Recorded API requests.
	pub fn api_requests(&self) -> Vec<ApiRequest> {
		self.requests().into_iter().filter(|request| !is_token_request(request)).collect()
	}

	/// Bearer tokens presented by the recorded API requests.
	pub fn api_bearers(&self) -> Vec<String> {
		self.api_requests()
			.iter()
			.map(|request| {
				request.bearer.as_ref().map(|token| token.expose().to_owned()).unwrap_or_default()
			})
			.collect()
	}

	fn next_reply(&self, request: &ApiRequest) -> Reply {
		if is_token_request(request) {
			return self.token_replies.lock().pop_front().unwrap_or_else(|| {
				let issued = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

				Reply::Json(token_json(&format!("token-{issued}"), 3600))
			});
		}

		self.page_replies
			.lock()
			.get_mut(&page_of(&request.url))
			.and_then(VecDeque::pop_front)
			.unwrap_or(Reply::Status(404))
	}
}
impl ApiHttpClient for ScriptedTransport {
	fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let reply = self.next_reply(&request);
			let is_token = is_token_request(&request);
			let delay = if is_token { self.token_delay } else { self.api_delay };

			self.requests.lock().push(request);

			if !is_token {
				let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;

				self.peak_in_flight.fetch_max(in_flight, Ordering::SeqCst);
			}
			if let Some(delay) = delay {
				tokio::time::sleep(delay).await;
			}
			if !is_token {
				self.in_flight.fetch_sub(1, Ordering::SeqCst);
			}

			match reply {
				Reply::Json(body) => Ok(ApiResponse::new(200, body)),
				Reply::RateLimited => Err(TransportFailure::RateLimited { retry_after: None }),
				Reply::Unauthorized => Err(TransportFailure::Unauthorized),
				Reply::Status(status) =>
					Err(TransportError::Status { status, body: "scripted".into() }.into()),
			}
		})
	}
}

fn is_token_request(request: &ApiRequest) -> bool {
	request.url.path() == TOKEN_PATH
}

/// Page number requested by `url`; requests without `page` target page 1.
pub fn page_of(url: &Url) -> u32 {
	url.query_pairs()
		.find(|(key, _)| key == "page")
		.and_then(|(_, value)| value.parse().ok())
		.unwrap_or(1)
}

/// Loopback descriptor accepted by the endpoint validation.
pub fn descriptor() -> ApiDescriptor {
	descriptor_for("http://127.0.0.1:9")
}

/// Descriptor rooted at `origin` (e.g. a mock server URL).
pub fn descriptor_for(origin: &str) -> ApiDescriptor {
	ApiDescriptor::builder()
		.api_base(Url::parse(&format!("{origin}/v2")).expect("API base should parse."))
		.token_endpoint(
			Url::parse(&format!("{origin}{TOKEN_PATH}")).expect("Token endpoint should parse."),
		)
		.build()
		.expect("Loopback descriptor should pass validation.")
}

/// Test credentials.
pub fn credentials() -> Credentials {
	Credentials::new("test-app", "test-secret")
}

/// Builds a client over `transport` with default options.
pub fn client(transport: &Arc<ScriptedTransport>) -> Client<ScriptedTransport> {
	client_with(transport, ClientOptions::default())
}

/// Builds a client over `transport` with `options`.
pub fn client_with(
	transport: &Arc<ScriptedTransport>,
	options: ClientOptions,
) -> Client<ScriptedTransport> {
	<Client<ScriptedTransport>>::with_options(
		descriptor(),
		credentials(),
		Arc::clone(transport),
		options,
	)
}

/// Token endpoint body.
pub fn token_json(access_token: &str, expires_in: i64) -> String {
	json!({"access_token": access_token, "token_type": "bearer", "expires_in": expires_in})
		.to_string()
}

/// List envelope body with `records` embedded under `key`.
pub fn page_json(key: &str, records: Vec<Value>, number: u32, total_pages: u32) -> String {
	let mut embedded = serde_json::Map::new();

	embedded.insert(key.to_owned(), Value::Array(records.clone()));

	json!({
		"_embedded": embedded,
		"page": {
			"size": records.len(),
			"totalElements": records.len(),
			"totalPages": total_pages,
			"number": number,
		},
	})
	.to_string()
}

/// Minimal user record with `id`.
pub fn user(id: u64) -> Value {
	json!({
		"id": id,
		"type": "user",
		"first": format!("First{id}"),
		"last": "Tester",
		"email": format!("user{id}@example.com"),
	})
}
