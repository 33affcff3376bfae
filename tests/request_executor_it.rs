mod support;

// std
use std::sync::Arc;
// crates.io
use serde_json::{Value, json};
// self
use helpdesk_client::{
	error::{Error, TransportError},
	http::{HttpMethod, Query},
};
use support::{Reply, ScriptedTransport, client};

const RESOURCE: &str = "/users";

#[tokio::test]
async fn unauthorized_call_retries_with_a_forced_token() {
	let transport = Arc::new(ScriptedTransport::new());
	let client = client(&transport);

	transport.push_page(1, Reply::Unauthorized).push_page(1, Reply::Json("{\"ok\":true}".into()));

	let body: Value = client
		.executor()
		.get(RESOURCE, &Query::new())
		.await
		.expect("Call should succeed after re-authenticating.");

	assert_eq!(body, json!({"ok": true}));
	assert_eq!(transport.api_bearers(), vec!["token-1", "token-2"]);
	assert_eq!(transport.token_requests().len(), 2);
}

#[tokio::test]
async fn persistent_unauthorized_fails_after_three_attempts() {
	let transport = Arc::new(ScriptedTransport::new());
	let client = client(&transport);

	transport.push_page_n(1, Reply::Unauthorized, 5);

	let err = client
		.executor()
		.get::<Value>(RESOURCE, &Query::new())
		.await
		.expect_err("Call should give up re-authenticating.");

	assert!(err.is_authorization());
	assert_eq!(transport.api_requests().len(), 3);
	assert_eq!(transport.api_bearers(), vec!["token-1", "token-2", "token-3"]);
}

#[tokio::test(start_paused = true)]
async fn rate_limited_call_keeps_its_token_and_gives_up() {
	let transport = Arc::new(ScriptedTransport::new());
	let client = client(&transport);

	transport.push_page_n(1, Reply::RateLimited, 12);

	let err = client
		.executor()
		.get::<Value>(RESOURCE, &Query::new())
		.await
		.expect_err("Call should exhaust its rate-limit budget.");

	assert!(matches!(err, Error::RateLimitExhausted { operation: "api_call", attempts: 10 }));
	assert_eq!(transport.api_requests().len(), 10);
	assert_eq!(transport.token_requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn transport_attempts_never_exceed_thirty() {
	let transport = Arc::new(ScriptedTransport::new());
	let client = client(&transport);

	for _ in 0..4 {
		transport.push_page_n(1, Reply::RateLimited, 9).push_page(1, Reply::Unauthorized);
	}

	let err = client
		.executor()
		.get::<Value>(RESOURCE, &Query::new())
		.await
		.expect_err("Call should run out of authorization attempts.");

	assert!(err.is_authorization());
	assert_eq!(transport.api_requests().len(), 30);
	assert_eq!(transport.token_requests().len(), 3);
}

#[tokio::test]
async fn other_failures_return_immediately() {
	let transport = Arc::new(ScriptedTransport::new());
	let client = client(&transport);

	transport.push_page(1, Reply::Status(500));

	let err = client
		.executor()
		.get::<Value>(RESOURCE, &Query::new())
		.await
		.expect_err("Server error should not be retried.");

	assert!(matches!(err, Error::Transport(TransportError::Status { status: 500, .. })));
	assert_eq!(transport.api_requests().len(), 1);
}

#[tokio::test]
async fn request_body_is_encoded_once_and_empty_reply_decodes() {
	let transport = Arc::new(ScriptedTransport::new());
	let client = client(&transport);
	let payload = json!({"text": "hello"});

	transport.push_page(1, Reply::Unauthorized).push_page(1, Reply::Json(String::new()));

	client
		.executor()
		.call::<(), Value>(
			HttpMethod::Post,
			"/conversations/7/notes",
			&Query::new(),
			Some(&payload),
		)
		.await
		.expect("Empty reply should decode into unit.");

	let requests = transport.api_requests();

	assert_eq!(requests.len(), 2);

	for request in requests {
		let sent: Value = serde_json::from_slice(
			request.body.as_deref().expect("Request should carry the JSON body."),
		)
		.expect("Request body should be JSON.");

		assert_eq!(request.method, HttpMethod::Post);
		assert_eq!(request.url.path(), "/v2/conversations/7/notes");
		assert_eq!(sent, payload);
	}
}

#[tokio::test]
async fn auth_key_reflects_the_held_token() {
	let transport = Arc::new(ScriptedTransport::new());
	let client = client(&transport);

	client.set_auth_key("seeded", time::OffsetDateTime::now_utc() + time::Duration::hours(2));

	let seeded = client.auth_key(false).await.expect("Seeded token should be returned.");
	let forced = client.auth_key(true).await.expect("Forced refresh should succeed.");

	assert_eq!(seeded.expose(), "seeded");
	assert_eq!(forced.expose(), "token-1");
	assert_eq!(transport.token_requests().len(), 1);
}
