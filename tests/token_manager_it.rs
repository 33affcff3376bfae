mod support;

// std
use std::sync::Arc;
// crates.io
use time::{Duration, OffsetDateTime};
// self
use helpdesk_client::{
	auth::TokenManager,
	error::{Error, TransportError},
};
use support::{Reply, ScriptedTransport, credentials, descriptor, token_json};

fn manager(transport: &Arc<ScriptedTransport>) -> TokenManager<ScriptedTransport> {
	TokenManager::new(Arc::clone(transport), credentials(), descriptor().token_endpoint)
}

#[tokio::test]
async fn fresh_cached_token_skips_the_network() {
	let transport = Arc::new(ScriptedTransport::new());
	let tokens = manager(&transport);

	tokens.set_token("seeded", OffsetDateTime::now_utc() + Duration::hours(1));

	let token = tokens.token(false).await.expect("Cached token should be returned.");

	assert_eq!(token.expose(), "seeded");
	assert!(transport.requests().is_empty());
	assert_eq!(tokens.metrics().attempts(), 0);
}

#[tokio::test]
async fn token_inside_expiry_skew_is_refreshed() {
	let transport = Arc::new(ScriptedTransport::new());
	let tokens = manager(&transport);

	tokens.set_token("nearly-expired", OffsetDateTime::now_utc() + Duration::minutes(5));

	let token = tokens.token(false).await.expect("Stale token should be refreshed.");

	assert_eq!(token.expose(), "token-1");
	assert_eq!(transport.token_requests().len(), 1);

	let held = tokens.current().expect("Refreshed token should be held.");

	assert!(held.remaining_at(OffsetDateTime::now_utc()) > Duration::minutes(50));
}

#[tokio::test]
async fn token_request_posts_client_credentials_json() {
	let transport = Arc::new(ScriptedTransport::new());
	let tokens = manager(&transport);

	tokens.token(false).await.expect("Initial refresh should succeed.");

	let request = transport.token_requests().pop().expect("Token request should be recorded.");
	let body: serde_json::Value = serde_json::from_slice(
		request.body.as_deref().expect("Token request should carry a body."),
	)
	.expect("Token request body should be JSON.");

	assert!(request.bearer.is_none());
	assert_eq!(
		body,
		serde_json::json!({
			"client_id": "test-app",
			"client_secret": "test-secret",
			"grant_type": "client_credentials",
		})
	);
}

#[tokio::test]
async fn forced_refresh_replaces_a_fresh_token() {
	let transport = Arc::new(ScriptedTransport::new());
	let tokens = manager(&transport);

	tokens.set_token("seeded", OffsetDateTime::now_utc() + Duration::hours(1));

	let token = tokens.token(true).await.expect("Forced refresh should succeed.");

	assert_eq!(token.expose(), "token-1");
	assert_eq!(transport.token_requests().len(), 1);
	assert_eq!(tokens.metrics().successes(), 1);
}

#[tokio::test(start_paused = true)]
async fn rate_limited_refresh_gives_up_after_ten_attempts() {
	let transport = Arc::new(ScriptedTransport::new());
	let tokens = manager(&transport);

	transport.push_token_n(Reply::RateLimited, 11);

	let started = tokio::time::Instant::now();
	let err = tokens.token(false).await.expect_err("Refresh should exhaust its rate-limit budget.");

	assert!(matches!(err, Error::RateLimitExhausted { operation: "token_refresh", attempts: 10 }));
	assert_eq!(transport.token_requests().len(), 10);
	assert!(started.elapsed() >= std::time::Duration::from_secs(10));
	assert!(tokens.current().is_none());
	assert_eq!(tokens.metrics().requests(), 10);
	assert_eq!(tokens.metrics().failures(), 1);
}

#[tokio::test(start_paused = true)]
async fn rate_limited_refresh_recovers_within_budget() {
	let transport = Arc::new(ScriptedTransport::new());
	let tokens = manager(&transport);

	transport.push_token_n(Reply::RateLimited, 3).push_token(Reply::Json(token_json("late", 3600)));

	let token = tokens.token(false).await.expect("Refresh should succeed after backing off.");

	assert_eq!(token.expose(), "late");
	assert_eq!(transport.token_requests().len(), 4);
}

#[tokio::test]
async fn rejected_credentials_are_not_retried() {
	let transport = Arc::new(ScriptedTransport::new());
	let tokens = manager(&transport);

	tokens.set_token("old", OffsetDateTime::now_utc() - Duration::minutes(1));
	transport.push_token(Reply::Unauthorized);

	let err = tokens.token(false).await.expect_err("Rejected credentials should fail.");

	assert!(err.is_authorization());
	assert_eq!(transport.token_requests().len(), 1);
	assert_eq!(
		tokens.current().map(|token| token.value.expose().to_owned()),
		Some("old".to_owned())
	);
}

#[tokio::test]
async fn invalid_token_payloads_are_reported() {
	let transport = Arc::new(ScriptedTransport::new());
	let tokens = manager(&transport);

	transport
		.push_token(Reply::Json(token_json("zero-lifetime", 0)))
		.push_token(Reply::Json(token_json("", 3600)))
		.push_token(Reply::Json("{\"access_token\": 42}".into()));

	let zero = tokens.token(false).await.expect_err("Zero lifetime should be rejected.");
	let empty = tokens.token(false).await.expect_err("Empty token should be rejected.");
	let malformed = tokens.token(false).await.expect_err("Malformed payload should be rejected.");

	assert!(matches!(zero, Error::InvalidServerResponse { .. }));
	assert!(matches!(empty, Error::InvalidServerResponse { .. }));
	assert!(matches!(malformed, Error::Transport(TransportError::Decode { .. })));
	assert!(tokens.current().is_none());
}

#[tokio::test]
async fn other_token_endpoint_failures_surface_unchanged() {
	let transport = Arc::new(ScriptedTransport::new());
	let tokens = manager(&transport);

	transport.push_token(Reply::Status(503));

	let err = tokens.token(false).await.expect_err("Server error should fail the refresh.");

	assert!(matches!(err, Error::Transport(TransportError::Status { status: 503, .. })));
	assert_eq!(transport.token_requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_refreshes_share_one_exchange() {
	let transport =
		Arc::new(ScriptedTransport::new().with_token_delay(std::time::Duration::from_millis(50)));
	let tokens = manager(&transport);
	let (first, second, third) =
		tokio::join!(tokens.token(false), tokens.token(true), tokens.token(true));

	assert_eq!(first.expect("First caller should succeed.").expose(), "token-1");
	assert_eq!(second.expect("Second caller should succeed.").expose(), "token-1");
	assert_eq!(third.expect("Third caller should succeed.").expose(), "token-1");
	assert_eq!(transport.token_requests().len(), 1);
}
