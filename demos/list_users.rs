//! Demonstrates listing every user through the reqwest transport against a local mock API,
//! including the client-credentials token exchange that precedes the first call.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use helpdesk_client::{
	auth::Credentials, client::ReqwestApiClient, endpoint::ApiDescriptor,
	http::ReqwestHttpClient,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/oauth2/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":7200}",
			);
		})
		.await;
	let users_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/users").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body(
				r#"{
					"_embedded": {"users": [
						{"id": 1, "type": "user", "first": "Ada", "last": "Lovelace", "email": "ada@example.com"},
						{"id": 2, "type": "user", "first": "Alan", "last": "Turing", "email": "alan@example.com"}
					]},
					"page": {"size": 50, "totalElements": 2, "totalPages": 1, "number": 1}
				}"#,
			);
		})
		.await;
	let descriptor = ApiDescriptor::builder()
		.api_base(Url::parse(&server.url("/v2"))?)
		.token_endpoint(Url::parse(&server.url("/v2/oauth2/token"))?)
		.build()?;
	let client = ReqwestApiClient::with_http_client(
		descriptor,
		Credentials::new("demo-app", "demo-secret"),
		ReqwestHttpClient::default(),
	);

	client
		.list_users(|user| {
			println!("{} {} <{}>", user.first_name, user.last_name, user.email);

			true
		})
		.await?;

	token_mock.assert_async().await;
	users_mock.assert_async().await;

	Ok(())
}
