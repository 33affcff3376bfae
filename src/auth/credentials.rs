//! Application credentials for the client-credentials grant.

// self
use crate::{_prelude::*, auth::Secret};

/// Immutable `client_id` / `client_secret` pair supplied at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
	client_id: String,
	client_secret: Secret,
}
impl Credentials {
	/// Creates credentials from an application id and secret.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), client_secret: Secret::new(client_secret) }
	}

	/// Returns the application id.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Returns the application secret.
	pub fn client_secret(&self) -> &Secret {
		&self.client_secret
	}

	pub(crate) fn token_request(&self) -> TokenRequestBody<'_> {
		TokenRequestBody {
			client_id: &self.client_id,
			client_secret: self.client_secret.expose(),
			grant_type: GRANT_TYPE,
		}
	}
}

const GRANT_TYPE: &str = "client_credentials";

/// JSON body posted to the token endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct TokenRequestBody<'a> {
	pub(crate) client_id: &'a str,
	pub(crate) client_secret: &'a str,
	pub(crate) grant_type: &'static str,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_request_uses_client_credentials_grant() {
		let credentials = Credentials::new("app-id", "app-secret");
		let body = serde_json::to_value(credentials.token_request())
			.expect("Token request body should serialize.");

		assert_eq!(
			body,
			serde_json::json!({
				"client_id": "app-id",
				"client_secret": "app-secret",
				"grant_type": "client_credentials",
			})
		);
	}

	#[test]
	fn debug_output_hides_secret() {
		let rendered = format!("{:?}", Credentials::new("app-id", "app-secret"));

		assert!(rendered.contains("app-id"));
		assert!(!rendered.contains("app-secret"));
	}
}
