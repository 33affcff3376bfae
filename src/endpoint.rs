//! Endpoint descriptor consumed by the token manager and the executor.
//!
//! [`ApiDescriptor`] carries the validated API base and token endpoint. Both must use HTTPS;
//! plain HTTP is accepted only for loopback hosts so a local mock server can stand in for the
//! real API.

/// Builder API for assembling descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, error::ConfigError, http::Query};

/// Default API base, resource paths are appended to it.
pub const DEFAULT_API_BASE: &str = "https://api.example.com/v2";
/// Default client-credentials token endpoint.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://api.example.com/v2/oauth2/token";

/// Immutable endpoint set consumed by the client.
///
/// Build values through [`ApiDescriptor::builder`] or [`ApiDescriptor::hosted`], both of which
/// validate the endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiDescriptor {
	/// Base URL that resource paths (e.g. `/users`) are appended to.
	pub api_base: Url,
	/// Client-credentials token endpoint.
	pub token_endpoint: Url,
}
impl ApiDescriptor {
	/// Creates a new builder.
	pub fn builder() -> ApiDescriptorBuilder {
		ApiDescriptorBuilder::new()
	}

	/// Returns the descriptor for the hosted API.
	pub fn hosted() -> Result<Self> {
		let parse = |raw: &str| {
			Url::parse(raw)
				.map_err(|source| ConfigError::InvalidEndpoint { url: raw.into(), source })
		};
		let descriptor = Self::builder()
			.api_base(parse(DEFAULT_API_BASE)?)
			.token_endpoint(parse(DEFAULT_TOKEN_ENDPOINT)?)
			.build()?;

		Ok(descriptor)
	}

	/// Resolves `resource` against the API base and appends `query`.
	///
	/// Resource paths are appended verbatim, so the base path (`/v2`) is preserved.
	pub fn resource_url(&self, resource: &str, query: &Query) -> Result<Url> {
		let base = self.api_base.as_str().trim_end_matches('/');
		let path = resource.trim_start_matches('/');
		let mut url = Url::parse(&format!("{base}/{path}")).map_err(|source| {
			ConfigError::InvalidResource { resource: resource.to_owned(), source }
		})?;

		query.apply_to(&mut url);

		Ok(url)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_descriptor_targets_public_api() {
		let descriptor = ApiDescriptor::hosted().expect("Hosted descriptor should be valid.");

		assert_eq!(descriptor.api_base.as_str(), "https://api.example.com/v2");
		assert_eq!(descriptor.token_endpoint.as_str(), "https://api.example.com/v2/oauth2/token");
	}

	#[test]
	fn resource_url_keeps_base_path() {
		let descriptor = ApiDescriptor::hosted().expect("Hosted descriptor should be valid.");
		let url = descriptor
			.resource_url("/conversations/42/threads", &Query::new().with("page", "3"))
			.expect("Resource URL should resolve.");

		assert_eq!(url.as_str(), "https://api.example.com/v2/conversations/42/threads?page=3");
	}
}
