// self
use crate::{_prelude::*, endpoint::ApiDescriptor};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum DescriptorError {
	/// API base is mandatory.
	#[error("Missing API base URL.")]
	MissingApiBase,
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoints carrying a query string or fragment cannot be extended safely.
	#[error("The {endpoint} endpoint must not carry a query or fragment: {url}.")]
	UnexpectedComponents {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Builder for [`ApiDescriptor`] values.
#[derive(Debug, Default)]
pub struct ApiDescriptorBuilder {
	/// Base URL that resource paths are appended to.
	pub api_base: Option<Url>,
	/// Client-credentials token endpoint.
	pub token_endpoint: Option<Url>,
}
impl ApiDescriptorBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the API base.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ApiDescriptor, DescriptorError> {
		let api_base = self.api_base.ok_or(DescriptorError::MissingApiBase)?;
		let token_endpoint = self.token_endpoint.ok_or(DescriptorError::MissingTokenEndpoint)?;
		let descriptor = ApiDescriptor { api_base, token_endpoint };

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ApiDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), DescriptorError> {
		validate_endpoint("api_base", &self.api_base)?;
		validate_endpoint("token", &self.token_endpoint)?;

		if self.api_base.query().is_some() || self.api_base.fragment().is_some() {
			return Err(DescriptorError::UnexpectedComponents {
				endpoint: "api_base",
				url: self.api_base.to_string(),
			});
		}

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), DescriptorError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(DescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(addr)) => addr.is_loopback(),
		Some(url::Host::Ipv6(addr)) => addr.is_loopback(),
		None => false,
	}
}
