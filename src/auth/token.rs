//! Bearer token with an absolute expiry, plus the token endpoint response mapping.

// self
use crate::{_prelude::*, auth::Secret};

/// Safety margin applied before a token's expiry so it never lapses mid-flight.
pub const DEFAULT_EXPIRY_SKEW: Duration = Duration::minutes(10);

/// Bearer token held by the [`TokenManager`](crate::auth::TokenManager).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	/// Token value; callers must avoid logging it.
	pub value: Secret,
	/// Instant after which the server rejects the token.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Creates a token from a value and absolute expiry.
	pub fn new(value: impl Into<String>, expires_at: OffsetDateTime) -> Self {
		Self { value: Secret::new(value), expires_at }
	}

	/// Returns `true` when `now + skew` is still strictly before the expiry.
	pub fn is_fresh_at(&self, now: OffsetDateTime, skew: Duration) -> bool {
		!self.value.is_blank() && now + skew < self.expires_at
	}

	/// Returns the remaining lifetime at `now` (negative once expired).
	pub fn remaining_at(&self, now: OffsetDateTime) -> Duration {
		self.expires_at - now
	}
}

/// Payload returned by the token endpoint.
///
/// Every field defaults so missing values are reported by [`TokenResponse::into_token`]
/// as an invalid response instead of a decode failure.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TokenResponse {
	pub(crate) access_token: String,
	pub(crate) expires_in: i64,
	pub(crate) token_type: String,
}
impl TokenResponse {
	/// Validates the payload and anchors `expires_in` at `issued_at`.
	pub(crate) fn into_token(self, issued_at: OffsetDateTime) -> Result<AccessToken> {
		if self.access_token.trim().is_empty() {
			return Err(Error::InvalidServerResponse {
				reason: "token endpoint returned an empty access_token".into(),
			});
		}
		if self.expires_in <= 0 {
			return Err(Error::InvalidServerResponse {
				reason: format!(
					"token endpoint returned a non-positive expires_in ({})",
					self.expires_in
				),
			});
		}

		let expires_at = issued_at
			.checked_add(Duration::seconds(self.expires_in))
			.ok_or_else(|| Error::InvalidServerResponse {
				reason: format!("expires_in ({}) exceeds the supported range", self.expires_in),
			})?;

		Ok(AccessToken::new(self.access_token, expires_at))
	}
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.field("token_type", &self.token_type)
			.finish()
	}
}
