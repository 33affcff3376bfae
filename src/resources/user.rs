//! Users (agents) of the account.

// self
use crate::{
	_prelude::*,
	client::Client,
	http::{ApiHttpClient, Query},
};

/// Resource path of the user list.
pub const USERS_RESOURCE: &str = "/users";
/// Collection name inside `_embedded`.
pub const USERS_KEY: &str = "users";

/// Account user, also embedded as assignee or author of other records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
	/// User id.
	pub id: u64,
	/// User kind (`user`, `team`).
	#[serde(rename = "type")]
	pub kind: String,
	/// First name.
	#[serde(rename = "first")]
	pub first_name: String,
	/// Last name.
	#[serde(rename = "last")]
	pub last_name: String,
	/// Email address.
	pub email: String,
}

impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Visits every user of the account until `visit` returns `false`.
	///
	/// Returns [`Error::Interrupted`] when the visitor stopped early.
	pub async fn list_users<F>(&self, visit: F) -> Result<()>
	where
		F: FnMut(User) -> bool,
	{
		self.lister().list_all(USERS_RESOURCE, USERS_KEY, &Query::new(), visit).await
	}
}
