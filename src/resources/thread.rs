//! Conversation threads (messages, replies, notes, line items).

// self
use crate::{
	_prelude::*,
	client::Client,
	http::{ApiHttpClient, Query},
	resources::User,
};

/// Collection name inside `_embedded`.
pub const THREADS_KEY: &str = "threads";

/// Returns the resource path listing the threads of `conversation_id`.
pub fn threads_resource(conversation_id: u64) -> String {
	format!("/conversations/{conversation_id}/threads")
}

/// Channel a thread arrived through.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadSource {
	/// `customer` or `user`.
	pub via: String,
	/// Source type (`email`, `web`, `api`, ...).
	#[serde(rename = "type")]
	pub kind: String,
}

/// Customer attached to a thread.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
	/// Customer id.
	pub id: u64,
	/// First name.
	#[serde(rename = "first")]
	pub first_name: String,
	/// Last name.
	#[serde(rename = "last")]
	pub last_name: String,
	/// Email address.
	pub email: String,
}

/// Author of a thread, either a user or a customer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadCreator {
	/// Author id.
	pub id: u64,
	/// `user` or `customer`.
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

/// One entry of a conversation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thread {
	/// Thread id.
	pub id: u64,
	/// Thread type (`customer`, `reply`, `note`, `lineitem`, ...).
	#[serde(rename = "type")]
	pub kind: String,
	/// User the conversation was assigned to by this thread.
	pub assigned_to: Option<User>,
	/// Conversation status set by this thread.
	pub status: String,
	/// `published`, `draft`, `hidden`, or `review`.
	pub state: String,
	/// HTML body.
	pub body: String,
	/// Channel the thread arrived through.
	pub source: ThreadSource,
	/// Customer the thread belongs to.
	pub customer: Option<Customer>,
	/// Author of the thread.
	pub created_by: Option<ThreadCreator>,
	/// Saved reply used to compose the thread.
	pub saved_reply_id: Option<u64>,
	/// Recipients.
	pub to: Vec<String>,
	/// Carbon-copy recipients.
	pub cc: Vec<String>,
	/// Blind carbon-copy recipients.
	pub bcc: Vec<String>,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Time the customer first opened the thread.
	#[serde(with = "time::serde::rfc3339::option")]
	pub opened_at: Option<OffsetDateTime>,
}

impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Visits every thread of `conversation_id` until `visit` returns `false`.
	///
	/// Returns [`Error::Interrupted`] when the visitor stopped early.
	pub async fn list_threads<F>(&self, conversation_id: u64, visit: F) -> Result<()>
	where
		F: FnMut(Thread) -> bool,
	{
		let resource = threads_resource(conversation_id);

		self.lister().list_all(&resource, THREADS_KEY, &Query::new(), visit).await
	}
}
