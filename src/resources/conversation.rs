//! Conversations and their list endpoints.

// self
use crate::{
	_prelude::*,
	client::Client,
	http::{ApiHttpClient, Query},
	pagination::PageResult,
	resources::{ConversationFilter, User},
};

/// Resource path of the conversation list.
pub const CONVERSATIONS_RESOURCE: &str = "/conversations";
/// Collection name inside `_embedded`.
pub const CONVERSATIONS_KEY: &str = "conversations";
/// Query parameter carrying a single status for one listing pass.
pub const STATUS_PARAM: &str = "status";

/// Conversation status values accepted by the list endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
	/// Awaiting an agent.
	Open,
	/// Resolved.
	Closed,
	/// Active (open or pending).
	Active,
	/// Awaiting the customer.
	Pending,
	/// Marked as spam.
	Spam,
}
impl ConversationStatus {
	/// Every status the API knows, the universe for exclusive filters.
	pub const ALL: [ConversationStatus; 5] = [
		ConversationStatus::Open,
		ConversationStatus::Closed,
		ConversationStatus::Active,
		ConversationStatus::Pending,
		ConversationStatus::Spam,
	];

	/// Returns the wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			ConversationStatus::Open => "open",
			ConversationStatus::Closed => "closed",
			ConversationStatus::Active => "active",
			ConversationStatus::Pending => "pending",
			ConversationStatus::Spam => "spam",
		}
	}
}
impl Display for ConversationStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Channel a conversation was started through.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationSource {
	/// `customer` or `user`.
	pub via: String,
	/// Source type (`email`, `chat`, `phone`, ...).
	#[serde(rename = "type")]
	pub kind: String,
}

/// Waiting-time summary for the latest customer message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerWaitingSince {
	/// Time the customer started waiting.
	#[serde(with = "time::serde::rfc3339::option")]
	pub time: Option<OffsetDateTime>,
	/// Human-friendly waiting period (`"12 min ago"`).
	pub friendly: String,
	/// `customer` or `user`.
	pub latest_reply_from: String,
}

/// Primary customer reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryCustomer {
	/// Customer id.
	pub id: u64,
}

/// Tag attached to a conversation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
	/// Tag id.
	pub id: u64,
	/// Tag label.
	pub tag: String,
	/// Display color.
	pub color: String,
}

/// Custom field value attached to a conversation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomField {
	/// Field id.
	pub id: u64,
	/// Field name.
	pub name: String,
	/// Raw value (string, number, or option id depending on the field type).
	pub value: serde_json::Value,
	/// Display text of the value.
	pub text: String,
}

/// Conversation record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conversation {
	/// Conversation id.
	pub id: u64,
	/// Human-facing conversation number.
	pub number: u64,
	/// Number of threads.
	pub threads: u32,
	/// `email`, `chat`, or `phone`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Folder id.
	pub folder_id: u64,
	/// Status wire value.
	pub status: String,
	/// `published`, `draft`, or `deleted`.
	pub state: String,
	/// Subject line.
	pub subject: String,
	/// Preview of the latest thread.
	pub preview: String,
	/// Mailbox id.
	pub mailbox_id: u64,
	/// Assigned user.
	pub assignee: Option<User>,
	/// Creator.
	pub created_by: Option<User>,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Closing time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub closed_at: Option<OffsetDateTime>,
	/// Last time a user modified the conversation.
	#[serde(rename = "userUpdatedAt", with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
	/// Id of the user who closed the conversation.
	pub closed_by: Option<u64>,
	/// Waiting-time summary.
	pub customer_waiting_since: Option<CustomerWaitingSince>,
	/// Channel the conversation was started through.
	pub source: ConversationSource,
	/// Tags.
	pub tags: Vec<Tag>,
	/// Carbon-copy addresses.
	pub cc: Vec<String>,
	/// Blind carbon-copy addresses.
	pub bcc: Vec<String>,
	/// Primary customer reference.
	pub primary_customer: Option<PrimaryCustomer>,
	/// Custom field values.
	pub custom_fields: Vec<CustomField>,
}
impl Conversation {
	/// Parses [`Conversation::status`] into a [`ConversationStatus`].
	pub fn status(&self) -> Option<ConversationStatus> {
		ConversationStatus::ALL.into_iter().find(|status| status.as_str() == self.status)
	}
}

impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Visits every conversation matching `filter` until `visit` returns `false`.
	///
	/// Status selection runs one full listing pass per expanded status; without a status
	/// selection a single unfiltered pass runs. A selection that expands to no status sends no
	/// request at all. [`Error::Interrupted`] from any pass stops the remaining passes.
	pub async fn list_conversations<F>(
		&self,
		filter: &ConversationFilter,
		mut visit: F,
	) -> Result<()>
	where
		F: FnMut(Conversation) -> bool,
	{
		let query = filter.to_query()?;
		let Some(statuses) = filter.expand_statuses() else {
			return self
				.lister()
				.list_all(CONVERSATIONS_RESOURCE, CONVERSATIONS_KEY, &query, &mut visit)
				.await;
		};

		for status in statuses {
			let pass = query.clone().with(STATUS_PARAM, status.as_str());

			self.lister()
				.list_all(CONVERSATIONS_RESOURCE, CONVERSATIONS_KEY, &pass, &mut visit)
				.await?;
		}

		Ok(())
	}

	/// Fetches every conversation page for `query` concurrently.
	///
	/// Each page reports its own outcome; see
	/// [`PaginatedLister::fetch_pages`](crate::pagination::PaginatedLister::fetch_pages).
	pub async fn conversation_pages(&self, query: &Query) -> Result<Vec<PageResult<Conversation>>> {
		self.lister()
			.fetch_pages(CONVERSATIONS_RESOURCE, CONVERSATIONS_KEY, query, self.max_concurrency())
			.await
	}
}
