//! Conversation search filter and its query-string encoding.
//!
//! The list endpoint accepts a free-form `query` parameter in a Lucene-like syntax, e.g.
//! `((mailboxid:1 OR mailboxid:2) AND createdAt:[2024-01-01T00:00:00Z TO *])`. Status
//! selection is not part of that expression; it is applied one status per listing pass.

// crates.io
use time::{UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::{_prelude::*, error::ConfigError, http::Query, resources::ConversationStatus};

/// Query parameter carrying the search expression.
pub const QUERY_PARAM: &str = "query";

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
	format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// Whether a status selection keeps or drops the listed statuses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Condition {
	/// Only the listed statuses.
	#[default]
	Include,
	/// Every known status except the listed ones.
	Exclude,
}

/// Status selection applied by [`ConversationFilter`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusSelection {
	/// Include or exclude.
	pub condition: Condition,
	/// Statuses the condition applies to.
	pub statuses: Vec<ConversationStatus>,
}

/// Time range with optional open bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeRange {
	/// Inclusive lower bound; `None` is unbounded.
	pub from: Option<OffsetDateTime>,
	/// Inclusive upper bound; `None` is unbounded.
	pub to: Option<OffsetDateTime>,
}
impl TimeRange {
	/// Creates a range from optional bounds.
	pub fn new(from: Option<OffsetDateTime>, to: Option<OffsetDateTime>) -> Self {
		Self { from, to }
	}

	fn is_unbounded(&self) -> bool {
		self.from.is_none() && self.to.is_none()
	}

	fn clause(&self, field: &str) -> Result<String> {
		Ok(format!("{field}:[{} TO {}]", format_bound(self.from)?, format_bound(self.to)?))
	}
}

/// Filter for [`Client::list_conversations`](crate::client::Client::list_conversations).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationFilter {
	mailbox_ids: Vec<u64>,
	status: Option<StatusSelection>,
	created: Option<TimeRange>,
	modified: Option<TimeRange>,
}
impl ConversationFilter {
	/// Creates an empty filter that matches every conversation.
	pub fn new() -> Self {
		Self::default()
	}

	/// Restricts the listing to the given mailboxes.
	pub fn mailbox_ids(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
		self.mailbox_ids = ids.into_iter().collect();

		self
	}

	/// Lists only conversations in one of `statuses`.
	pub fn include_statuses(
		mut self,
		statuses: impl IntoIterator<Item = ConversationStatus>,
	) -> Self {
		self.status = Some(StatusSelection {
			condition: Condition::Include,
			statuses: statuses.into_iter().collect(),
		});

		self
	}

	/// Lists conversations in every status except `statuses`.
	pub fn exclude_statuses(
		mut self,
		statuses: impl IntoIterator<Item = ConversationStatus>,
	) -> Self {
		self.status = Some(StatusSelection {
			condition: Condition::Exclude,
			statuses: statuses.into_iter().collect(),
		});

		self
	}

	/// Restricts the creation time.
	pub fn created_between(
		mut self,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Self {
		self.created = Some(TimeRange::new(from, to));

		self
	}

	/// Restricts the last modification time.
	pub fn modified_between(
		mut self,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Self {
		self.modified = Some(TimeRange::new(from, to));

		self
	}

	/// Returns the status selection, if any.
	pub fn status_selection(&self) -> Option<&StatusSelection> {
		self.status.as_ref()
	}

	/// Resolves the status selection into the concrete statuses to list, one pass each.
	///
	/// An inclusive selection keeps its order and drops duplicates. An exclusive selection
	/// yields the remaining statuses in [`ConversationStatus::ALL`] order. `None` means no
	/// selection (a single unfiltered pass); `Some` of an empty list means nothing matches.
	pub fn expand_statuses(&self) -> Option<Vec<ConversationStatus>> {
		let selection = self.status.as_ref()?;
		let statuses = match selection.condition {
			Condition::Include => {
				let mut statuses = Vec::with_capacity(selection.statuses.len());

				for status in &selection.statuses {
					if !statuses.contains(status) {
						statuses.push(*status);
					}
				}

				statuses
			},
			Condition::Exclude => ConversationStatus::ALL
				.into_iter()
				.filter(|status| !selection.statuses.contains(status))
				.collect(),
		};

		Some(statuses)
	}

	/// Encodes the mailbox and time clauses as the `query` parameter.
	///
	/// Returns an empty [`Query`] when the filter has no such clauses.
	pub fn to_query(&self) -> Result<Query> {
		let mut clauses = Vec::new();

		if !self.mailbox_ids.is_empty() {
			let mailboxes = self
				.mailbox_ids
				.iter()
				.map(|id| format!("mailboxid:{id}"))
				.collect::<Vec<_>>()
				.join(" OR ");

			clauses.push(format!("({mailboxes})"));
		}
		if let Some(range) = self.created.filter(|range| !range.is_unbounded()) {
			clauses.push(range.clause("createdAt")?);
		}
		if let Some(range) = self.modified.filter(|range| !range.is_unbounded()) {
			clauses.push(range.clause("modifiedAt")?);
		}

		let mut query = Query::new();

		if !clauses.is_empty() {
			query.set(QUERY_PARAM, format!("({})", clauses.join(" AND ")));
		}

		Ok(query)
	}
}

fn format_bound(bound: Option<OffsetDateTime>) -> Result<String> {
	match bound {
		Some(at) => {
			let formatted =
				at.to_offset(UtcOffset::UTC).format(TIMESTAMP_FORMAT).map_err(ConfigError::from)?;

			Ok(formatted)
		},
		None => Ok("*".into()),
	}
}
