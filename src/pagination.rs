//! Paginated listing on top of the [`RequestExecutor`].
//!
//! [`PaginatedLister::list_all`] walks a list endpoint page by page and hands each record to a
//! visitor, stopping as soon as the visitor declines or the last page has been consumed.
//! [`PaginatedLister::fetch_pages`] trades ordering for throughput: it probes the first page
//! and then fetches the remaining pages concurrently, reporting each page's outcome separately.

mod concurrent;

pub use concurrent::*;

// self
use crate::{
	_prelude::*,
	executor::RequestExecutor,
	http::{ApiHttpClient, Query},
	obs::{self, Operation, OperationEvent, OperationSpan},
};

/// Query parameter carrying the 1-based page number.
pub const PAGE_PARAM: &str = "page";

/// Pagination descriptor returned with every list response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
	/// Records per page.
	pub size: u32,
	/// Records across all pages.
	pub total_elements: u64,
	/// Number of pages; `0` for an empty result set.
	pub total_pages: u32,
	/// 1-based number of this page.
	pub number: u32,
}
impl Page {
	/// Returns `true` when no further page should be requested.
	pub fn is_last(&self) -> bool {
		self.total_pages == 0 || self.number >= self.total_pages
	}
}

/// List response envelope: `{"_embedded": {"<name>": [...]}, "page": {...}}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListEnvelope<T> {
	/// Embedded collections keyed by resource name; absent on empty pages.
	#[serde(rename = "_embedded", default)]
	pub embedded: BTreeMap<String, Vec<T>>,
	/// Pagination descriptor.
	pub page: Page,
}
impl<T> ListEnvelope<T> {
	/// Removes and returns the records stored under `key`.
	pub fn take(&mut self, key: &str) -> Vec<T> {
		self.embedded.remove(key).unwrap_or_default()
	}
}

/// Drives list endpoints through a shared [`RequestExecutor`].
pub struct PaginatedLister<C>
where
	C: ?Sized + ApiHttpClient,
{
	executor: Arc<RequestExecutor<C>>,
}
impl<C> PaginatedLister<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a lister backed by `executor`.
	pub fn new(executor: Arc<RequestExecutor<C>>) -> Self {
		Self { executor }
	}

	/// Returns the executor backing this lister.
	pub fn executor(&self) -> &Arc<RequestExecutor<C>> {
		&self.executor
	}

	/// Visits every record of `resource` in page order, then in-page order.
	///
	/// `embedded_key` names the collection inside `_embedded`. Any `page` parameter in
	/// `base_query` is dropped so the walk starts at page 1, and it never requests a page past
	/// `totalPages`. Returns [`Error::Interrupted`] as
	/// soon as `visit` returns `false`; no further requests are sent after that.
	pub async fn list_all<T, F>(
		&self,
		resource: &str,
		embedded_key: &str,
		base_query: &Query,
		mut visit: F,
	) -> Result<()>
	where
		T: DeserializeOwned,
		F: FnMut(T) -> bool,
	{
		const OPERATION: Operation = Operation::List;

		let span = OperationSpan::new(OPERATION, resource);

		obs::record_operation_event(OPERATION, OperationEvent::Attempt);

		let result = span
			.instrument(async {
				let mut query = base_query.clone();
				let mut page_number = 1_u32;

				query.remove(PAGE_PARAM);

				loop {
					let mut envelope: ListEnvelope<T> = self.executor.get(resource, &query).await?;
					let page = envelope.page;

					if page.total_pages == 0 {
						return Ok(());
					}

					for record in envelope.take(embedded_key) {
						if !visit(record) {
							return Err(Error::Interrupted);
						}
					}

					// The local counter bounds the walk even when `number` is missing or stale.
					if page.is_last() || page_number >= page.total_pages {
						return Ok(());
					}

					page_number += 1;
					query.set(PAGE_PARAM, page_number.to_string());
				}
			})
			.await;

		obs::record_operation_event(OPERATION, OperationEvent::for_result(&result));

		result
	}
}
impl<C> Clone for PaginatedLister<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self { executor: Arc::clone(&self.executor) }
	}
}
impl<C> Debug for PaginatedLister<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PaginatedLister").field("executor", &self.executor).finish()
	}
}
