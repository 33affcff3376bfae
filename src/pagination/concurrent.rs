//! Concurrent page fetch: probe once, then request the remaining pages in parallel.

// crates.io
use futures::stream::{self, StreamExt};
// self
use crate::{
	_prelude::*,
	http::{ApiHttpClient, Query},
	obs::{self, Operation, OperationEvent, OperationSpan},
	pagination::{ListEnvelope, PAGE_PARAM, PaginatedLister},
};

/// Default cap on in-flight page requests.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Outcome of fetching one page; failures stay local to their page.
#[derive(Debug)]
pub struct PageResult<T> {
	/// 1-based page number.
	pub number: u32,
	/// Records of the page, or the error that page failed with.
	pub records: Result<Vec<T>>,
}

impl<C> PaginatedLister<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Fetches every page of `resource`, running up to `max_concurrency` requests at once.
	///
	/// The probe request (without a `page` parameter) discovers the page count; its failure is
	/// returned as `Err`. The remaining pages are fetched concurrently, each with its own copy of
	/// the query, and their outcomes are returned individually, sorted by page number.
	pub async fn fetch_pages<T>(
		&self,
		resource: &str,
		embedded_key: &str,
		base_query: &Query,
		max_concurrency: usize,
	) -> Result<Vec<PageResult<T>>>
	where
		T: DeserializeOwned,
	{
		const OPERATION: Operation = Operation::FetchPages;

		let span = OperationSpan::new(OPERATION, resource);

		obs::record_operation_event(OPERATION, OperationEvent::Attempt);

		let result = span
			.instrument(async {
				let mut template = base_query.clone();

				template.remove(PAGE_PARAM);

				let mut probe: ListEnvelope<T> = self.executor.get(resource, &template).await?;
				let first_number = probe.page.number.max(1);
				let first =
					PageResult { number: first_number, records: Ok(probe.take(embedded_key)) };

				if probe.page.total_pages <= first_number {
					return Ok(vec![first]);
				}

				let template = &template;
				let mut pages = stream::iter(first_number + 1..=probe.page.total_pages)
					.map(|number| async move {
						let query = template.clone().with(PAGE_PARAM, number.to_string());
						let records = self
							.executor
							.get::<ListEnvelope<T>>(resource, &query)
							.await
							.map(|mut envelope| envelope.take(embedded_key));

						PageResult { number, records }
					})
					.buffer_unordered(max_concurrency.max(1))
					.collect::<Vec<_>>()
					.await;

				pages.push(first);
				pages.sort_by_key(|page| page.number);

				Ok(pages)
			})
			.await;

		obs::record_operation_event(OPERATION, OperationEvent::for_result(&result));

		result
	}
}
