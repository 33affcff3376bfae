//! Async client for a customer-support REST API: client-credentials token management,
//! rate-limit aware request execution, and paginated listing of conversations, threads, and
//! users.
//!
//! The request pipeline is layered bottom-up:
//!
//! - [`auth::TokenManager`] owns the bearer token and refreshes it under a single-flight guard.
//! - [`executor::RequestExecutor`] wraps each call with token injection, rate-limit backoff, and
//!   one-shot re-authentication.
//! - [`pagination::PaginatedLister`] drives list endpoints page by page, or concurrently.
//! - [`client::Client`] ties the layers to the conversation, thread, and user endpoints.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod http;
pub mod obs;
pub mod pagination;
pub mod resources;
pub mod retry;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use time;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
