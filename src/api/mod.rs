// src/api/mod.rs
//! Notion API interaction: transport, pacing, retries, pagination and the
//! wire codec.
//!
//! Everything above this module speaks in domain types; HTTP details stay here.

mod block_tree;
mod client;
mod pagination;
pub mod parser;
mod rate_limit;
mod raw;
mod retry;
mod transport;
mod types;

pub use block_tree::BlockTreeFetcher;
pub use client::NotionClient;
pub use pagination::collect_all_pages;
pub use rate_limit::RequestPacer;
pub use raw::{endpoint_request, DEFAULT_RESULTS_KEY};
pub use retry::{parse_retry_after, AttemptFailure, RetryPolicy};
pub use transport::{ApiRequest, RawResponse, ReqwestTransport, Transport, TransportFailure};
pub use types::PaginatedResponse;
