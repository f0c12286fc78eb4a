// src/lib.rs
//! notionmd library: Markdown in and out of Notion pages, schema-driven
//! property writes and rule-based inbox triage.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `RemoteApiError`, `ValidationError`
//! - **Configuration**: `ClientConfig`, `CommandLineInput`
//! - **Domain model**: `Block`, `Page`, `Destination`, `PropertySchema`, `PropertyValue`
//! - **API client**: `NotionClient`, `Transport`, `BlockTreeFetcher`
//! - **Conversion**: `parse_markdown`, `render_markdown`, `build_properties`
//! - **Operations**: `Workspace`, triage `plan`/`apply`

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod model;
pub mod operations;
pub mod parsing;
pub mod pipeline;
pub mod properties;
pub mod triage;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode, RemoteApiError, RemoteFailureKind};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{ClientConfig, CommandLineInput};

// --- Domain Model ---
pub use crate::model::{
    Block, BlockCommon, Destination, Page, Parent, PropertySchema, PropertyType, PropertyValue,
};

// --- Domain Types ---
pub use crate::types::{Annotations, ApiKey, NotionId, RichTextItem, ValidatedUrl};

// --- API Client ---
pub use crate::api::{ApiRequest, BlockTreeFetcher, NotionClient, RawResponse, Transport};

// --- Conversion ---
pub use crate::formatting::render_markdown;
pub use crate::parsing::parse_markdown;
pub use crate::properties::build_properties;

// --- Operations ---
pub use crate::operations::{AppendReport, CreatePageRequest, CreatedPage, PageTemplate, Workspace};
pub use crate::pipeline::PageMover;
