// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you the story
//! of how the system talks to Notion: how fast, how often, how much.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// API version pinned on every request.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Base URL all endpoint paths are joined onto.
pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com/v1";

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips during recursive fetching.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Maximum nesting depth when recursively fetching child blocks.
pub const NOTION_MAX_FETCH_DEPTH: usize = 50;

/// Most blocks a single create or append request may carry.
pub const MAX_BLOCKS_PER_REQUEST: usize = 100;

/// Longest text a single rich text span may hold.
pub const RICH_TEXT_SPAN_LIMIT: usize = 2000;

// ---------------------------------------------------------------------------
// Transport pacing and retry
// ---------------------------------------------------------------------------

/// Minimum spacing between outbound requests.
///
/// Notion documents an average of three requests per second per
/// integration; 350ms keeps sustained sequential use just under it.
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(350);

/// Attempts per request, counting the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;

/// Ceiling for a single exponential backoff sleep.
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Total time one logical request may spend sleeping between retries.
pub const RETRY_BUDGET: Duration = Duration::from_secs(120);

/// Wall-clock limit for read requests.
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Wall-clock limit for create/append/move/update requests.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Markdown layout
// ---------------------------------------------------------------------------

/// Indent for children nested under a bulleted or to-do item.
pub const BULLETED_CHILD_INDENT: usize = 2;

/// Indent for children nested under a numbered item (width of `1. `).
pub const NUMBERED_CHILD_INDENT: usize = 3;

/// Line standing in for an empty paragraph, which Markdown cannot express.
pub const EMPTY_PARAGRAPH_MARKER: &str = "<br>";

/// Code language Notion uses when none is given.
pub const DEFAULT_CODE_LANGUAGE: &str = "plain text";

/// Estimated characters per block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
