// src/api/pagination.rs
//! Cursor-driven pagination.

use super::types::PaginatedResponse;
use crate::error::AppError;
use std::collections::HashSet;
use std::future::Future;

/// Fetches every page of a cursor listing and concatenates the results in
/// the order the cursors returned them.
///
/// Stops on `has_more == false`, on a missing or empty cursor, and on a
/// cursor that was already followed once.
pub async fn collect_all_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut seen_cursors = HashSet::new();
    let mut cursor: Option<String> = None;
    let mut pages_fetched = 0usize;

    loop {
        let response = fetch_page(cursor.take()).await?;
        pages_fetched += 1;
        all_items.extend(response.results);

        if !response.has_more {
            break;
        }

        match response.next_cursor {
            Some(next) if !next.is_empty() => {
                if !seen_cursors.insert(next.clone()) {
                    log::warn!("Pagination returned repeated cursor {}; stopping", next);
                    break;
                }
                cursor = Some(next);
            }
            _ => break,
        }
    }

    log::debug!(
        "Paginated {} items across {} pages",
        all_items.len(),
        pages_fetched
    );
    Ok(all_items)
}
