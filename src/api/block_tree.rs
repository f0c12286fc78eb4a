// src/api/block_tree.rs
//! Recursive retrieval of a page body.

use super::client::NotionClient;
use super::pagination::collect_all_pages;
use super::parser::decode_block;
use super::transport::ApiRequest;
use super::types::PaginatedResponse;
use crate::constants::{NOTION_API_PAGE_SIZE, NOTION_MAX_FETCH_DEPTH};
use crate::error::AppError;
use crate::model::Block;
use crate::types::NotionId;
use futures::future::BoxFuture;
use futures::FutureExt;

/// Fetches block trees through a [`NotionClient`].
///
/// Every node is fully built before it is handed to its parent: children
/// are fetched first and attached with [`Block::with_children`].
#[derive(Clone)]
pub struct BlockTreeFetcher {
    client: NotionClient,
    max_depth: usize,
}

impl BlockTreeFetcher {
    pub fn new(client: NotionClient) -> Self {
        Self {
            client,
            max_depth: NOTION_MAX_FETCH_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// One level of children, all pages concatenated in order.
    pub async fn get_children(&self, parent: &NotionId) -> Result<Vec<Block>, AppError> {
        let path = format!("blocks/{}/children", parent);
        collect_all_pages(|cursor| {
            let client = self.client.clone();
            let path = path.clone();
            async move {
                let mut request =
                    ApiRequest::get(path).with_query("page_size", NOTION_API_PAGE_SIZE.to_string());
                if let Some(cursor) = cursor {
                    request = request.with_query("start_cursor", cursor);
                }
                PaginatedResponse::from_value(client.execute(request).await?)?
                    .try_map(decode_block)
            }
        })
        .await
    }

    /// The whole body under `root`, down to the configured depth.
    ///
    /// Child pages are leaves: their content belongs to the child page.
    pub async fn get_tree(&self, root: &NotionId) -> Result<Vec<Block>, AppError> {
        log::debug!("Fetching block tree for {} (max depth {})", root, self.max_depth);
        self.fetch_level(root.clone(), self.max_depth).await
    }

    fn fetch_level(
        &self,
        parent: NotionId,
        depth_remaining: usize,
    ) -> BoxFuture<'_, Result<Vec<Block>, AppError>> {
        async move {
            let blocks = self.get_children(&parent).await?;
            let mut built = Vec::with_capacity(blocks.len());

            for block in blocks {
                built.push(self.complete(block, depth_remaining).await?);
            }
            Ok(built)
        }
        .boxed()
    }

    async fn complete(&self, block: Block, depth_remaining: usize) -> Result<Block, AppError> {
        if !block.has_children() || matches!(block, Block::ChildPage(_)) {
            return Ok(block);
        }

        let Some(id) = block.id().cloned() else {
            return Ok(block);
        };

        if depth_remaining <= 1 {
            log::warn!(
                "Depth limit reached at block {}; its children are left out",
                id
            );
            return Ok(block);
        }

        let children = self.fetch_level(id, depth_remaining - 1).await?;
        Ok(block.with_children(children))
    }
}
