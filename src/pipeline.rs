// src/pipeline.rs
//! Capability traits at the seams between the orchestrator and the batch
//! engines that drive it.

use crate::error::AppError;
use crate::model::Destination;
use crate::types::NotionId;

/// Re-parents a page. Content stays attached to the same id.
#[async_trait::async_trait]
pub trait PageMover: Send + Sync {
    async fn move_page(&self, page: &NotionId, destination: &Destination) -> Result<(), AppError>;
}
