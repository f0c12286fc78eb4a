use super::Block;
use crate::types::NotionId;
use serde::{Deserialize, Serialize};

/// Common fields for all blocks.
///
/// Blocks parsed from Markdown have no id yet; fetched blocks always do.
/// `children` is only populated when the source declared `has_children`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockCommon {
    pub id: Option<NotionId>,
    pub has_children: bool,
    pub children: Vec<Block>,
}

impl BlockCommon {
    pub fn new(id: NotionId) -> Self {
        Self {
            id: Some(id),
            has_children: false,
            children: Vec::new(),
        }
    }

    pub fn with_has_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.has_children = !children.is_empty();
        self.children = children;
        self
    }
}
