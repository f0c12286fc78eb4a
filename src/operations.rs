// src/operations.rs
//! The primary operations: read, create, append, move and property updates.
//!
//! `Workspace` composes the block fetcher, the Markdown parser and renderer
//! and the property builder on top of one [`NotionClient`]. Nothing is
//! cached between calls; every operation reads the current remote state.

use crate::api::parser::{decode_database_schema, decode_page, encode_blocks};
use crate::api::{collect_all_pages, ApiRequest, BlockTreeFetcher, NotionClient, PaginatedResponse};
use crate::constants::{MAX_BLOCKS_PER_REQUEST, NOTION_API_PAGE_SIZE};
use crate::error::AppError;
use crate::formatting::render_markdown;
use crate::model::{Block, Destination, Page, PropertySchema, PropertyValue};
use crate::parsing::parse_markdown;
use crate::pipeline::PageMover;
use crate::properties::{build_properties, properties_to_wire};
use crate::triage::TriageItem;
use crate::types::{split_into_spans, NotionId};
use serde_json::{json, Value};

/// Which template a new page starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTemplate {
    /// The destination's default template.
    Default,
    Id(NotionId),
}

impl PageTemplate {
    fn to_wire(&self) -> Value {
        match self {
            PageTemplate::Default => json!({ "type": "default" }),
            PageTemplate::Id(id) => json!({ "type": "template_id", "template_id": id.as_str() }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePageRequest {
    pub destination: Destination,
    /// Overrides any title given through `properties`.
    pub title: Option<String>,
    pub properties: Vec<(String, String)>,
    pub markdown: Option<String>,
    pub template: Option<PageTemplate>,
}

impl CreatePageRequest {
    pub fn new(destination: Destination) -> Self {
        Self {
            destination,
            title: None,
            properties: Vec::new(),
            markdown: None,
            template: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    pub fn with_markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown = Some(markdown.into());
        self
    }

    pub fn with_template(mut self, template: PageTemplate) -> Self {
        self.template = Some(template);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPage {
    pub page: Page,
    pub blocks_written: usize,
}

/// Outcome of a chunked append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppendReport {
    pub requests: usize,
    pub blocks_written: usize,
}

#[derive(Clone)]
pub struct Workspace {
    client: NotionClient,
    fetcher: BlockTreeFetcher,
}

impl Workspace {
    pub fn new(client: NotionClient) -> Self {
        Self {
            fetcher: BlockTreeFetcher::new(client.clone()),
            client,
        }
    }

    /// Limits how deep `read_*` descends into nested blocks.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.fetcher = self.fetcher.with_max_depth(max_depth);
        self
    }

    pub fn client(&self) -> &NotionClient {
        &self.client
    }

    // --- Read path ---

    pub async fn read_blocks(&self, id: &NotionId) -> Result<Vec<Block>, AppError> {
        self.fetcher.get_tree(id).await
    }

    /// The page body as Markdown.
    pub async fn read_markdown(&self, id: &NotionId) -> Result<String, AppError> {
        let blocks = self.read_blocks(id).await?;
        log::info!("Read {} top-level blocks from {}", blocks.len(), id);
        Ok(render_markdown(&blocks))
    }

    pub async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError> {
        decode_page(&self.client.get(format!("pages/{}", id)).await?)
    }

    /// The write schema of a destination. A plain page only has a title.
    pub async fn retrieve_schema(&self, destination: &Destination) -> Result<PropertySchema, AppError> {
        match destination {
            Destination::Page(_) => Ok(PropertySchema::title_only()),
            Destination::Database(id) => {
                decode_database_schema(&self.client.get(format!("databases/{}", id)).await?)
            }
        }
    }

    // --- Write path ---

    /// Creates a page with properties and an optional Markdown body.
    ///
    /// The title goes to whatever property the destination declares as its
    /// title. With a template the body is left out, since the template
    /// fills the page asynchronously. Bodies longer than one request are
    /// attached up to the per-request limit and the rest is appended.
    pub async fn create_page(&self, request: CreatePageRequest) -> Result<CreatedPage, AppError> {
        let schema = self.retrieve_schema(&request.destination).await?;
        let title_name = schema
            .title_property_name()
            .unwrap_or("title")
            .to_string();

        let pairs: Vec<(String, String)> = match &request.title {
            Some(_) => request
                .properties
                .iter()
                .filter(|(key, _)| {
                    !matches!(schema.resolve(key), Some((name, _)) if name == title_name)
                })
                .cloned()
                .collect(),
            None => request.properties.clone(),
        };
        let mut properties = build_properties(&schema, &pairs)?;
        if let Some(title) = &request.title {
            properties.insert(title_name.clone(), PropertyValue::Title(split_into_spans(title)));
        }

        let blocks = request
            .markdown
            .as_deref()
            .map(parse_markdown)
            .unwrap_or_default();

        let mut body = json!({
            "parent": request.destination.to_parent_wire(),
            "properties": properties_to_wire(&properties),
        });

        let mut remaining: Vec<Value> = Vec::new();
        let mut attached = 0;
        match &request.template {
            Some(template) => {
                if !blocks.is_empty() {
                    log::warn!(
                        "Ignoring {} body blocks: the template provides the page content",
                        blocks.len()
                    );
                }
                body["template"] = template.to_wire();
            }
            None if !blocks.is_empty() => {
                let mut children = encode_blocks(&blocks)?;
                let split = children.len().min(MAX_BLOCKS_PER_REQUEST);
                remaining = children.split_off(split);
                body["children"] = Value::Array(children);
                attached = split;
            }
            None => {}
        }

        let page = decode_page(&self.client.post("pages", body).await?)?;
        log::info!(
            "Created page {} under {} with {} blocks",
            page.id,
            request.destination,
            attached
        );

        if remaining.is_empty() {
            return Ok(CreatedPage {
                page,
                blocks_written: attached,
            });
        }

        let pending = remaining.len();
        match self.append_encoded(&page.id, remaining).await {
            Ok(report) => Ok(CreatedPage {
                page,
                blocks_written: attached + report.blocks_written,
            }),
            Err(AppError::PartialBatchFailure {
                succeeded,
                failed,
                source,
            }) => Err(AppError::PartialBatchFailure {
                succeeded: attached + succeeded,
                failed,
                source,
            }),
            Err(err) => Err(AppError::PartialBatchFailure {
                succeeded: attached,
                failed: pending,
                source: Box::new(err),
            }),
        }
    }

    pub async fn append_markdown(&self, id: &NotionId, markdown: &str) -> Result<AppendReport, AppError> {
        let blocks = parse_markdown(markdown);
        self.append_blocks(id, &blocks).await
    }

    /// Appends blocks in order, one request per chunk.
    ///
    /// Every block is encoded before the first request, so an unwritable
    /// block fails the call with nothing sent. Stops at the first failing
    /// chunk. A failure after at least one committed chunk is reported as
    /// [`AppError::PartialBatchFailure`]; committed chunks are not rolled back.
    pub async fn append_blocks(&self, id: &NotionId, blocks: &[Block]) -> Result<AppendReport, AppError> {
        let encoded = encode_blocks(blocks)?;
        self.append_encoded(id, encoded).await
    }

    async fn append_encoded(&self, id: &NotionId, blocks: Vec<Value>) -> Result<AppendReport, AppError> {
        let path = format!("blocks/{}/children", id);
        let mut report = AppendReport::default();

        for chunk in blocks.chunks(MAX_BLOCKS_PER_REQUEST) {
            let body = json!({ "children": chunk });
            log::debug!("Appending {} blocks to {}", chunk.len(), id);

            if let Err(err) = self.client.patch(path.as_str(), body).await {
                if report.requests == 0 {
                    return Err(err);
                }
                return Err(AppError::PartialBatchFailure {
                    succeeded: report.blocks_written,
                    failed: blocks.len() - report.blocks_written,
                    source: Box::new(err),
                });
            }

            report.requests += 1;
            report.blocks_written += chunk.len();
        }

        log::info!(
            "Appended {} blocks to {} in {} requests",
            report.blocks_written,
            id,
            report.requests
        );
        Ok(report)
    }

    /// Re-parents a page under a plain page or into a typed container.
    pub async fn move_page(&self, id: &NotionId, destination: &Destination) -> Result<(), AppError> {
        self.client
            .post(
                format!("pages/{}/move", id),
                json!({ "parent": destination.to_parent_wire() }),
            )
            .await?;
        log::info!("Moved {} to {}", id, destination);
        Ok(())
    }

    /// Sets properties on an existing page, typed by the page's own schema.
    pub async fn update_properties(
        &self,
        id: &NotionId,
        pairs: &[(String, String)],
    ) -> Result<Page, AppError> {
        let current = self.retrieve_page(id).await?;
        let properties = build_properties(&current.schema, pairs)?;
        let body = json!({ "properties": properties_to_wire(&properties) });

        let updated = decode_page(&self.client.patch(format!("pages/{}", id), body).await?)?;
        log::info!("Updated {} properties on {}", properties.len(), id);
        Ok(updated)
    }

    /// Items waiting in an inbox: the child pages of a plain page, or the
    /// rows of a typed container.
    pub async fn list_inbox(&self, inbox: &Destination) -> Result<Vec<TriageItem>, AppError> {
        let items = match inbox {
            Destination::Page(id) => self
                .fetcher
                .get_children(id)
                .await?
                .into_iter()
                .filter_map(|block| match block {
                    Block::ChildPage(page) => page.common.id.map(|id| TriageItem::new(id, page.title)),
                    _ => None,
                })
                .collect(),
            Destination::Database(id) => self
                .query_rows(id)
                .await?
                .into_iter()
                .map(|page| TriageItem::new(page.id, page.title))
                .collect::<Vec<_>>(),
        };
        log::debug!("Inbox {} holds {} items", inbox, items.len());
        Ok(items)
    }

    async fn query_rows(&self, database: &NotionId) -> Result<Vec<Page>, AppError> {
        let path = format!("databases/{}/query", database);
        collect_all_pages(|cursor| {
            let client = self.client.clone();
            let path = path.clone();
            async move {
                let mut body = json!({ "page_size": NOTION_API_PAGE_SIZE });
                if let Some(cursor) = cursor {
                    body["start_cursor"] = json!(cursor);
                }
                PaginatedResponse::from_value(client.execute(ApiRequest::post(path, body)).await?)?
                    .try_map(decode_page)
            }
        })
        .await
    }
}

#[async_trait::async_trait]
impl PageMover for Workspace {
    async fn move_page(&self, page: &NotionId, destination: &Destination) -> Result<(), AppError> {
        Workspace::move_page(self, page, destination).await
    }
}
