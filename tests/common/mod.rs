// tests/common/mod.rs
//! Shared fixtures: an in-memory transport and response builders.

#![allow(dead_code)]

use notionmd::api::{ApiRequest, RawResponse, RetryPolicy, Transport, TransportFailure};
use notionmd::{ApiKey, ClientConfig, NotionClient, NotionId, Workspace};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

pub type Reply = Result<RawResponse, TransportFailure>;
type Handler = Box<dyn Fn(&ApiRequest) -> Reply + Send + Sync>;

/// Serves scripted replies in order, then falls back to a routing handler.
/// Every request is recorded with the (possibly paused) clock time it was
/// sent at.
pub struct MockTransport {
    script: Mutex<VecDeque<Reply>>,
    handler: Option<Handler>,
    sent: Mutex<Vec<(ApiRequest, Instant)>>,
}

impl MockTransport {
    pub fn scripted(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(replies.into()),
            handler: None,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn routed(handler: impl Fn(&ApiRequest) -> Reply + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            handler: Some(Box::new(handler)),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().iter().map(|(r, _)| r.clone()).collect()
    }

    pub fn send_times(&self) -> Vec<Instant> {
        self.sent.lock().iter().map(|(_, at)| *at).collect()
    }

    pub fn writes(&self) -> Vec<ApiRequest> {
        self.requests().into_iter().filter(|r| r.is_write()).collect()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest, _timeout: Duration) -> Reply {
        self.sent.lock().push((request.clone(), Instant::now()));
        if let Some(reply) = self.script.lock().pop_front() {
            return reply;
        }
        match &self.handler {
            Some(handler) => handler(request),
            None => Ok(RawResponse::new(
                500,
                json!({ "object": "error", "code": "internal_server_error", "message": format!("unscripted {}", request) }).to_string(),
            )),
        }
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig::new(ApiKey::new("secret_test_key_0123456789abcdef").unwrap())
        .unwrap()
        .with_retry(RetryPolicy::default().without_jitter())
}

pub fn client(transport: Arc<MockTransport>) -> NotionClient {
    NotionClient::with_transport(transport, &test_config())
}

pub fn workspace(transport: Arc<MockTransport>) -> Workspace {
    Workspace::new(client(transport))
}

// --- Replies ---

pub fn ok(body: Value) -> Reply {
    Ok(RawResponse::new(200, body.to_string()))
}

pub fn status(code: u16) -> Reply {
    Ok(RawResponse::new(code, ""))
}

pub fn error(code: u16, error_code: &str, message: &str) -> Reply {
    Ok(RawResponse::new(
        code,
        json!({ "object": "error", "status": code, "code": error_code, "message": message })
            .to_string(),
    ))
}

// --- Wire fixtures ---

pub fn id(n: u32) -> NotionId {
    NotionId::parse(&format!("{:032x}", n)).unwrap()
}

pub fn listing(results: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "object": "list",
        "results": results,
        "has_more": next_cursor.is_some(),
        "next_cursor": next_cursor,
    })
}

pub fn paragraph_wire(n: u32, text: &str, has_children: bool) -> Value {
    json!({
        "object": "block",
        "id": id(n).as_str(),
        "type": "paragraph",
        "has_children": has_children,
        "paragraph": {
            "rich_text": [{ "type": "text", "plain_text": text, "text": { "content": text } }]
        }
    })
}

pub fn page_wire(page: &NotionId, title_property: &str, title: &str, extra: Value) -> Value {
    let mut properties = json!({
        title_property: {
            "id": "title",
            "type": "title",
            "title": [{ "type": "text", "plain_text": title, "text": { "content": title } }]
        }
    });
    if let (Some(map), Value::Object(extra)) = (properties.as_object_mut(), extra) {
        map.extend(extra);
    }
    json!({
        "object": "page",
        "id": page.as_str(),
        "url": format!("https://www.notion.so/{}", page.to_compact()),
        "archived": false,
        "properties": properties,
    })
}
