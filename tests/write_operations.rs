// tests/write_operations.rs
//! Create, append, move and property updates against a scripted API.

mod common;

use common::*;
use notionmd::api::ApiRequest;
use notionmd::model::{BlockCommon, UnsupportedBlock};
use notionmd::{AppError, Block, CreatePageRequest, Destination, PageTemplate};
use pretty_assertions::assert_eq;
use reqwest::Method;
use serde_json::{json, Value};

fn numbered_paragraphs(count: usize) -> String {
    (0..count)
        .map(|n| format!("p{}", n))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn children_of(request: &ApiRequest) -> &Vec<Value> {
    request.body.as_ref().unwrap()["children"].as_array().unwrap()
}

fn first_text(request: &ApiRequest) -> &str {
    children_of(request)[0]["paragraph"]["rich_text"][0]["text"]["content"]
        .as_str()
        .unwrap()
}

fn database_schema_wire() -> Value {
    json!({
        "object": "database",
        "id": id(10).as_str(),
        "properties": {
            "Task": { "id": "title", "type": "title", "title": {} },
            "Done": { "id": "a", "type": "checkbox", "checkbox": {} },
            "Score": { "id": "b", "type": "formula", "formula": { "expression": "1" } }
        }
    })
}

/// Answers schema reads for database 10, page creation and appends.
fn api(request: &ApiRequest) -> Reply {
    let path = request.path.as_str();
    if request.method == Method::GET && path == format!("databases/{}", id(10)) {
        ok(database_schema_wire())
    } else if request.method == Method::POST && path == "pages" {
        ok(page_wire(&id(50), "Task", "created", json!({})))
    } else if request.method == Method::PATCH && path.ends_with("/children") {
        ok(listing(vec![], None))
    } else {
        error(404, "object_not_found", "no such route")
    }
}

// --- append ---

#[tokio::test(start_paused = true)]
async fn appends_in_ordered_chunks_of_one_hundred() {
    let transport = MockTransport::routed(api);
    let report = workspace(transport.clone())
        .append_markdown(&id(1), &numbered_paragraphs(250))
        .await
        .unwrap();

    assert_eq!(report.requests, 3);
    assert_eq!(report.blocks_written, 250);

    let writes = transport.writes();
    let sizes: Vec<usize> = writes.iter().map(|r| children_of(r).len()).collect();
    assert_eq!(sizes, vec![100, 100, 50]);
    let firsts: Vec<&str> = writes.iter().map(first_text).collect();
    assert_eq!(firsts, vec!["p0", "p100", "p200"]);
    assert!(writes
        .iter()
        .all(|r| r.path == format!("blocks/{}/children", id(1))));
}

#[tokio::test(start_paused = true)]
async fn later_chunk_failure_is_partial() {
    let transport = MockTransport::scripted(vec![
        ok(listing(vec![], None)),
        error(400, "validation_error", "body failed validation"),
    ]);

    let err = workspace(transport.clone())
        .append_markdown(&id(1), &numbered_paragraphs(250))
        .await
        .unwrap_err();

    assert_eq!(transport.requests().len(), 2);
    match err {
        AppError::PartialBatchFailure {
            succeeded,
            failed,
            source,
        } => {
            assert_eq!((succeeded, failed), (100, 150));
            assert_eq!(source.remote().map(|r| r.status), Some(400));
        }
        other => panic!("expected partial failure, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn first_chunk_failure_is_returned_as_is() {
    let transport = MockTransport::scripted(vec![error(404, "object_not_found", "gone")]);

    let err = workspace(transport)
        .append_markdown(&id(1), "hello")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::RemoteApi(_)));
}

#[tokio::test(start_paused = true)]
async fn unwritable_block_in_a_later_chunk_sends_nothing() {
    let transport = MockTransport::routed(api);
    let mut blocks: Vec<Block> = (0..150).map(|n| Block::paragraph(&format!("p{}", n))).collect();
    blocks.push(Block::Unsupported(UnsupportedBlock {
        common: BlockCommon::default(),
        block_type: "synced_block".to_string(),
    }));

    let err = workspace(transport.clone())
        .append_blocks(&id(1), &blocks)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UnwritableBlock { .. }));
    assert!(transport.requests().is_empty());
}

// --- create ---

#[tokio::test(start_paused = true)]
async fn create_resolves_the_title_property_from_the_schema() {
    let transport = MockTransport::routed(api);
    let request = CreatePageRequest::new(Destination::Database(id(10)))
        .with_title("Buy milk")
        .with_property("done", "true")
        .with_markdown("# Hi\n\n- [ ] a\n");

    let created = workspace(transport.clone()).create_page(request).await.unwrap();

    assert_eq!(created.page.id, id(50));
    assert_eq!(created.blocks_written, 2);

    let writes = transport.writes();
    assert_eq!(writes.len(), 1);
    let body = writes[0].body.clone().unwrap();
    assert_eq!(
        body["parent"],
        json!({ "type": "database_id", "database_id": id(10).as_str() })
    );
    assert_eq!(
        body["properties"],
        json!({
            "Done": { "checkbox": true },
            "Task": { "title": [{ "type": "text", "text": { "content": "Buy milk", "link": null } }] }
        })
    );
    assert_eq!(body["children"].as_array().map(Vec::len), Some(2));
}

#[tokio::test(start_paused = true)]
async fn explicit_title_overrides_a_title_pair() {
    let transport = MockTransport::routed(api);
    let request = CreatePageRequest::new(Destination::Database(id(10)))
        .with_property("Task", "from pairs")
        .with_title("explicit");

    workspace(transport.clone()).create_page(request).await.unwrap();

    let body = transport.writes()[0].body.clone().unwrap();
    assert_eq!(
        body["properties"]["Task"]["title"][0]["text"]["content"],
        json!("explicit")
    );
}

#[tokio::test(start_paused = true)]
async fn pages_under_pages_use_the_plain_title_key() {
    let transport = MockTransport::routed(api);
    let request = CreatePageRequest::new(Destination::Page(id(11))).with_title("Notes");

    workspace(transport.clone()).create_page(request).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1, "no schema read for a page parent");
    let body = requests[0].body.clone().unwrap();
    assert!(body["properties"].get("title").is_some());
    assert!(body.get("children").is_none());
}

#[tokio::test(start_paused = true)]
async fn templates_omit_children() {
    let transport = MockTransport::routed(api);
    let request = CreatePageRequest::new(Destination::Database(id(10)))
        .with_title("From template")
        .with_markdown("ignored body")
        .with_template(PageTemplate::Default);

    let created = workspace(transport.clone()).create_page(request).await.unwrap();

    assert_eq!(created.blocks_written, 0);
    let body = transport.writes()[0].body.clone().unwrap();
    assert_eq!(body["template"], json!({ "type": "default" }));
    assert!(body.get("children").is_none());
}

#[tokio::test(start_paused = true)]
async fn long_bodies_are_finished_with_appends() {
    let transport = MockTransport::routed(api);
    let request = CreatePageRequest::new(Destination::Page(id(11)))
        .with_title("Long")
        .with_markdown(numbered_paragraphs(150));

    let created = workspace(transport.clone()).create_page(request).await.unwrap();

    assert_eq!(created.blocks_written, 150);
    let writes = transport.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0].path, "pages");
    assert_eq!(children_of(&writes[0]).len(), 100);
    assert_eq!(writes[1].path, format!("blocks/{}/children", id(50)));
    assert_eq!(children_of(&writes[1]).len(), 50);
    assert_eq!(first_text(&writes[1]), "p100");
}

#[tokio::test(start_paused = true)]
async fn computed_properties_fail_before_any_write() {
    let transport = MockTransport::routed(api);
    let request = CreatePageRequest::new(Destination::Database(id(10))).with_property("Score", "5");

    let err = workspace(transport.clone()).create_page(request).await.unwrap_err();

    assert!(matches!(err, AppError::UnsupportedPropertyType { .. }));
    assert!(transport.writes().is_empty());
}

// --- properties ---

#[tokio::test(start_paused = true)]
async fn update_uses_the_pages_own_schema() {
    let page = page_wire(
        &id(20),
        "Name",
        "Row",
        json!({
            "Tags": { "id": "t", "type": "multi_select", "multi_select": [] },
            "Total": { "id": "f", "type": "formula", "formula": { "type": "number", "number": 3 } }
        }),
    );
    let transport = MockTransport::scripted(vec![ok(page.clone()), ok(page)]);

    workspace(transport.clone())
        .update_properties(&id(20), &[("tags".to_string(), "a,b,c".to_string())])
        .await
        .unwrap();

    let writes = transport.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].method, Method::PATCH);
    assert_eq!(writes[0].path, format!("pages/{}", id(20)));
    assert_eq!(
        writes[0].body.clone().unwrap(),
        json!({ "properties": { "Tags": { "multi_select": [{ "name": "a" }, { "name": "b" }, { "name": "c" }] } } })
    );
}

#[tokio::test(start_paused = true)]
async fn formula_updates_make_no_write_calls() {
    let page = page_wire(
        &id(20),
        "Name",
        "Row",
        json!({ "Total": { "id": "f", "type": "formula", "formula": { "type": "number", "number": 3 } } }),
    );
    let transport = MockTransport::scripted(vec![ok(page)]);

    let err = workspace(transport.clone())
        .update_properties(&id(20), &[("Total".to_string(), "4".to_string())])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::UnsupportedPropertyType { ref property_type, .. } if property_type == "formula"
    ));
    assert!(transport.writes().is_empty());
}

// --- move ---

#[tokio::test(start_paused = true)]
async fn move_reparents_with_a_single_call() {
    let transport = MockTransport::scripted(vec![ok(page_wire(&id(30), "title", "x", json!({})))]);

    workspace(transport.clone())
        .move_page(&id(30), &Destination::Database(id(10)))
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path, format!("pages/{}/move", id(30)));
    assert_eq!(
        requests[0].body.clone().unwrap(),
        json!({ "parent": { "type": "database_id", "database_id": id(10).as_str() } })
    );
}
