// tests/triage_flow.rs
//! Inbox listing, planning and best-effort application.

mod common;

use common::*;
use notionmd::api::ApiRequest;
use notionmd::triage::{apply, parse_rules, plan};
use notionmd::{AppError, Destination};
use pretty_assertions::assert_eq;
use reqwest::Method;
use serde_json::json;

fn rules_json() -> String {
    format!(
        r#"[
            {{ "match": {{ "contains": "invoice" }}, "destination": {{ "database": "{}" }} }},
            {{ "match": {{ "title_regex": "^invoice\\s+\\d+$" }}, "destination": {{ "page": "{}" }} }},
            {{ "match": {{ "title_regex": "recipe" }}, "destination": {{ "page": "{}" }} }}
        ]"#,
        id(100).to_url(),
        id(101),
        id(102).to_compact()
    )
}

/// Database 7 holds three rows over two result pages. Moving row 2 fails.
fn inbox_api(request: &ApiRequest) -> Reply {
    let query_path = format!("databases/{}/query", id(7));
    if request.method == Method::POST && request.path == query_path {
        let cursor = request
            .body
            .as_ref()
            .and_then(|b| b.get("start_cursor"))
            .and_then(|c| c.as_str());
        return match cursor {
            None => ok(listing(
                vec![
                    page_wire(&id(1), "Name", "Invoice 12", json!({})),
                    page_wire(&id(2), "Name", "invoice 13", json!({})),
                ],
                Some("next"),
            )),
            Some(_) => ok(listing(
                vec![page_wire(&id(3), "Name", "Weekend plans", json!({}))],
                None,
            )),
        };
    }
    if request.path == format!("pages/{}/move", id(2)) {
        return error(404, "object_not_found", "Could not find page");
    }
    if request.path.ends_with("/move") {
        return ok(json!({ "object": "page" }));
    }
    error(400, "invalid_request_url", "unexpected")
}

#[tokio::test(start_paused = true)]
async fn plans_from_a_paginated_inbox() {
    let transport = MockTransport::routed(inbox_api);
    let workspace = workspace(transport.clone());

    let items = workspace.list_inbox(&Destination::Database(id(7))).await.unwrap();
    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Invoice 12", "invoice 13", "Weekend plans"]);

    let plan = plan(&items, &parse_rules(&rules_json()).unwrap());
    assert_eq!(plan.moves.len(), 2);
    assert!(plan.moves.iter().all(|m| m.rule_index == 0));
    assert_eq!(plan.unmatched.len(), 1);
    assert!(transport.writes().is_empty(), "planning never writes");
}

#[tokio::test(start_paused = true)]
async fn apply_reports_each_failure_and_keeps_going() {
    let transport = MockTransport::routed(inbox_api);
    let workspace = workspace(transport.clone());

    let items = workspace.list_inbox(&Destination::Database(id(7))).await.unwrap();
    let plan = plan(&items, &parse_rules(&rules_json()).unwrap());
    let report = apply(&plan, &workspace).await;

    let moves: Vec<String> = transport
        .writes()
        .into_iter()
        .map(|r| r.path)
        .filter(|p| p.ends_with("/move"))
        .collect();
    assert_eq!(
        moves,
        vec![format!("pages/{}/move", id(1)), format!("pages/{}/move", id(2))]
    );
    assert_eq!((report.succeeded(), report.failed()), (1, 1));

    match report.into_result() {
        Err(AppError::PartialBatchFailure {
            succeeded: 1,
            failed: 1,
            source,
        }) => assert_eq!(source.remote().map(|r| r.status), Some(404)),
        other => panic!("expected partial failure, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn page_inboxes_list_child_pages_only() {
    let transport = MockTransport::scripted(vec![ok(listing(
        vec![
            json!({ "object": "block", "id": id(40).as_str(), "type": "child_page",
                    "has_children": false, "child_page": { "title": "Recipe: soup" } }),
            paragraph_wire(41, "not an item", false),
        ],
        None,
    ))]);

    let items = workspace(transport)
        .list_inbox(&Destination::Page(id(5)))
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, id(40));

    let plan = plan(&items, &parse_rules(&rules_json()).unwrap());
    assert_eq!(plan.moves[0].rule_index, 2);
}
