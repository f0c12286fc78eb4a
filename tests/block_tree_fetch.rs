// tests/block_tree_fetch.rs
//! Paginated, recursive block retrieval and the read path.

mod common;

use common::*;
use notionmd::api::ApiRequest;
use notionmd::{Block, BlockTreeFetcher};
use pretty_assertions::assert_eq;
use serde_json::json;

fn children_path(n: u32) -> String {
    format!("blocks/{}/children", id(n))
}

fn child_page_wire(n: u32, title: &str) -> serde_json::Value {
    json!({
        "object": "block",
        "id": id(n).as_str(),
        "type": "child_page",
        "has_children": true,
        "child_page": { "title": title }
    })
}

/// Root 1 has two pages of children: [2 (nested), 3] then [4 (child page)].
/// Block 2 has one child, 5.
fn route(request: &ApiRequest) -> Reply {
    let cursor = request.query_value("start_cursor");
    match (request.path.as_str(), cursor) {
        (p, None) if p == children_path(1) => ok(listing(
            vec![paragraph_wire(2, "first", true), paragraph_wire(3, "second", false)],
            Some("page-2"),
        )),
        (p, Some("page-2")) if p == children_path(1) => {
            ok(listing(vec![child_page_wire(4, "Sub page")], None))
        }
        (p, None) if p == children_path(2) => {
            ok(listing(vec![paragraph_wire(5, "nested", false)], None))
        }
        _ => error(404, "object_not_found", "no such route"),
    }
}

#[tokio::test(start_paused = true)]
async fn children_are_concatenated_in_cursor_order() {
    let transport = MockTransport::routed(route);
    let fetcher = BlockTreeFetcher::new(client(transport.clone()));

    let blocks = fetcher.get_children(&id(1)).await.unwrap();

    let ids: Vec<_> = blocks.iter().map(|b| b.id().cloned().unwrap()).collect();
    assert_eq!(ids, vec![id(2), id(3), id(4)]);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].query_value("page_size"), Some("100"));
    assert_eq!(requests[1].query_value("start_cursor"), Some("page-2"));
}

#[tokio::test(start_paused = true)]
async fn tree_is_built_bottom_up_and_stops_at_child_pages() {
    let transport = MockTransport::routed(route);
    let fetcher = BlockTreeFetcher::new(client(transport.clone()));

    let tree = fetcher.get_tree(&id(1)).await.unwrap();

    assert_eq!(tree.len(), 3);
    assert_eq!(tree[0].children().len(), 1);
    assert_eq!(tree[0].children()[0].id(), Some(&id(5)));
    assert!(tree[1].children().is_empty());
    assert!(matches!(tree[2], Block::ChildPage(_)));
    assert!(tree[2].children().is_empty());

    let paths: Vec<String> = transport.requests().into_iter().map(|r| r.path).collect();
    assert!(!paths.contains(&children_path(4)));
}

#[tokio::test(start_paused = true)]
async fn depth_limit_leaves_deeper_children_out() {
    let transport = MockTransport::routed(route);
    let fetcher = BlockTreeFetcher::new(client(transport.clone())).with_max_depth(1);

    let tree = fetcher.get_tree(&id(1)).await.unwrap();

    assert!(tree[0].has_children());
    assert!(tree[0].children().is_empty());
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn any_failure_aborts_the_fetch() {
    let transport = MockTransport::routed(|request| {
        if request.path == children_path(1) {
            ok(listing(vec![paragraph_wire(9, "broken parent", true)], None))
        } else {
            error(403, "restricted_resource", "no access")
        }
    });

    let err = BlockTreeFetcher::new(client(transport))
        .get_tree(&id(1))
        .await
        .unwrap_err();
    assert_eq!(err.remote().map(|r| r.status), Some(403));
}

#[tokio::test(start_paused = true)]
async fn read_markdown_renders_the_tree() {
    let transport = MockTransport::routed(route);

    let markdown = workspace(transport).read_markdown(&id(1)).await.unwrap();

    assert_eq!(
        markdown,
        format!(
            "first\n  nested\n\nsecond\n\n- 📄 [Sub page](https://www.notion.so/{})\n",
            id(4).to_compact()
        )
    );
}
