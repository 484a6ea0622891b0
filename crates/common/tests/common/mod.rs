//! Shared fixtures for node repository integration tests
#![allow(dead_code)]

use common::prelude::*;

pub const SITE: &str = "/sites/demo";
pub const USER_WORKSPACE: &str = "user-admin";

/// A `live` site tree plus an empty `user-admin` workspace:
///
/// ```text
/// /sites
///   /demo            (Document, home)
///     /home          (Document)
///     /news          (Document)
///       /item-1..3   (Document)
///       /main        (ContentCollection)
///         /text      (Text, "Interview with O'Brien in MÜNCHEN")
///     /about         (Document)
/// ```
pub async fn setup_site() -> MemoryNodeRepository {
    let repository = MemoryNodeRepository::new();
    for node in site_nodes() {
        repository.insert(&node).await.unwrap();
    }
    repository
        .create_workspace(&Workspace::new(
            USER_WORKSPACE,
            Some(LIVE_WORKSPACE.to_string()),
        ))
        .await
        .unwrap();
    repository
}

pub fn site_nodes() -> Vec<Node> {
    let document = |id: &str, path: &str, segment: &str, index: i64| {
        Node::new(id, path, DOCUMENT_NODE_TYPE, LIVE_WORKSPACE)
            .with_property(URI_PATH_SEGMENT_PROPERTY, segment)
            .with_property(TITLE_PROPERTY, segment.to_uppercase())
            .with_sorting_index(index)
    };

    vec![
        Node::new("sites", "/sites", "Neos.Neos:Sites", LIVE_WORKSPACE),
        document("demo", SITE, "home", 0),
        document("page-home", "/sites/demo/home", "start", 1),
        document("page-news", "/sites/demo/news", "news", 2),
        document("page-about", "/sites/demo/about", "about", 3),
        document("news-1", "/sites/demo/news/item-1", "item-1", 1),
        document("news-2", "/sites/demo/news/item-2", "item-2", 2),
        document("news-3", "/sites/demo/news/item-3", "item-3", 3),
        Node::new(
            "news-main",
            "/sites/demo/news/main",
            "Neos.Neos:ContentCollection",
            LIVE_WORKSPACE,
        ),
        Node::new(
            "news-text",
            "/sites/demo/news/main/text",
            "Neos.NodeTypes:Text",
            LIVE_WORKSPACE,
        )
        .with_property("text", "Interview with O'Brien in MÜNCHEN"),
    ]
}

pub async fn node_at(repository: &MemoryNodeRepository, workspace: &str, path: &str) -> Node {
    repository
        .node_at_path(workspace, path)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("no node at {}", path))
}

pub fn paths(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|node| node.path.as_str()).collect()
}
