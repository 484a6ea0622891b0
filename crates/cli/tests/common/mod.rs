//! Shared fixtures for the SQLite repository tests
#![allow(dead_code)]

use common::prelude::*;
use crlib_cli::Database;

pub const SITE: &str = "/sites/demo";
pub const USER_WORKSPACE: &str = "user-admin";

/// Create an in-memory, migrated test database
pub async fn setup_test_db() -> Database {
    let db_url = url::Url::parse("sqlite::memory:").unwrap();
    Database::connect(&db_url).await.unwrap()
}

/// A migrated database holding a small `live` site and an empty
/// `user-admin` workspace on top of it
pub async fn setup_site_db() -> Database {
    let db = setup_test_db().await;
    let document = |id: &str, path: &str, segment: &str, index: i64| {
        Node::new(id, path, DOCUMENT_NODE_TYPE, LIVE_WORKSPACE)
            .with_property(URI_PATH_SEGMENT_PROPERTY, segment)
            .with_property(TITLE_PROPERTY, segment.to_uppercase())
            .with_sorting_index(index)
    };

    let nodes = vec![
        Node::new("sites", "/sites", "Neos.Neos:Sites", LIVE_WORKSPACE),
        document("demo", SITE, "home", 0),
        document("page-news", "/sites/demo/news", "news", 1),
        document("page-about", "/sites/demo/about", "about", 2),
        document("news-1", "/sites/demo/news/item-1", "item-1", 1),
        document("news-2", "/sites/demo/news/item-2", "item-2", 2),
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
    ];
    for node in &nodes {
        db.insert(node).await.unwrap();
    }

    db.create_workspace(&Workspace::new(
        USER_WORKSPACE,
        Some(LIVE_WORKSPACE.to_string()),
    ))
    .await
    .unwrap();
    db
}

pub fn paths(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|node| node.path.as_str()).collect()
}
