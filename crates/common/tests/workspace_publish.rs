//! Integration tests for user workspaces, publishing, URL resolution and
//! the document tree

mod common;

use ::common::prelude::*;

#[tokio::test]
async fn test_publish_applies_removals_and_edits() {
    let repository = common::setup_site().await;
    let about = common::node_at(&repository, common::USER_WORKSPACE, "/sites/demo/about").await;
    repository
        .remove(common::USER_WORKSPACE, &about)
        .await
        .unwrap();

    let mut home = common::node_at(&repository, common::USER_WORKSPACE, "/sites/demo/home").await;
    home.workspace = common::USER_WORKSPACE.to_string();
    home.properties
        .insert(TITLE_PROPERTY.to_string(), "Welcome".into());
    repository.insert(&home).await.unwrap();

    // nothing reaches live before publishing
    let live_about = repository
        .node_at_path(LIVE_WORKSPACE, "/sites/demo/about")
        .await
        .unwrap();
    assert!(live_about.is_some());

    let changes = repository
        .publish(common::USER_WORKSPACE, LIVE_WORKSPACE)
        .await
        .unwrap();
    assert_eq!(changes, 2);

    let live_about = repository
        .node_at_path(LIVE_WORKSPACE, "/sites/demo/about")
        .await
        .unwrap();
    assert!(live_about.is_none());

    let live_home = common::node_at(&repository, LIVE_WORKSPACE, "/sites/demo/home").await;
    assert_eq!(live_home.string_property(TITLE_PROPERTY), Some("Welcome"));

    let pending = NodeQuery::new(QueryOptions::default().workspace(common::USER_WORKSPACE));
    assert_eq!(pending.count(&repository).await.unwrap(), 0);
}

#[tokio::test]
async fn test_publish_unknown_workspace() {
    let repository = common::setup_site().await;
    let result = repository.publish("user-nobody", LIVE_WORKSPACE).await;
    assert_eq!(
        result,
        Err(RepositoryError::UnknownWorkspace("user-nobody".to_string()))
    );
}

#[test]
fn test_user_workspace_names() {
    assert_eq!(user_workspace_name(Some("admin")), "user-admin");
    assert_eq!(user_workspace_name(None), LIVE_WORKSPACE);
    assert_eq!(user_workspace_name(Some("")), LIVE_WORKSPACE);
}

#[tokio::test]
async fn test_resolve_url_from_site_root() {
    let repository = common::setup_site().await;
    let site = common::node_at(&repository, LIVE_WORKSPACE, common::SITE).await;
    let filter = TypeFilter::parse(DOCUMENT_NODE_TYPE);

    let item = resolve_url(&repository, LIVE_WORKSPACE, &site, "/news/item-3", &filter)
        .await
        .unwrap();
    assert_eq!(item.path, "/sites/demo/news/item-3");

    let missing = resolve_url(&repository, LIVE_WORKSPACE, &site, "/news/main", &filter).await;
    assert!(matches!(
        missing,
        Err(ResolveError::SegmentNotFound { ref segment, .. }) if segment == "main"
    ));
}

#[tokio::test]
async fn test_document_tree_of_site() {
    let repository = common::setup_site().await;
    let site = common::node_at(&repository, LIVE_WORKSPACE, common::SITE).await;
    let filter = TypeFilter::parse(DOCUMENT_NODE_TYPE);

    let tree = DocumentTree::build(&repository, LIVE_WORKSPACE, &site, 1, &filter)
        .await
        .unwrap();
    let urls: Vec<&str> = tree.rows().iter().map(|row| row.url_path.as_str()).collect();
    assert_eq!(urls, vec!["", "/start", "/news", "/about"]);

    let deep = DocumentTree::build(&repository, LIVE_WORKSPACE, &site, 5, &filter)
        .await
        .unwrap();
    assert_eq!(deep.len(), 7);
    assert_eq!(deep.rows()[3].url_path, "/news/item-1");
    assert_eq!(deep.rows()[3].path, "/news/item-1");
}
