//! Integration tests for the post-order document walk

mod common;

use ::common::prelude::*;

#[tokio::test]
async fn test_walk_returns_children_then_root() {
    let repository = common::setup_site().await;
    let news = common::node_at(&repository, LIVE_WORKSPACE, "/sites/demo/news").await;

    let nodes = DocumentWalker::new(&repository, LIVE_WORKSPACE, news.clone())
        .nodes(0)
        .await
        .unwrap();

    assert_eq!(nodes.len(), 4);
    assert_eq!(
        common::paths(&nodes),
        vec![
            "/sites/demo/news/item-1",
            "/sites/demo/news/item-2",
            "/sites/demo/news/item-3",
            "/sites/demo/news",
        ]
    );
    assert_eq!(nodes.last(), Some(&news));
}

#[tokio::test]
async fn test_limit_excludes_unfinished_root() {
    let repository = common::setup_site().await;
    let news = common::node_at(&repository, LIVE_WORKSPACE, "/sites/demo/news").await;

    let nodes = DocumentWalker::new(&repository, LIVE_WORKSPACE, news)
        .nodes(2)
        .await
        .unwrap();

    assert_eq!(
        common::paths(&nodes),
        vec!["/sites/demo/news/item-1", "/sites/demo/news/item-2"]
    );
}

#[tokio::test]
async fn test_walk_length_is_bounded_by_limit() {
    let repository = common::setup_site().await;
    let site = common::node_at(&repository, LIVE_WORKSPACE, common::SITE).await;
    let walker = DocumentWalker::new(&repository, LIVE_WORKSPACE, site);

    let total = walker.nodes(0).await.unwrap().len();
    assert_eq!(total, 7);
    for limit in 1..=10 {
        let nodes = walker.nodes(limit).await.unwrap();
        assert_eq!(nodes.len(), limit.min(total), "limit {}", limit);
    }
}

#[tokio::test]
async fn test_every_node_follows_its_descendants() {
    let repository = common::setup_site().await;
    let site = common::node_at(&repository, LIVE_WORKSPACE, common::SITE).await;
    let nodes = DocumentWalker::new(&repository, LIVE_WORKSPACE, site)
        .nodes(0)
        .await
        .unwrap();

    assert_eq!(nodes.last().map(|n| n.path.as_str()), Some(common::SITE));
    for (position, node) in nodes.iter().enumerate() {
        let descendants_after = nodes[position + 1..]
            .iter()
            .filter(|later| later.is_descendant_of(&node.path))
            .count();
        assert_eq!(descendants_after, 0, "{} precedes a descendant", node.path);
    }
}

#[tokio::test]
async fn test_walk_sees_workspace_removals() {
    let repository = common::setup_site().await;
    let item = common::node_at(&repository, LIVE_WORKSPACE, "/sites/demo/news/item-2").await;
    repository
        .remove(common::USER_WORKSPACE, &item)
        .await
        .unwrap();

    let news = common::node_at(&repository, common::USER_WORKSPACE, "/sites/demo/news").await;
    let user_walk = DocumentWalker::new(&repository, common::USER_WORKSPACE, news.clone())
        .nodes(0)
        .await
        .unwrap();
    assert_eq!(user_walk.len(), 3);

    let live_walk = DocumentWalker::new(&repository, LIVE_WORKSPACE, news)
        .nodes(0)
        .await
        .unwrap();
    assert_eq!(live_walk.len(), 4);
}

#[tokio::test]
async fn test_walk_then_remove_empties_subtree() {
    let repository = common::setup_site().await;
    let news = common::node_at(&repository, LIVE_WORKSPACE, "/sites/demo/news").await;

    let nodes = DocumentWalker::new(&repository, LIVE_WORKSPACE, news)
        .nodes(0)
        .await
        .unwrap();
    for node in &nodes {
        repository.remove(LIVE_WORKSPACE, node).await.unwrap();
    }

    let remaining = NodeQuery::new(
        QueryOptions::default()
            .node_types(DOCUMENT_NODE_TYPE)
            .path("/sites/demo/news"),
    );
    assert_eq!(remaining.count(&repository).await.unwrap(), 0);
}
