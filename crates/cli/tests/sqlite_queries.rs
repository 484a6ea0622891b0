//! Query, count and bulk delete against the SQLite repository

mod common;

use ::common::prelude::*;

use crate::common::{paths, setup_site_db, setup_test_db, SITE};

#[tokio::test]
async fn test_migration_seeds_live_workspace() {
    let db = setup_test_db().await;

    let workspaces = db.workspaces().await.unwrap();
    assert_eq!(workspaces.len(), 1);
    assert_eq!(workspaces[0].name, LIVE_WORKSPACE);
    assert!(workspaces[0].base_workspace.is_none());
}

#[tokio::test]
async fn test_path_and_type_constraints() {
    let db = setup_site_db().await;

    let query = NodeQuery::new(
        QueryOptions::default()
            .path("/sites/demo/news")
            .node_types(DOCUMENT_NODE_TYPE),
    );
    let nodes = query.fetch(&db).await.unwrap();

    assert_eq!(
        paths(&nodes),
        vec![
            "/sites/demo/news",
            "/sites/demo/news/item-1",
            "/sites/demo/news/item-2",
        ]
    );
    assert_eq!(query.count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn test_search_ignores_case() {
    let db = setup_site_db().await;

    for term in ["münchen", "MÜNCHEN", "o'brien"] {
        let nodes = NodeQuery::new(QueryOptions::default().search_term(term))
            .fetch(&db)
            .await
            .unwrap();
        assert_eq!(paths(&nodes), vec!["/sites/demo/news/main/text"], "{}", term);
    }
}

#[tokio::test]
async fn test_search_folds_case_in_stored_column() {
    let db = setup_site_db().await;
    let greek = Node::new("greek", "/sites/demo/greek", "Neos.NodeTypes:Text", LIVE_WORKSPACE)
        .with_property("text", "ΟΔΟΣΑ");
    let street = Node::new("street", "/sites/demo/street", "Neos.NodeTypes:Text", LIVE_WORKSPACE)
        .with_property("text", "Hauptstraße");
    db.insert(&greek).await.unwrap();
    db.insert(&street).await.unwrap();

    let greek_hits = NodeQuery::new(QueryOptions::default().search_term("ΟΔΟΣ"))
        .fetch(&db)
        .await
        .unwrap();
    assert_eq!(paths(&greek_hits), vec!["/sites/demo/greek"]);

    let street_hits = NodeQuery::new(QueryOptions::default().search_term("STRASSE"))
        .fetch(&db)
        .await
        .unwrap();
    assert_eq!(paths(&street_hits), vec!["/sites/demo/street"]);
}

#[tokio::test]
async fn test_like_wildcards_match_literally() {
    let db = setup_site_db().await;

    let by_search = NodeQuery::new(QueryOptions::default().search_term("%"));
    assert_eq!(by_search.count(&db).await.unwrap(), 0);

    let by_path = NodeQuery::new(QueryOptions::default().path("/sites/demo/new_"));
    assert_eq!(by_path.count(&db).await.unwrap(), 0);

    let by_id = {
        let mut query = NodeQuery::default();
        query.add_identifier_constraint("news_");
        query
    };
    assert_eq!(by_id.count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_path_prefix_has_no_boundary() {
    let db = setup_site_db().await;

    let nodes = NodeQuery::new(QueryOptions::default().path("/sites/demo/news/item"))
        .fetch(&db)
        .await
        .unwrap();
    assert_eq!(nodes.len(), 2);
}

#[tokio::test]
async fn test_order_and_limit() {
    let db = setup_site_db().await;

    let mut query = NodeQuery::new(QueryOptions::default().node_types(DOCUMENT_NODE_TYPE));
    query
        .set_order_by(OrderField::Path, OrderDirection::Desc)
        .set_limit(Some(2));
    let nodes = query.fetch(&db).await.unwrap();

    assert_eq!(
        paths(&nodes),
        vec!["/sites/demo/news/item-2", "/sites/demo/news/item-1"]
    );
    // the limit only applies to listings
    assert_eq!(query.count(&db).await.unwrap(), 5);
}

#[tokio::test]
async fn test_identifier_prefix() {
    let db = setup_site_db().await;

    let mut query = NodeQuery::default();
    query.add_identifier_constraint("news-");
    assert_eq!(query.count(&db).await.unwrap(), 4);
}

#[tokio::test]
async fn test_queries_default_to_live() {
    let db = setup_site_db().await;
    let edited = Node::new("page-about", "/sites/demo/about", DOCUMENT_NODE_TYPE, "user-admin")
        .with_property(TITLE_PROPERTY, "Changed");
    db.insert(&edited).await.unwrap();

    let live = NodeQuery::new(QueryOptions::default().search_term("changed"));
    assert_eq!(live.count(&db).await.unwrap(), 0);

    let user = NodeQuery::new(
        QueryOptions::default()
            .search_term("changed")
            .workspace("user-admin"),
    );
    assert_eq!(user.count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_all_is_scoped() {
    let db = setup_site_db().await;

    let query = NodeQuery::new(
        QueryOptions::default()
            .path(SITE)
            .node_types("Neos.NodeTypes:Text"),
    );
    assert_eq!(query.delete_all(&db).await.unwrap(), 1);
    assert_eq!(query.count(&db).await.unwrap(), 0);

    let remaining = NodeQuery::default().count(&db).await.unwrap();
    assert_eq!(remaining, 7);
}
