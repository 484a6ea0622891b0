use crate::node::{Node, URI_PATH_SEGMENT_PROPERTY};
use crate::query::TypeFilter;
use crate::repository::{NodeRepository, RepositoryError};

#[derive(thiserror::Error, Debug)]
pub enum ResolveError<T> {
    #[error(transparent)]
    Repository(#[from] RepositoryError<T>),
    #[error("could not find any child document for URL path segment \"{segment}\" on \"{parent}\"")]
    SegmentNotFound { segment: String, parent: String },
}

/// Follow the segments of `url` from `site_root` down to a document.
///
/// Each non-empty segment selects the child (restricted to `filter`) whose
/// `uriPathSegment` property equals it. When siblings share a segment the
/// last one in child order wins. An empty URL resolves to the site root.
pub async fn resolve_url<R: NodeRepository>(
    repository: &R,
    workspace: &str,
    site_root: &Node,
    url: &str,
    filter: &TypeFilter,
) -> Result<Node, ResolveError<R::Error>> {
    let mut document = site_root.clone();
    for segment in url.split('/').filter(|s| !s.is_empty()) {
        let found = repository
            .child_nodes(workspace, &document, filter)
            .await?
            .into_iter()
            .filter(|child| child.string_property(URI_PATH_SEGMENT_PROPERTY) == Some(segment))
            .last();

        document = found.ok_or_else(|| ResolveError::SegmentNotFound {
            segment: segment.to_string(),
            parent: document.path.clone(),
        })?;
    }

    tracing::debug!(url, path = %document.path, "resolved url");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryNodeRepository;
    use crate::walker::DOCUMENT_NODE_TYPE;
    use crate::workspace::LIVE_WORKSPACE;

    async fn site() -> (MemoryNodeRepository, Node) {
        let repository = MemoryNodeRepository::new();
        repository
            .insert(&Node::new("sites", "/sites", "Neos.Neos:Sites", LIVE_WORKSPACE))
            .await
            .unwrap();
        for (path, segment) in [
            ("/sites/demo", "home"),
            ("/sites/demo/news", "news"),
            ("/sites/demo/news/node-1", "hello-world"),
            ("/sites/demo/news/node-2", "hello-world"),
        ] {
            let node = Node::new(path, path, DOCUMENT_NODE_TYPE, LIVE_WORKSPACE)
                .with_property(URI_PATH_SEGMENT_PROPERTY, segment);
            repository.insert(&node).await.unwrap();
        }
        let root = repository
            .node_at_path(LIVE_WORKSPACE, "/sites/demo")
            .await
            .unwrap()
            .unwrap();
        (repository, root)
    }

    #[tokio::test]
    async fn test_resolves_nested_url() {
        let (repository, root) = site().await;
        let filter = TypeFilter::parse(DOCUMENT_NODE_TYPE);
        let node = resolve_url(&repository, LIVE_WORKSPACE, &root, "/news/", &filter)
            .await
            .unwrap();
        assert_eq!(node.path, "/sites/demo/news");
    }

    #[tokio::test]
    async fn test_empty_url_is_root() {
        let (repository, root) = site().await;
        let filter = TypeFilter::parse(DOCUMENT_NODE_TYPE);
        let node = resolve_url(&repository, LIVE_WORKSPACE, &root, "", &filter)
            .await
            .unwrap();
        assert_eq!(node, root);
    }

    #[tokio::test]
    async fn test_duplicate_segment_takes_last_child() {
        let (repository, root) = site().await;
        let filter = TypeFilter::parse(DOCUMENT_NODE_TYPE);
        let node = resolve_url(&repository, LIVE_WORKSPACE, &root, "news/hello-world", &filter)
            .await
            .unwrap();
        assert_eq!(node.path, "/sites/demo/news/node-2");
    }

    #[tokio::test]
    async fn test_missing_segment_names_parent() {
        let (repository, root) = site().await;
        let filter = TypeFilter::parse(DOCUMENT_NODE_TYPE);
        let result = resolve_url(&repository, LIVE_WORKSPACE, &root, "/news/nope", &filter).await;
        match result {
            Err(ResolveError::SegmentNotFound { segment, parent }) => {
                assert_eq!(segment, "nope");
                assert_eq!(parent, "/sites/demo/news");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
