use crate::node::Node;
use crate::query::TypeFilter;
use crate::repository::{NodeRepository, RepositoryError};

/// Node type every navigable page derives from
pub const DOCUMENT_NODE_TYPE: &str = "Neos.Neos:Document";

/// Post-order walk over the document nodes below a root.
///
/// The walker only reads child relationships; it never changes the
/// repository. Errors of the child lookup are returned as they are.
#[derive(Debug)]
pub struct DocumentWalker<'a, R: NodeRepository> {
    repository: &'a R,
    workspace: String,
    root: Node,
    filter: TypeFilter,
}

/// A node whose children are being visited
struct Frame {
    node: Node,
    children: std::vec::IntoIter<Node>,
}

impl<'a, R: NodeRepository> DocumentWalker<'a, R> {
    /// Walk `root` as seen from `workspace`, following children of type
    /// [`DOCUMENT_NODE_TYPE`].
    pub fn new(repository: &'a R, workspace: impl Into<String>, root: Node) -> Self {
        Self {
            repository,
            workspace: workspace.into(),
            root,
            filter: TypeFilter::parse(DOCUMENT_NODE_TYPE),
        }
    }

    /// Follow children of these types instead
    pub fn with_filter(mut self, filter: TypeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// All nodes of the walk, leaves first, the root last.
    ///
    /// Every node comes after all of its descendants, siblings keep the
    /// repository's child order. With a non-zero `limit` the walk stops as
    /// soon as that many nodes were collected: ancestors still waiting for
    /// their subtree are left out and nothing already collected is dropped.
    pub async fn nodes(&self, limit: usize) -> Result<Vec<Node>, RepositoryError<R::Error>> {
        let reached = |nodes: &Vec<Node>| limit > 0 && nodes.len() >= limit;

        let mut nodes = Vec::new();
        let mut stack = vec![self.frame(self.root.clone()).await?];

        while let Some(frame) = stack.last_mut() {
            if reached(&nodes) {
                break;
            }
            match frame.children.next() {
                Some(child) => {
                    let frame = self.frame(child).await?;
                    stack.push(frame);
                }
                None => {
                    if let Some(done) = stack.pop() {
                        nodes.push(done.node);
                    }
                }
            }
        }

        tracing::debug!(
            root = %self.root.path,
            limit,
            visited = nodes.len(),
            "document walk finished"
        );
        Ok(nodes)
    }

    async fn frame(&self, node: Node) -> Result<Frame, RepositoryError<R::Error>> {
        let children = self
            .repository
            .child_nodes(&self.workspace, &node, &self.filter)
            .await?;
        Ok(Frame {
            node,
            children: children.into_iter(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryNodeRepository;
    use crate::workspace::LIVE_WORKSPACE;

    async fn tree() -> (MemoryNodeRepository, Node) {
        let repository = MemoryNodeRepository::new();
        let nodes = [
            ("/sites", "Neos.Neos:Sites", 0),
            ("/sites/demo", DOCUMENT_NODE_TYPE, 0),
            ("/sites/demo/home", DOCUMENT_NODE_TYPE, 1),
            ("/sites/demo/news", DOCUMENT_NODE_TYPE, 2),
            ("/sites/demo/about", DOCUMENT_NODE_TYPE, 3),
            ("/sites/demo/news/one", DOCUMENT_NODE_TYPE, 1),
            ("/sites/demo/news/two", DOCUMENT_NODE_TYPE, 2),
            ("/sites/demo/news/three", DOCUMENT_NODE_TYPE, 3),
            ("/sites/demo/news/main", "Neos.Neos:ContentCollection", 0),
            ("/sites/demo/news/main/text", "Neos.NodeTypes:Text", 0),
        ];
        for (path, node_type, index) in nodes {
            let node = Node::new(path, path, node_type, LIVE_WORKSPACE).with_sorting_index(index);
            repository.insert(&node).await.unwrap();
        }
        let news = repository
            .node_at_path(LIVE_WORKSPACE, "/sites/demo/news")
            .await
            .unwrap()
            .unwrap();
        (repository, news)
    }

    fn paths(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.path.as_str()).collect()
    }

    #[tokio::test]
    async fn test_unbounded_walk_ends_with_root() {
        let (repository, news) = tree().await;
        let walker = DocumentWalker::new(&repository, LIVE_WORKSPACE, news);
        let nodes = walker.nodes(0).await.unwrap();
        assert_eq!(
            paths(&nodes),
            vec![
                "/sites/demo/news/one",
                "/sites/demo/news/two",
                "/sites/demo/news/three",
                "/sites/demo/news",
            ]
        );
    }

    #[tokio::test]
    async fn test_limit_stops_before_parent() {
        let (repository, news) = tree().await;
        let walker = DocumentWalker::new(&repository, LIVE_WORKSPACE, news);
        let nodes = walker.nodes(2).await.unwrap();
        assert_eq!(
            paths(&nodes),
            vec!["/sites/demo/news/one", "/sites/demo/news/two"]
        );
    }

    #[tokio::test]
    async fn test_descendants_precede_ancestors() {
        let (repository, _) = tree().await;
        let site = repository
            .node_at_path(LIVE_WORKSPACE, "/sites/demo")
            .await
            .unwrap()
            .unwrap();
        let nodes = DocumentWalker::new(&repository, LIVE_WORKSPACE, site)
            .nodes(0)
            .await
            .unwrap();

        assert_eq!(nodes.len(), 7);
        assert_eq!(nodes.last().map(|n| n.path.as_str()), Some("/sites/demo"));
        for (i, node) in nodes.iter().enumerate() {
            for later in &nodes[i + 1..] {
                assert!(
                    !later.is_descendant_of(&node.path),
                    "{} came after its ancestor {}",
                    later.path,
                    node.path
                );
            }
        }
    }

    #[tokio::test]
    async fn test_limit_larger_than_tree() {
        let (repository, news) = tree().await;
        let nodes = DocumentWalker::new(&repository, LIVE_WORKSPACE, news)
            .nodes(50)
            .await
            .unwrap();
        assert_eq!(nodes.len(), 4);
    }

    #[tokio::test]
    async fn test_leaf_root() {
        let (repository, _) = tree().await;
        let leaf = repository
            .node_at_path(LIVE_WORKSPACE, "/sites/demo/about")
            .await
            .unwrap()
            .unwrap();
        let nodes = DocumentWalker::new(&repository, LIVE_WORKSPACE, leaf.clone())
            .nodes(1)
            .await
            .unwrap();
        assert_eq!(nodes, vec![leaf]);
    }

    #[tokio::test]
    async fn test_custom_filter_includes_content() {
        let (repository, news) = tree().await;
        let nodes = DocumentWalker::new(&repository, LIVE_WORKSPACE, news)
            .with_filter(TypeFilter::default())
            .nodes(0)
            .await
            .unwrap();
        assert_eq!(nodes.len(), 6);
        assert_eq!(nodes[0].path, "/sites/demo/news/main/text");
    }

    #[tokio::test]
    async fn test_lookup_errors_propagate() {
        let (repository, news) = tree().await;
        let walker = DocumentWalker::new(&repository, "missing", news);
        let result = walker.nodes(0).await;
        assert!(matches!(result, Err(RepositoryError::UnknownWorkspace(_))));
    }
}
