//! Site-scoped access to a node repository for the page commands.
//!
//! A [`Session`] pins one workspace (a user's or `live`) and the site root
//! below `/sites`, and translates site-relative paths and public URLs into
//! nodes.

use common::node::Node;
use common::query::TypeFilter;
use common::repository::{NodeRepository, RepositoryError};
use common::tree::DocumentTree;
use common::uri::{resolve_url, ResolveError};
use common::walker::DocumentWalker;
use common::workspace::{user_workspace_name, LIVE_WORKSPACE};

use crate::state::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum SessionError<E>
where
    E: std::error::Error + 'static,
{
    #[error("Workspace \"{0}\" is invalid")]
    InvalidWorkspace(String),
    #[error("Could not find any node on path \"{0}\"")]
    NodeNotFound(String),
    #[error("Could not find the live workspace.")]
    LiveWorkspaceMissing,
    #[error("workspace \"{0}\" is live already, nothing to publish")]
    AlreadyLive(String),
    #[error(transparent)]
    Resolve(#[from] ResolveError<E>),
    #[error(transparent)]
    Repository(#[from] RepositoryError<E>),
}

#[derive(Debug)]
pub struct Session<R: NodeRepository> {
    repository: R,
    workspace: String,
    site_path: String,
    document_types: TypeFilter,
}

impl<R: NodeRepository> Session<R> {
    /// Open the workspace of `user` (`live` for none) on the configured site
    pub async fn open(
        repository: R,
        user: Option<&str>,
        config: &AppConfig,
    ) -> Result<Self, SessionError<R::Error>> {
        let workspace = user_workspace_name(user);
        if repository.workspace(&workspace).await?.is_none() {
            return Err(SessionError::InvalidWorkspace(workspace));
        }

        tracing::debug!(workspace, site = %config.site_path(), "session opened");
        Ok(Self {
            repository,
            workspace,
            site_path: config.site_path(),
            document_types: config.document_types.iter().collect(),
        })
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    pub fn site_path(&self) -> &str {
        &self.site_path
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn document_types(&self) -> &TypeFilter {
        &self.document_types
    }

    /// Node at `path` relative to the site root; the empty path is the root
    pub async fn node(&self, path: &str) -> Result<Node, SessionError<R::Error>> {
        let absolute = format!("{}{}", self.site_path, path);
        self.repository
            .node_at_path(&self.workspace, &absolute)
            .await?
            .ok_or_else(|| SessionError::NodeNotFound(path.to_string()))
    }

    /// Document reached by following `url` from the site root
    pub async fn node_for_url(&self, url: &str) -> Result<Node, SessionError<R::Error>> {
        let site = self.node("").await?;
        Ok(resolve_url(
            &self.repository,
            &self.workspace,
            &site,
            url,
            &self.document_types,
        )
        .await?)
    }

    pub async fn document_tree(
        &self,
        root: &Node,
        max_depth: usize,
    ) -> Result<DocumentTree, SessionError<R::Error>> {
        Ok(DocumentTree::build(
            &self.repository,
            &self.workspace,
            root,
            max_depth,
            &self.document_types,
        )
        .await?)
    }

    /// Remove the documents below and including `root`, leaves first, up to
    /// `limit` nodes (0 for all). Returns the removed nodes in removal order.
    pub async fn remove_documents(
        &self,
        root: Node,
        limit: usize,
    ) -> Result<Vec<Node>, SessionError<R::Error>> {
        let nodes = DocumentWalker::new(&self.repository, self.workspace.clone(), root)
            .with_filter(self.document_types.clone())
            .nodes(limit)
            .await?;

        for node in &nodes {
            self.repository.remove(&self.workspace, node).await?;
            tracing::info!(path = %node.path, workspace = %self.workspace, "removed document");
        }
        Ok(nodes)
    }

    /// Publish the session's workspace into `live`
    pub async fn publish(&self) -> Result<u64, SessionError<R::Error>> {
        if self.workspace == LIVE_WORKSPACE {
            return Err(SessionError::AlreadyLive(self.workspace.clone()));
        }
        if self.repository.workspace(LIVE_WORKSPACE).await?.is_none() {
            return Err(SessionError::LiveWorkspaceMissing);
        }
        Ok(self
            .repository
            .publish(&self.workspace, LIVE_WORKSPACE)
            .await?)
    }
}
