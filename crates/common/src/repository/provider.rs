use std::fmt::{Debug, Display};

use async_trait::async_trait;

use crate::node::Node;
use crate::query::{ConstraintSet, ListQuery, TypeFilter};
use crate::workspace::Workspace;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError<T> {
    /// Failure of the underlying store, passed through untouched
    #[error("unhandled node repository provider error: {0}")]
    Provider(#[from] T),
    #[error("workspace \"{0}\" does not exist")]
    UnknownWorkspace(String),
    #[error("workspace \"{0}\" already exists")]
    WorkspaceExists(String),
    /// A record already occupies the path in that workspace
    #[error("a node already exists at {path} in workspace {workspace}")]
    PathConflict { workspace: String, path: String },
    /// A record with the identifier already exists in that workspace
    #[error("node {identifier} already exists in workspace {workspace}")]
    IdentifierConflict {
        workspace: String,
        identifier: String,
    },
    /// Inserting below a path that does not resolve to a node
    #[error("parent of {0} does not exist")]
    MissingParent(String),
}

/// Storage of workspaced node records.
///
/// Raw operations (`query`, `count`, `delete_matching`) act on records as
/// stored, scoped only by their constraints. Tree reads (`node_at_path`,
/// `child_nodes`) see a workspace the way an editor does: its own records
/// laid over those of its base workspaces, with removals hidden.
///
/// No method retries; provider failures surface as
/// [`RepositoryError::Provider`].
#[async_trait]
pub trait NodeRepository: Send + Sync + Debug + Clone + 'static {
    type Error: std::error::Error + Display + Debug + Send + Sync + 'static;

    /// Records matching the query's constraints, in its order, up to its limit
    async fn query(&self, query: &ListQuery) -> Result<Vec<Node>, RepositoryError<Self::Error>>;

    async fn count(&self, constraints: &ConstraintSet)
        -> Result<u64, RepositoryError<Self::Error>>;

    /// Delete every matching record in a single operation
    ///
    /// # Returns
    /// * `Ok(u64)` - The number of records removed
    async fn delete_matching(
        &self,
        constraints: &ConstraintSet,
    ) -> Result<u64, RepositoryError<Self::Error>>;

    /// The node visible at `path` in `workspace`
    async fn node_at_path(
        &self,
        workspace: &str,
        path: &str,
    ) -> Result<Option<Node>, RepositoryError<Self::Error>>;

    /// Direct children of `parent` visible in `workspace`, restricted to
    /// `filter`, ordered by sorting index then path
    async fn child_nodes(
        &self,
        workspace: &str,
        parent: &Node,
        filter: &TypeFilter,
    ) -> Result<Vec<Node>, RepositoryError<Self::Error>>;

    /// Store a new record
    ///
    /// Should fail with the following errors to be considered
    ///  correct:
    /// * `Err(RepositoryError::UnknownWorkspace)` - The node's workspace does not exist
    /// * `Err(RepositoryError::PathConflict)` - The workspace already has a record at the path
    /// * `Err(RepositoryError::IdentifierConflict)` - The workspace already has a record with the identifier
    /// * `Err(RepositoryError::MissingParent)` - The parent path is not visible in the workspace
    async fn insert(&self, node: &Node) -> Result<(), RepositoryError<Self::Error>>;

    /// Store a batch of new records, all or nothing.
    ///
    /// Records are checked in order as [`insert`](Self::insert) does, each
    /// against the store plus the records before it, so a parent may come
    /// earlier in the same batch. On the first error nothing is stored.
    async fn insert_all(&self, nodes: &[Node]) -> Result<(), RepositoryError<Self::Error>>;

    /// Remove a single node as seen from `workspace`.
    ///
    /// In a workspace without base the record is deleted. Anywhere else a
    /// removal marker is recorded, to be applied by [`publish`](Self::publish).
    async fn remove(&self, workspace: &str, node: &Node)
        -> Result<(), RepositoryError<Self::Error>>;

    async fn workspace(&self, name: &str)
        -> Result<Option<Workspace>, RepositoryError<Self::Error>>;

    async fn workspaces(&self) -> Result<Vec<Workspace>, RepositoryError<Self::Error>>;

    async fn create_workspace(
        &self,
        workspace: &Workspace,
    ) -> Result<(), RepositoryError<Self::Error>>;

    /// Apply the pending changes of `source` to `target` and empty `source`.
    ///
    /// All or nothing: when a change would move a node onto a path held by
    /// another node of `target`, nothing is applied and
    /// `Err(RepositoryError::PathConflict)` is returned.
    ///
    /// # Returns
    /// * `Ok(u64)` - The number of changes applied
    async fn publish(&self, source: &str, target: &str)
        -> Result<u64, RepositoryError<Self::Error>>;

    /// Names of `name` and all of its base workspaces, nearest first
    async fn workspace_chain(
        &self,
        name: &str,
    ) -> Result<Vec<String>, RepositoryError<Self::Error>> {
        let mut chain: Vec<String> = Vec::new();
        let mut next = Some(name.to_string());
        while let Some(current) = next {
            if chain.contains(&current) {
                break;
            }
            let workspace = self
                .workspace(&current)
                .await?
                .ok_or_else(|| RepositoryError::UnknownWorkspace(current.clone()))?;
            next = workspace.base_workspace;
            chain.push(current);
        }
        Ok(chain)
    }
}
