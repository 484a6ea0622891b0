use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::provider::{NodeRepository, RepositoryError};
use crate::node::{Node, ROOT_PATH};
use crate::query::{ConstraintSet, ListQuery, TypeFilter};
use crate::workspace::{overlay, sort_siblings, Workspace};

/// In-memory node repository
#[derive(Debug, Clone)]
pub struct MemoryNodeRepository {
    inner: Arc<RwLock<MemoryNodeRepositoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryNodeRepositoryInner {
    workspaces: BTreeMap<String, Workspace>,
    /// All records of all workspaces, in insertion order
    nodes: Vec<Node>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryNodeRepositoryError {
    #[error("memory repository error: {0}")]
    Internal(String),
}

type Result<T> = std::result::Result<T, RepositoryError<MemoryNodeRepositoryError>>;

impl MemoryNodeRepository {
    /// A repository holding only the `live` workspace
    pub fn new() -> Self {
        let live = Workspace::live();
        let inner = MemoryNodeRepositoryInner {
            workspaces: BTreeMap::from([(live.name.clone(), live)]),
            nodes: Vec::new(),
        };
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryNodeRepositoryInner>> {
        self.inner.read().map_err(|e| {
            RepositoryError::Provider(MemoryNodeRepositoryError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryNodeRepositoryInner>> {
        self.inner.write().map_err(|e| {
            RepositoryError::Provider(MemoryNodeRepositoryError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })
    }

    /// Records visible in `chain` that satisfy `predicate`
    fn visible<F>(&self, chain: &[String], predicate: F) -> Result<Vec<Node>>
    where
        F: Fn(&Node) -> bool,
    {
        Ok(visible_in(&self.read()?.nodes, chain, predicate))
    }
}

impl MemoryNodeRepositoryInner {
    /// Same as [`NodeRepository::workspace_chain`], for callers holding the lock
    fn chain(&self, name: &str) -> Result<Vec<String>> {
        let mut chain: Vec<String> = Vec::new();
        let mut next = Some(name.to_string());
        while let Some(current) = next {
            if chain.contains(&current) {
                break;
            }
            let workspace = self
                .workspaces
                .get(&current)
                .ok_or_else(|| RepositoryError::UnknownWorkspace(current.clone()))?;
            next = workspace.base_workspace.clone();
            chain.push(current);
        }
        Ok(chain)
    }
}

fn visible_in<F>(nodes: &[Node], chain: &[String], predicate: F) -> Vec<Node>
where
    F: Fn(&Node) -> bool,
{
    let records = nodes
        .iter()
        .filter(|node| chain.contains(&node.workspace) && predicate(node))
        .cloned()
        .collect();
    overlay(chain, records)
}

impl Default for MemoryNodeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeRepository for MemoryNodeRepository {
    type Error = MemoryNodeRepositoryError;

    async fn query(&self, query: &ListQuery) -> Result<Vec<Node>> {
        let inner = self.read()?;
        let mut nodes: Vec<Node> = inner
            .nodes
            .iter()
            .filter(|node| query.constraints.matches(node))
            .cloned()
            .collect();
        nodes.sort_by(|a, b| query.order_by.compare(a, b));
        if let Some(limit) = query.limit {
            nodes.truncate(limit as usize);
        }
        Ok(nodes)
    }

    async fn count(&self, constraints: &ConstraintSet) -> Result<u64> {
        let inner = self.read()?;
        Ok(inner
            .nodes
            .iter()
            .filter(|node| constraints.matches(node))
            .count() as u64)
    }

    async fn delete_matching(&self, constraints: &ConstraintSet) -> Result<u64> {
        let mut inner = self.write()?;
        let before = inner.nodes.len();
        inner.nodes.retain(|node| !constraints.matches(node));
        Ok((before - inner.nodes.len()) as u64)
    }

    async fn node_at_path(&self, workspace: &str, path: &str) -> Result<Option<Node>> {
        let chain = self.workspace_chain(workspace).await?;
        Ok(self.visible(&chain, |node| node.path == path)?.pop())
    }

    async fn child_nodes(
        &self,
        workspace: &str,
        parent: &Node,
        filter: &TypeFilter,
    ) -> Result<Vec<Node>> {
        let chain = self.workspace_chain(workspace).await?;
        let mut children = self.visible(&chain, |node| {
            node.parent_path().as_deref() == Some(parent.path.as_str())
                && filter.matches(&node.node_type)
        })?;
        sort_siblings(&mut children);
        Ok(children)
    }

    async fn insert(&self, node: &Node) -> Result<()> {
        self.insert_all(std::slice::from_ref(node)).await
    }

    async fn insert_all(&self, batch: &[Node]) -> Result<()> {
        let mut inner = self.write()?;
        let mut nodes = inner.nodes.clone();

        for node in batch {
            let chain = inner.chain(&node.workspace)?;
            if let Some(parent) = node.parent_path().filter(|parent| parent != ROOT_PATH) {
                if visible_in(&nodes, &chain, |n| n.path == parent).is_empty() {
                    return Err(RepositoryError::MissingParent(node.path.clone()));
                }
            }

            for existing in nodes.iter().filter(|n| n.workspace == node.workspace) {
                if existing.path == node.path {
                    return Err(RepositoryError::PathConflict {
                        workspace: node.workspace.clone(),
                        path: node.path.clone(),
                    });
                }
                if existing.identifier == node.identifier {
                    return Err(RepositoryError::IdentifierConflict {
                        workspace: node.workspace.clone(),
                        identifier: node.identifier.clone(),
                    });
                }
            }
            nodes.push(node.clone());
        }

        inner.nodes = nodes;
        Ok(())
    }

    async fn remove(&self, workspace: &str, node: &Node) -> Result<()> {
        let target = self
            .workspace(workspace)
            .await?
            .ok_or_else(|| RepositoryError::UnknownWorkspace(workspace.to_string()))?;

        let mut inner = self.write()?;
        if target.base_workspace.is_none() {
            inner
                .nodes
                .retain(|n| !(n.workspace == workspace && n.identifier == node.identifier));
            return Ok(());
        }

        let mut marker = node.clone();
        marker.workspace = workspace.to_string();
        marker.removed = true;
        match inner
            .nodes
            .iter()
            .position(|n| n.workspace == workspace && n.identifier == node.identifier)
        {
            Some(index) => inner.nodes[index].removed = true,
            None => inner.nodes.push(marker),
        }
        Ok(())
    }

    async fn workspace(&self, name: &str) -> Result<Option<Workspace>> {
        Ok(self.read()?.workspaces.get(name).cloned())
    }

    async fn workspaces(&self) -> Result<Vec<Workspace>> {
        Ok(self.read()?.workspaces.values().cloned().collect())
    }

    async fn create_workspace(&self, workspace: &Workspace) -> Result<()> {
        let mut inner = self.write()?;
        if inner.workspaces.contains_key(&workspace.name) {
            return Err(RepositoryError::WorkspaceExists(workspace.name.clone()));
        }
        if let Some(base) = &workspace.base_workspace {
            if !inner.workspaces.contains_key(base) {
                return Err(RepositoryError::UnknownWorkspace(base.clone()));
            }
        }
        inner
            .workspaces
            .insert(workspace.name.clone(), workspace.clone());
        Ok(())
    }

    async fn publish(&self, source: &str, target: &str) -> Result<u64> {
        let mut inner = self.write()?;
        for name in [source, target] {
            if !inner.workspaces.contains_key(name) {
                return Err(RepositoryError::UnknownWorkspace(name.to_string()));
            }
        }

        let (changes, mut nodes): (Vec<Node>, Vec<Node>) = inner
            .nodes
            .iter()
            .cloned()
            .partition(|node| node.workspace == source);

        for change in &changes {
            nodes.retain(|n| !(n.workspace == target && n.identifier == change.identifier));
            if change.removed {
                continue;
            }
            if nodes
                .iter()
                .any(|n| n.workspace == target && n.path == change.path)
            {
                return Err(RepositoryError::PathConflict {
                    workspace: target.to_string(),
                    path: change.path.clone(),
                });
            }
            let mut published = change.clone();
            published.workspace = target.to_string();
            nodes.push(published);
        }
        inner.nodes = nodes;

        tracing::info!(source, target, changes = changes.len(), "published workspace");
        Ok(changes.len() as u64)
    }
}
