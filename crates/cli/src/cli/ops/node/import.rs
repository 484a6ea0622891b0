use std::path::PathBuf;

use clap::Args;
use serde::Deserialize;
use serde_json::{Map, Value};

use common::node::Node;
use common::repository::{NodeRepository, RepositoryError};
use common::workspace::LIVE_WORKSPACE;

use crate::cli::op::{ContextError, Op, OpContext};

#[derive(Args, Debug, Clone)]
#[command(about = "Insert nodes from a JSON array file")]
pub struct Import {
    /// File holding a JSON array of node objects
    pub file: PathBuf,

    /// Workspace for entries that do not name one
    #[arg(long, default_value = LIVE_WORKSPACE)]
    pub workspace: String,
}

/// Node entry of an import file; a missing identifier gets a fresh UUID
#[derive(Debug, Deserialize)]
struct ImportNode {
    identifier: Option<String>,
    path: String,
    node_type: String,
    workspace: Option<String>,
    #[serde(default)]
    properties: Map<String, Value>,
    #[serde(default)]
    sorting_index: i64,
}

impl ImportNode {
    fn into_node(self, default_workspace: &str) -> Node {
        let identifier = self
            .identifier
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let workspace = self
            .workspace
            .unwrap_or_else(|| default_workspace.to_string());

        let mut node = Node::new(identifier, self.path, self.node_type, workspace)
            .with_sorting_index(self.sorting_index);
        node.properties = self.properties;
        node
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("invalid import file {0}: {1}")]
    Parse(PathBuf, serde_json::Error),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Repository(#[from] RepositoryError<sqlx::Error>),
}

#[async_trait::async_trait]
impl Op for Import {
    type Error = ImportError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let raw = tokio::fs::read_to_string(&self.file)
            .await
            .map_err(|e| ImportError::Read(self.file.clone(), e))?;
        let entries: Vec<ImportNode> =
            serde_json::from_str(&raw).map_err(|e| ImportError::Parse(self.file.clone(), e))?;

        let mut nodes: Vec<Node> = entries
            .into_iter()
            .map(|entry| entry.into_node(&self.workspace))
            .collect();
        // parents before children
        nodes.sort_by_key(|node| node.path.matches('/').count());

        // one batch, so a bad entry leaves the store as it was
        let db = ctx.database().await?;
        db.insert_all(&nodes).await?;

        Ok(format!("Imported {} node(s)", nodes.len()))
    }
}
