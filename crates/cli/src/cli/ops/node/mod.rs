//! Node commands - query the repository directly
//!
//! - crlib node list     - List matching nodes
//! - crlib node count    - Count matching nodes
//! - crlib node delete   - Delete matching nodes in one statement
//! - crlib node import   - Insert nodes from a JSON file
//!
//! These commands see raw records of the selected workspace; base
//! workspaces are not merged in.

use clap::{Args, Subcommand};

pub mod count;
pub mod delete;
pub mod import;
pub mod list;

use common::query::{NodeQuery, QueryOptions, TypeFilter};

use crate::cli::op::{ContextError, Op, OpContext};

crate::command_enum! {
    (List, list::List),
    (Count, count::Count),
    (Delete, delete::Delete),
    (Import, import::Import),
}

pub type NodeCommand = Command;

#[derive(Args, Debug, Clone)]
#[command(about = "Query, count, delete and import node records")]
pub struct NodeCmd {
    #[command(subcommand)]
    pub command: NodeCommand,
}

#[async_trait::async_trait]
impl Op for NodeCmd {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

/// Constraints shared by the query commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Comma separated node types
    #[arg(long = "type")]
    pub node_types: Option<String>,

    /// Path prefix
    #[arg(long)]
    pub path: Option<String>,

    /// Case insensitive text searched in the node properties
    #[arg(long)]
    pub search: Option<String>,

    /// Identifier prefix
    #[arg(long)]
    pub id: Option<String>,

    /// Workspace to query, defaults to live
    #[arg(long)]
    pub workspace: Option<String>,
}

impl FilterArgs {
    pub fn node_query(&self) -> NodeQuery {
        let options = QueryOptions {
            node_types: self.node_types.as_deref().map(TypeFilter::parse),
            path: self.path.clone(),
            search_term: self.search.clone(),
            workspace: self.workspace.clone(),
        };
        let mut query = NodeQuery::new(options);
        if let Some(id) = &self.id {
            query.add_identifier_constraint(id);
        }
        query
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Repository(#[from] common::repository::RepositoryError<sqlx::Error>),
}
