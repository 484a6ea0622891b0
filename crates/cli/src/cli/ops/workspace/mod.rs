//! Workspace commands
//!
//! - crlib workspace list     - List all workspaces
//! - crlib workspace create   - Create a workspace on top of a base

use clap::{Args, Subcommand};

pub mod create;
pub mod list;

use crate::cli::op::{ContextError, Op, OpContext};

crate::command_enum! {
    (List, list::List),
    (Create, create::Create),
}

pub type WorkspaceCommand = Command;

#[derive(Args, Debug, Clone)]
#[command(about = "List and create workspaces")]
pub struct WorkspaceCmd {
    #[command(subcommand)]
    pub command: WorkspaceCommand,
}

#[async_trait::async_trait]
impl Op for WorkspaceCmd {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Repository(#[from] common::repository::RepositoryError<sqlx::Error>),
}
