use std::fmt;

use clap::Args;

use common::repository::NodeRepository;
use common::workspace::Workspace;

use super::WorkspaceError;
use crate::cli::op::{ExitStatus, Op, OpContext};

#[derive(Args, Debug, Clone)]
#[command(about = "List all workspaces")]
pub struct List {}

#[derive(Debug)]
pub struct WorkspaceListOutput {
    pub workspaces: Vec<Workspace>,
}

impl fmt::Display for WorkspaceListOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<24}  {:<24}  TITLE", "NAME", "BASE")?;
        for workspace in &self.workspaces {
            writeln!(
                f,
                "{:<24}  {:<24}  {}",
                workspace.name,
                workspace.base_workspace.as_deref().unwrap_or("-"),
                workspace.title.as_deref().unwrap_or("")
            )?;
        }
        write!(f, "{} workspace(s)", self.workspaces.len())
    }
}

impl ExitStatus for WorkspaceListOutput {}

#[async_trait::async_trait]
impl Op for List {
    type Error = WorkspaceError;
    type Output = WorkspaceListOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let db = ctx.database().await?;
        Ok(WorkspaceListOutput {
            workspaces: db.workspaces().await?,
        })
    }
}
