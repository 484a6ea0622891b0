use clap::Args;

use common::repository::NodeRepository;
use common::workspace::{Workspace, LIVE_WORKSPACE};

use super::WorkspaceError;
use crate::cli::op::{Op, OpContext};

#[derive(Args, Debug, Clone)]
#[command(about = "Create a workspace, e.g. user-admin on top of live")]
pub struct Create {
    /// Workspace name
    pub name: String,

    /// Workspace the new one is based on
    #[arg(long, default_value = LIVE_WORKSPACE)]
    pub base: String,

    /// Human readable title
    #[arg(long)]
    pub title: Option<String>,
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = WorkspaceError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let db = ctx.database().await?;

        let mut workspace = Workspace::new(self.name.clone(), Some(self.base.clone()));
        workspace.title = self.title.clone();
        db.create_workspace(&workspace).await?;

        tracing::info!(name = %self.name, base = %self.base, "created workspace");
        Ok(format!(
            "Created workspace {} based on {}",
            self.name, self.base
        ))
    }
}
