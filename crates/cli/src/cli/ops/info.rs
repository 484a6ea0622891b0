use clap::Args;
use std::fmt;

use super::page::{open_session, PageError};
use crate::cli::op::{ExitStatus, Op, OpContext};

#[derive(Args, Debug, Clone)]
#[command(about = "Show the site and workspace the page commands work on")]
pub struct Info {
    /// Use this user's workspace (defaults to the configured user), `live`
    /// for the live workspace
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Debug)]
pub struct InfoOutput {
    site_name: String,
    workspace: String,
    site_node_name: String,
    site_path: String,
}

impl fmt::Display for InfoOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Current Site Name", &self.site_name),
            ("Workspace Name", &self.workspace),
            ("Site node name", &self.site_node_name),
            ("Site path", &self.site_path),
        ];
        writeln!(f, "{:<20}  {}", "KEY", "VALUE")?;
        for (key, value) in rows {
            writeln!(f, "{:<20}  {}", key, value)?;
        }
        Ok(())
    }
}

impl ExitStatus for InfoOutput {}

#[async_trait::async_trait]
impl Op for Info {
    type Error = PageError;
    type Output = InfoOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let (session, config) = open_session(ctx, self.user.as_deref()).await?;

        Ok(InfoOutput {
            site_name: config.site_name.clone(),
            workspace: session.workspace().to_string(),
            site_node_name: config.site_node_name.clone(),
            site_path: session.site_path().to_string(),
        })
    }
}
