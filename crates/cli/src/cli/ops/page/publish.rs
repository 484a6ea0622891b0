use std::fmt;

use clap::Args;

use super::{open_session, PageError};
use crate::cli::op::{ExitStatus, Op, OpContext};

#[derive(Args, Debug, Clone)]
#[command(about = "Publish all pending changes of a user workspace to live")]
pub struct Publish {
    /// User whose workspace is published
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Debug)]
pub struct PublishOutput {
    pub workspace: String,
    pub changes: u64,
}

impl fmt::Display for PublishOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Published {} change(s) from {} to live",
            self.changes, self.workspace
        )
    }
}

impl ExitStatus for PublishOutput {}

#[async_trait::async_trait]
impl Op for Publish {
    type Error = PageError;
    type Output = PublishOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let (session, _) = open_session(ctx, self.user.as_deref()).await?;
        let changes = session.publish().await?;
        Ok(PublishOutput {
            workspace: session.workspace().to_string(),
            changes,
        })
    }
}
