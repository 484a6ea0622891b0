use clap::Args;

use super::{open_session, PageError};
use crate::cli::op::{Op, OpContext};

#[derive(Args, Debug, Clone)]
#[command(about = "Print the node path of the document behind a public URL")]
pub struct ResolveUrl {
    /// URL path, e.g. /news/interview
    pub url: String,

    /// Resolve in this user's workspace instead of live
    #[arg(long)]
    pub user: Option<String>,
}

#[async_trait::async_trait]
impl Op for ResolveUrl {
    type Error = PageError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let user = self
            .user
            .as_deref()
            .unwrap_or(common::workspace::LIVE_WORKSPACE);
        let (session, _) = open_session(ctx, Some(user)).await?;
        let node = session.node_for_url(&self.url).await?;
        Ok(node.path)
    }
}
