use clap::Args;

use common::tree::DocumentTree;

use super::{open_session, PageError};
use crate::cli::op::{ExitStatus, Op, OpContext};

#[derive(Args, Debug, Clone)]
#[command(about = "Show the document tree below a path")]
pub struct List {
    /// User whose workspace is shown, `live` for the live workspace
    #[arg(long)]
    pub user: Option<String>,

    /// Levels of documents to show below the start node
    #[arg(long, default_value_t = 1)]
    pub depth: usize,

    /// Start node, relative to the site root
    #[arg(long, default_value = "")]
    pub path: String,
}

impl ExitStatus for DocumentTree {}

#[async_trait::async_trait]
impl Op for List {
    type Error = PageError;
    type Output = DocumentTree;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let (session, _) = open_session(ctx, self.user.as_deref()).await?;
        let root = session.node(&self.path).await?;
        Ok(session.document_tree(&root, self.depth).await?)
    }
}
