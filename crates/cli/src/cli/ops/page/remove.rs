use std::fmt;

use clap::Args;

use super::{open_session, PageError};
use crate::cli::op::{ExitStatus, Op, OpContext};

#[derive(Args, Debug, Clone)]
#[command(about = "Remove a document and everything below it, leaves first")]
pub struct Remove {
    /// User whose workspace records the removals, `live` removes directly
    #[arg(long)]
    pub user: Option<String>,

    /// Start node, relative to the site root; the site root itself by default
    #[arg(long)]
    pub path: Option<String>,

    /// Start node, as public URL path
    #[arg(long, conflicts_with = "path")]
    pub url: Option<String>,

    /// Remove at most this many documents, 0 for no limit
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
}

#[derive(Debug)]
pub struct RemoveOutput {
    pub workspace: String,
    pub removed: Vec<String>,
}

impl fmt::Display for RemoveOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for path in &self.removed {
            writeln!(f, "Removed {}", path)?;
        }
        write!(
            f,
            "{} document(s) removed in workspace {}",
            self.removed.len(),
            self.workspace
        )
    }
}

impl ExitStatus for RemoveOutput {
    fn exit_code(&self) -> i32 {
        if self.removed.is_empty() {
            1
        } else {
            0
        }
    }
}

#[async_trait::async_trait]
impl Op for Remove {
    type Error = PageError;
    type Output = RemoveOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let (session, _) = open_session(ctx, self.user.as_deref()).await?;

        let root = match (&self.url, &self.path) {
            (Some(url), _) => session.node_for_url(url).await?,
            (None, Some(path)) => session.node(path).await?,
            (None, None) => session.node("").await?,
        };

        let removed = session.remove_documents(root, self.limit).await?;
        Ok(RemoveOutput {
            workspace: session.workspace().to_string(),
            removed: removed.into_iter().map(|node| node.path).collect(),
        })
    }
}
