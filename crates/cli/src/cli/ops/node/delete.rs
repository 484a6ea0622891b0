use std::fmt;

use clap::Args;

use super::{FilterArgs, NodeError};
use crate::cli::op::{ExitStatus, Op, OpContext};

#[derive(Args, Debug, Clone)]
#[command(about = "Delete all nodes matching the given constraints")]
pub struct Delete {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Only report how many nodes would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct DeleteOutput {
    pub count: u64,
    pub dry_run: bool,
}

impl fmt::Display for DeleteOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            write!(f, "{} node(s) would be deleted", self.count)
        } else {
            write!(f, "Deleted {} node(s)", self.count)
        }
    }
}

impl ExitStatus for DeleteOutput {}

#[async_trait::async_trait]
impl Op for Delete {
    type Error = NodeError;
    type Output = DeleteOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let db = ctx.database().await?;
        let query = self.filter.node_query();

        let count = if self.dry_run {
            query.count(&db).await?
        } else {
            query.delete_all(&db).await?
        };

        Ok(DeleteOutput {
            count,
            dry_run: self.dry_run,
        })
    }
}
