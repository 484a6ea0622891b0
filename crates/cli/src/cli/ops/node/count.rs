use clap::Args;

use super::{FilterArgs, NodeError};
use crate::cli::op::{Op, OpContext};

#[derive(Args, Debug, Clone)]
#[command(about = "Count nodes matching the given constraints")]
pub struct Count {
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[async_trait::async_trait]
impl Op for Count {
    type Error = NodeError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let db = ctx.database().await?;
        let count = self.filter.node_query().count(&db).await?;
        Ok(count.to_string())
    }
}
