use std::fmt;

use clap::Args;

use common::node::Node;
use common::query::{OrderDirection, OrderField};

use super::{FilterArgs, NodeError};
use crate::cli::op::{ExitStatus, Op, OpContext};

#[derive(Args, Debug, Clone)]
#[command(about = "List nodes matching the given constraints")]
pub struct List {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Field to order by: path, identifier, node_type, workspace, sorting_index
    #[arg(long, default_value = "path")]
    pub sort: OrderField,

    /// asc or desc
    #[arg(long, default_value = "asc")]
    pub order: OrderDirection,

    /// Maximum number of nodes, 0 for all
    #[arg(long, default_value_t = 0)]
    pub limit: u32,

    /// Print the nodes as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug)]
pub struct NodeListOutput {
    pub nodes: Vec<Node>,
    pub json: bool,
}

impl fmt::Display for NodeListOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.json {
            let json = serde_json::to_string_pretty(&self.nodes).map_err(|_| fmt::Error)?;
            return write!(f, "{}", json);
        }

        if self.nodes.is_empty() {
            return write!(f, "No nodes found");
        }
        writeln!(
            f,
            "{:<36}  {:<10}  {:<28}  PATH",
            "IDENTIFIER", "WORKSPACE", "NODE TYPE"
        )?;
        for node in &self.nodes {
            let marker = if node.removed { " (removed)" } else { "" };
            writeln!(
                f,
                "{:<36}  {:<10}  {:<28}  {}{}",
                node.identifier, node.workspace, node.node_type, node.path, marker
            )?;
        }
        write!(f, "{} node(s)", self.nodes.len())
    }
}

impl ExitStatus for NodeListOutput {}

#[async_trait::async_trait]
impl Op for List {
    type Error = NodeError;
    type Output = NodeListOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let db = ctx.database().await?;
        let mut query = self.filter.node_query();
        query
            .set_order_by(self.sort, self.order)
            .set_limit(Some(self.limit));

        let nodes = query.fetch(&db).await?;
        Ok(NodeListOutput {
            nodes,
            json: self.json,
        })
    }
}
