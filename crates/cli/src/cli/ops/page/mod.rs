//! Page commands - work on the document tree of the configured site
//!
//! - crlib page list          - Show the document tree below a path
//! - crlib page remove        - Remove documents, leaves first
//! - crlib page publish       - Publish a user workspace to live
//! - crlib page resolve-url   - Find the document behind a public URL

use clap::{Args, Subcommand};

pub mod list;
pub mod publish;
pub mod remove;
pub mod resolve_url;

use crlib_cli::session::{Session, SessionError};
use crlib_cli::state::{AppConfig, StateError};
use crlib_cli::Database;

use crate::cli::op::{ContextError, Op, OpContext};

crate::command_enum! {
    (List, list::List),
    (Remove, remove::Remove),
    (Publish, publish::Publish),
    (ResolveUrl, resolve_url::ResolveUrl),
}

pub type PageCommand = Command;

#[derive(Args, Debug, Clone)]
#[command(about = "Inspect, remove and publish pages of the site")]
pub struct Page {
    #[command(subcommand)]
    pub command: PageCommand,
}

#[async_trait::async_trait]
impl Op for Page {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

/// Failure to set up the session a page command runs in
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Session(#[from] SessionError<sqlx::Error>),
}

/// Open the workspace of `user`, falling back to the configured user.
/// `live` opens the live workspace itself.
pub async fn open_session(
    ctx: &OpContext,
    user: Option<&str>,
) -> Result<(Session<Database>, AppConfig), PageError> {
    let config = ctx.config()?;
    let user = match user.unwrap_or(&config.default_user) {
        common::workspace::LIVE_WORKSPACE => None,
        user => Some(user.to_string()),
    };
    let session = Session::open(ctx.database().await?, user.as_deref(), &config).await?;
    Ok((session, config))
}
