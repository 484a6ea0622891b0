use clap::Args;

use crlib_cli::database::DatabaseSetupError;
use crlib_cli::state::{AppConfig, AppState, StateError};
use crlib_cli::Database;

#[derive(Args, Debug, Clone)]
#[command(about = "Create the config directory, config file and database")]
pub struct Init {
    /// Human readable site name
    #[arg(long, default_value = "Demo Site")]
    pub site_name: String,

    /// Node name of the site below /sites
    #[arg(long, default_value = "demo")]
    pub site_node_name: String,

    /// User whose workspace the page commands use by default
    #[arg(long, default_value = "admin")]
    pub default_user: String,

    /// Comma separated node types treated as pages
    #[arg(long, value_delimiter = ',', default_value = common::walker::DOCUMENT_NODE_TYPE)]
    pub document_types: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
    #[error("init failed: {0}")]
    DatabaseFailed(#[from] DatabaseSetupError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            site_name: self.site_name.clone(),
            site_node_name: self.site_node_name.clone(),
            default_user: self.default_user.clone(),
            document_types: self.document_types.clone(),
            ..AppConfig::default()
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        // connecting creates and migrates the database, seeding `live`
        let url = match &ctx.database_url {
            Some(url) => url.clone(),
            None => state.database_url()?,
        };
        Database::connect(&url).await?;

        let output = format!(
            "Initialized crlib directory at: {}\n\
             - Database: {}\n\
             - Config: {}\n\
             - Site: {} ({})\n\
             - Default user: {}\n\
             - Document types: {}",
            state.crlib_dir.display(),
            url,
            state.config_path.display(),
            state.config.site_name,
            state.config.site_path(),
            state.config.default_user,
            state.config.document_types.join(", "),
        );

        Ok(output)
    }
}
