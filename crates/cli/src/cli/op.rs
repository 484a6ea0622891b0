use std::error::Error;
use std::fmt::Display;
use std::path::PathBuf;

use url::Url;

use crlib_cli::database::{Database, DatabaseSetupError};
use crlib_cli::state::{AppConfig, AppState, StateError};

#[derive(Clone, Debug)]
pub struct OpContext {
    /// Optional custom config path (defaults to ~/.crlib)
    pub config_path: Option<PathBuf>,
    /// Database to use instead of the one in the config directory
    pub database_url: Option<Url>,
}

impl OpContext {
    pub fn new(config_path: Option<PathBuf>, database_url: Option<Url>) -> Self {
        Self {
            config_path,
            database_url,
        }
    }

    /// The loaded configuration. Without a config directory the defaults
    /// apply, as long as a database was given explicitly.
    pub fn config(&self) -> Result<AppConfig, StateError> {
        match AppState::load(self.config_path.clone()) {
            Ok(state) => Ok(state.config),
            Err(StateError::NotInitialized) if self.database_url.is_some() => {
                Ok(AppConfig::default())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn database(&self) -> Result<Database, ContextError> {
        let url = match &self.database_url {
            Some(url) => url.clone(),
            None => AppState::load(self.config_path.clone())?.database_url()?,
        };
        tracing::debug!(%url, "opening database");
        Ok(Database::connect(&url).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Database(#[from] DatabaseSetupError),
}

/// Process exit status reported for a successful op
pub trait ExitStatus {
    fn exit_code(&self) -> i32 {
        0
    }
}

impl ExitStatus for String {}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output: Display + ExitStatus;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl $crate::cli::op::ExitStatus for OpOutput {
            fn exit_code(&self) -> i32 {
                match self {
                    $(
                        OpOutput::$variant(output) => $crate::cli::op::ExitStatus::exit_code(output),
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
