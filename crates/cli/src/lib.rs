// Storage and configuration behind the `crlib` binary

/**
 * SQLite implementation of the node repository.
 */
pub mod database;
/**
 * Subscriber setup for stderr and rolling file logs.
 */
pub mod logging;
/**
 * Workspace and site scoped access used by the page commands.
 */
pub mod session;
/**
 * Config directory, `config.toml` and the database location.
 */
pub mod state;

pub use database::{Database, DatabaseSetupError};
pub use session::{Session, SessionError};
pub use state::{AppConfig, AppState, StateError};
