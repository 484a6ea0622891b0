pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "crlib")]
#[command(about = "Admin tools for a workspaced content repository", version)]
pub struct Args {
    /// Path to the crlib config directory (defaults to ~/.crlib)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// SQLite database URL, overriding the one in the config directory
    /// (e.g. sqlite:///tmp/content.sqlite)
    #[arg(long, global = true)]
    pub database: Option<Url>,

    #[command(subcommand)]
    pub command: crate::Command,
}
