// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::op::{ExitStatus, Op, OpContext};
use cli::{args::Args, Info, Init, NodeCmd, Page, Version, WorkspaceCmd};

use crlib_cli::logging;

command_enum! {
    (Init, Init),
    (Info, Info),
    (Page, Page),
    (Node, NodeCmd),
    (Workspace, WorkspaceCmd),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let ctx = OpContext::new(args.config_path, args.database);

    // logging follows the config when there is one
    let config = ctx.config().unwrap_or_default();
    let guards = logging::init_logging(config.tracing_level(), config.log_dir.as_deref());

    let code = match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            output.exit_code()
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {}", e);
            1
        }
    };

    // flush buffered log lines before exiting
    drop(guards);
    std::process::exit(code);
}
