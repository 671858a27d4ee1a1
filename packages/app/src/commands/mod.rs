//! Command handlers. Each resolves its context, runs one operation and
//! prints the result.

mod branch;
mod config;
mod pr;
mod project;

use clap::CommandFactory;

use crate::AppContext;
use crate::cli::{Cli, Command};

/// Run a parsed command line.
///
/// # Errors
///
/// Whatever the command fails with, ready to print.
pub async fn run(cli: Cli, ctx: &mut AppContext) -> anyhow::Result<()> {
    let Cli {
        repo,
        json,
        command,
    } = cli;
    let repo = repo.as_deref();

    match command {
        Command::Pr { command } => pr::run(ctx, repo, json, command).await,
        Command::Branch { command } => branch::run(ctx, repo, json, command).await,
        Command::Project { command } => project::run(ctx, repo, json, command).await,
        Command::Browse => browse(ctx, repo),
        Command::Completion { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "bkt", ctx.printer().out());
            Ok(())
        }
        Command::Config { command } => config::run(ctx, json, command),
    }
}

fn browse(ctx: &mut AppContext, repo: Option<&str>) -> anyhow::Result<()> {
    let url = ctx.resolve_repo(repo)?.html_url();
    ctx.printer().note(&format!("Opening {url} in your browser."))?;
    ctx.browser().open(&url)?;
    Ok(())
}
