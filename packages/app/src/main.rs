#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::io::IsTerminal;
use std::process::ExitCode;

use bkt_app::{AppContext, Cli, output};
use bkt_config::Environment;
use clap::Parser;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut ctx = match AppContext::from_system() {
        Ok(ctx) => ctx,
        Err(e) => return fail(&e),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => return fail(&e.into()),
    };

    let result = runtime.block_on(async {
        tokio::select! {
            result = bkt_app::run(cli, &mut ctx) => result,
            _ = tokio::signal::ctrl_c() => Err(anyhow::anyhow!("interrupted")),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("Command failed: {e:?}");
            if ctx.printer().error(&e).is_err() {
                return fail(&e);
            }
            ExitCode::FAILURE
        }
    }
}

/// Report an error that happened before the context's streams existed.
fn fail(error: &anyhow::Error) -> ExitCode {
    let stderr = std::io::stderr();
    let color = bkt_terminal::color_enabled(&Environment::system(), false, stderr.is_terminal());
    let _ = output::write_error(&mut stderr.lock(), color, error);
    ExitCode::FAILURE
}
