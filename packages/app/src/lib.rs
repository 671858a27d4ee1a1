#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! The `bkt` command-line application.
//!
//! [`Cli`] is the clap command tree, [`AppContext`] carries configuration,
//! environment, output streams and the optional working copy, and [`run`]
//! dispatches a parsed command line to its handler.

pub mod cli;
mod commands;
pub mod context;
pub mod output;

pub use cli::Cli;
pub use commands::run;
pub use context::AppContext;
