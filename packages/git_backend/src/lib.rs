#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Working-copy probe abstraction for `bkt`.
//!
//! This crate defines the `GitBackend` and `GitRepository` traits that isolate
//! every interaction with the enclosing checkout, so commands can be tested
//! against a fake working copy.

mod backend;

pub use backend::{DEFAULT_REMOTE_NAME, GitBackend, GitRepository, select_service_remote};
pub use bkt_git_backend_models::*;
