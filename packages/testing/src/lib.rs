#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Fakes and fixtures for testing `bkt` without a real checkout, terminal or
//! service.

pub mod fixtures;
mod prompter;
mod working_copy;

pub use prompter::{ScriptedEditor, ScriptedPrompter};
pub use working_copy::{FakeGitRepository, GitCall};
