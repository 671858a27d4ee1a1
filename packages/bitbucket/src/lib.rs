#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Bitbucket Cloud REST client for `bkt`.
//!
//! [`BitbucketClient`] owns the transport, the bearer token and the
//! per-request deadlines. Every call is buffered into a [`Response`] and
//! classified into a [`BitbucketError`] when the status is not 2xx. Typed
//! facades for each resource family live in the submodules and are all
//! methods on the client.

mod branches;
mod client;
mod error;
mod projects;
mod pull_requests;
mod repositories;
mod users;

pub use bkt_bitbucket_models as models;
pub use client::{
    Accept, ApiRequest, BitbucketClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, LONG_TIMEOUT,
    MAX_PAGE_LEN, Response,
};
pub use error::BitbucketError;
pub use pull_requests::PullRequestQuery;
