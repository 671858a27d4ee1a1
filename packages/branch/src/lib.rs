#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Branch listing and deletion on the service.

use bkt_bitbucket::models::Branch;
use bkt_bitbucket::{BitbucketClient, BitbucketError};
use bkt_repo_ref::RepoRef;
use bkt_terminal::{Prompter, TerminalError};
use serde::Serialize;

pub const DEFAULT_LIMIT: usize = 30;

const SHORT_HASH_LEN: usize = 7;
const MESSAGE_WIDTH: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum BranchError {
    #[error("cannot confirm deletion in non-interactive mode")]
    ConfirmationRequired,

    #[error("deletion of branch \"{name}\" cancelled")]
    Cancelled { name: String },

    #[error(transparent)]
    Api(#[from] BitbucketError),

    #[error(transparent)]
    Terminal(#[from] TerminalError),
}

/// One row of `branch list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchSummary {
    pub name: String,
    pub hash: String,
    pub message: String,
}

impl From<&Branch> for BranchSummary {
    fn from(branch: &Branch) -> Self {
        Self {
            name: branch.name.clone(),
            hash: branch.target.hash.chars().take(SHORT_HASH_LEN).collect(),
            message: one_line(&branch.target.message, MESSAGE_WIDTH),
        }
    }
}

/// Collapse whitespace (newlines included) and cut to `width` characters,
/// appending `...` when anything was dropped.
#[must_use]
pub fn one_line(message: &str, width: usize) -> String {
    let collapsed = message.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(width).collect();
    cut.push_str("...");
    cut
}

/// # Errors
///
/// Any service error.
pub async fn list(
    client: &BitbucketClient,
    repo: &RepoRef,
    limit: usize,
) -> Result<Vec<BranchSummary>, BranchError> {
    let branches = client.list_branches(repo, limit).await?;
    Ok(branches.iter().map(BranchSummary::from).collect())
}

/// Delete a branch on the service, asking first unless `force` is set.
///
/// # Errors
///
/// * [`BranchError::ConfirmationRequired`] when stdin is not a terminal and
///   `force` is unset. Nothing is sent.
/// * [`BranchError::Cancelled`] when the answer is not `y`/`yes`.
/// * Any service error.
pub async fn delete(
    client: &BitbucketClient,
    repo: &RepoRef,
    name: &str,
    force: bool,
    prompter: &dyn Prompter,
) -> Result<(), BranchError> {
    if !force {
        if !prompter.is_interactive() {
            return Err(BranchError::ConfirmationRequired);
        }
        let question = format!("Delete branch \"{name}\" from {}?", repo.full_name());
        if !prompter.confirm(&question)? {
            return Err(BranchError::Cancelled {
                name: name.to_string(),
            });
        }
    }

    log::debug!("deleting branch {name} in {}", repo.full_name());
    client.delete_branch(repo, name).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bkt_testing::{ScriptedPrompter, fixtures};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BRANCHES: &str = "/repositories/acme/widgets/refs/branches";

    fn repo() -> RepoRef {
        RepoRef::new("acme", "widgets")
    }

    fn client(server: &MockServer) -> BitbucketClient {
        BitbucketClient::new("tok").unwrap().with_base_url(server.uri())
    }

    #[test]
    fn test_one_line_collapses_whitespace() {
        assert_eq!(one_line("Fix bug\n\n  in   parser\n", 50), "Fix bug in parser");
    }

    #[test]
    fn test_one_line_truncates() {
        let message = "a".repeat(60);
        let line = one_line(&message, 50);
        assert_eq!(line, format!("{}...", "a".repeat(50)));
        assert_eq!(one_line(&"b".repeat(50), 50), "b".repeat(50));
    }

    #[tokio::test]
    async fn test_list_summarizes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(BRANCHES))
            .and(query_param("pagelen", "30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::page(
                vec![fixtures::branch(
                    "main",
                    "0123456789abcdef",
                    "Merge pull request #4\n\nfrom feature/x",
                )],
                None,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let rows = list(&client(&server), &repo(), DEFAULT_LIMIT).await.unwrap();
        assert_eq!(
            rows,
            vec![BranchSummary {
                name: "main".to_string(),
                hash: "0123456".to_string(),
                message: "Merge pull request #4 from feature/x".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_delete_non_interactive_requires_force() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let err = delete(
            &client(&server),
            &repo(),
            "feature/z",
            false,
            &ScriptedPrompter::non_interactive(),
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "cannot confirm deletion in non-interactive mode"
        );
    }

    #[tokio::test]
    async fn test_delete_after_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(format!("{BRANCHES}/feature/z")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let prompter = ScriptedPrompter::answering(["YES"]);
        delete(&client(&server), &repo(), "feature/z", false, &prompter)
            .await
            .unwrap();
        assert_eq!(
            prompter.asked(),
            vec!["Delete branch \"feature/z\" from acme/widgets?".to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_declined() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let err = delete(
            &client(&server),
            &repo(),
            "old",
            false,
            &ScriptedPrompter::answering(["n"]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BranchError::Cancelled { name } if name == "old"));
    }

    #[tokio::test]
    async fn test_force_skips_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(format!("{BRANCHES}/old")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        delete(
            &client(&server),
            &repo(),
            "old",
            true,
            &ScriptedPrompter::non_interactive(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_branch() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = delete(
            &client(&server),
            &repo(),
            "gone",
            true,
            &ScriptedPrompter::non_interactive(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "branch not found: Not Found");
    }
}
