use bkt_bitbucket::models::{MergeRequest, MergeStrategy, PrState, PullRequest};

use crate::{Outcome, PrError, PrOperations};

const REBASE_WARNING: &str = "--rebase uses Bitbucket's fast_forward strategy, which is rejected unless the branch can be fast-forwarded";
const AUTO_MERGE_WARNING: &str = "auto-merge is not supported by Bitbucket Cloud; nothing was done";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub squash: bool,
    pub rebase: bool,
    /// Merge commit message.
    pub message: Option<String>,
    /// Ask the service to delete the source branch after merging.
    pub delete_branch: bool,
    pub auto: bool,
    /// Skip the confirmation prompt.
    pub yes: bool,
}

impl MergeOptions {
    fn strategy(&self) -> MergeStrategy {
        if self.squash {
            MergeStrategy::Squash
        } else if self.rebase {
            MergeStrategy::FastForward
        } else {
            MergeStrategy::MergeCommit
        }
    }
}

#[derive(Debug, Clone)]
pub enum MergeResult {
    /// Auto-merge was requested; the service was not contacted.
    Skipped,
    Merged {
        id: u64,
        strategy: MergeStrategy,
        /// `None` when the service merges asynchronously.
        pull_request: Option<PullRequest>,
        /// Source branch the service was asked to delete.
        deleted_branch: Option<String>,
    },
}

impl PrOperations<'_> {
    /// Merge a pull request.
    ///
    /// The pull request must be `OPEN`; otherwise the merge endpoint is never
    /// called. Unless `yes` is set the user confirms first.
    ///
    /// # Errors
    ///
    /// * [`PrError::MergeStateInvalid`] when the pull request is not open.
    /// * [`PrError::ConfirmationRequired`] when confirmation is needed but
    ///   stdin is not interactive.
    /// * [`PrError::MergeCancelled`] when the user declines.
    /// * Any selector resolution or service error.
    pub async fn merge(
        &self,
        selector: Option<&str>,
        options: &MergeOptions,
    ) -> Result<Outcome<MergeResult>, PrError> {
        let strategy = options.strategy();

        if options.auto {
            let mut outcome = Outcome::new(MergeResult::Skipped);
            outcome.warn(AUTO_MERGE_WARNING);
            return Ok(outcome);
        }

        let id = self.resolve(selector).await?;
        let pr = self.client.get_pull_request(self.repo, id).await?;
        if pr.state != PrState::Open {
            return Err(PrError::MergeStateInvalid { id, state: pr.state });
        }

        let mut warnings = Vec::new();
        if strategy == MergeStrategy::FastForward {
            warnings.push(REBASE_WARNING.to_string());
        }

        if !options.yes {
            if !self.prompter.is_interactive() {
                return Err(PrError::ConfirmationRequired {
                    action: "merge".to_string(),
                });
            }
            let question = format!(
                "Merge pull request #{id} ({}) into {} using {strategy}?",
                pr.title,
                pr.destination_branch()
            );
            if !self.prompter.confirm(&question)? {
                return Err(PrError::MergeCancelled);
            }
        }

        let body = MergeRequest {
            merge_strategy: strategy,
            message: options.message.clone().filter(|m| !m.trim().is_empty()),
            close_source_branch: options.delete_branch.then_some(true),
        };

        log::debug!("Merging #{id} with {strategy}");
        let merged = self.client.merge_pull_request(self.repo, id, &body).await?;

        Ok(Outcome {
            value: MergeResult::Merged {
                id,
                strategy,
                pull_request: merged,
                deleted_branch: options
                    .delete_branch
                    .then(|| pr.source_branch().to_string()),
            },
            warnings,
        })
    }
}
