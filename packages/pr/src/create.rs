use bkt_bitbucket::models::{AccountRef, EndpointRef, NewPullRequest, PullRequest};
use bkt_git_backend::{CommitInfo, DEFAULT_REMOTE_NAME, GitRepository};

use crate::{Outcome, PrError, PrOperations};

/// Source branches pull requests may not be opened from.
pub const PROTECTED_BRANCHES: [&str; 2] = ["main", "master"];

/// Prefix marking a draft title.
pub const DRAFT_PREFIX: &str = "[DRAFT] ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Defaults to the current branch.
    pub source: Option<String>,
    /// Defaults to the repository's main branch.
    pub destination: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    /// Nicknames, account ids or display names.
    pub reviewers: Vec<String>,
    pub draft: bool,
    /// Fill an empty title and body from the commits being merged.
    pub fill: bool,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Title and body from commits listed newest first: the first subject is the
/// title and the rest become `- subject` bullets.
fn fill_from_commits(commits: &[CommitInfo]) -> (Option<String>, Option<String>) {
    let mut subjects = commits.iter().map(|c| c.summary.trim()).filter(|s| !s.is_empty());
    let title = subjects.next().map(ToString::to_string);
    let bullets = subjects.map(|s| format!("- {s}")).collect::<Vec<_>>();
    let body = (!bullets.is_empty()).then(|| bullets.join("\n"));
    (title, body)
}

fn with_draft_prefix(title: String) -> String {
    if title.starts_with(DRAFT_PREFIX) {
        title
    } else {
        format!("{DRAFT_PREFIX}{title}")
    }
}

/// Commits of `source` not yet on `destination`, trying the remote-tracking
/// branch first.
fn commits_to_merge(
    working_copy: &dyn GitRepository,
    destination: &str,
    source: &str,
) -> Option<Vec<CommitInfo>> {
    let remote = working_copy
        .default_service_remote()
        .map_or_else(|_| DEFAULT_REMOTE_NAME.to_string(), |r| r.name);

    [format!("{remote}/{destination}"), destination.to_string()]
        .iter()
        .find_map(|base| match working_copy.list_commits(base, source) {
            Ok(commits) => Some(commits),
            Err(e) => {
                log::debug!("Cannot list commits from {base}: {e}");
                None
            }
        })
}

/// The branch a new pull request starts from: the given source, else the
/// current branch. Needs no credential, so callers can check it before
/// authenticating.
///
/// # Errors
///
/// * [`PrError::ProtectedSource`] when the source is `main` or `master`.
/// * [`PrError::NoWorkingCopy`] or a working-copy error when no source is
///   given and the current branch cannot be read.
pub fn source_branch(
    source: Option<&String>,
    working_copy: Option<&dyn GitRepository>,
) -> Result<String, PrError> {
    let source = match non_empty(source) {
        Some(source) => source,
        None => working_copy.ok_or(PrError::NoWorkingCopy)?.current_branch()?,
    };

    if PROTECTED_BRANCHES.contains(&source.as_str()) {
        return Err(PrError::ProtectedSource { branch: source });
    }

    Ok(source)
}

impl PrOperations<'_> {
    /// Open a pull request.
    ///
    /// # Errors
    ///
    /// * [`PrError::ProtectedSource`] when the source is `main` or `master`,
    ///   before any request.
    /// * [`PrError::MissingTitle`] when no title is given or filled.
    /// * [`PrError::PrAlreadyExists`] when an open pull request already
    ///   starts from the source branch.
    /// * [`PrError::Api`] on service failure.
    pub async fn create(&self, options: &CreateOptions) -> Result<Outcome<PullRequest>, PrError> {
        let source = source_branch(options.source.as_ref(), self.working_copy)?;

        let mut title = non_empty(options.title.as_ref());
        let mut body = non_empty(options.body.as_ref());
        if title.is_none() && !options.fill {
            return Err(PrError::MissingTitle);
        }

        if let Some(existing) = self.client.find_open_pull_request(self.repo, &source).await? {
            return Err(PrError::PrAlreadyExists {
                branch: source,
                url: existing
                    .links
                    .html_href()
                    .map_or_else(|| self.repo.pull_request_url(existing.id), ToString::to_string),
            });
        }

        let destination = match non_empty(options.destination.as_ref()) {
            Some(destination) => destination,
            None => self.client.default_branch(self.repo).await?,
        };

        let mut outcome = Outcome::new(());

        if options.fill && (title.is_none() || body.is_none()) {
            match self
                .working_copy
                .and_then(|wc| commits_to_merge(wc, &destination, &source))
            {
                Some(commits) => {
                    let (filled_title, filled_body) = fill_from_commits(&commits);
                    title = title.or(filled_title);
                    body = body.or(filled_body);
                }
                None => outcome.warn(format!(
                    "could not list commits between {destination} and {source}; nothing to fill"
                )),
            }
        }

        let mut title = title.ok_or(PrError::MissingTitle)?;
        if options.draft {
            title = with_draft_prefix(title);
        }

        let reviewers = self.resolve_reviewers(&options.reviewers, &mut outcome).await;

        let request = NewPullRequest {
            title,
            description: body.unwrap_or_default(),
            source: EndpointRef::branch(&source),
            destination: EndpointRef::branch(&destination),
            reviewers,
        };

        log::debug!("Creating pull request {source} -> {destination}");
        let pr = self.client.create_pull_request(self.repo, &request).await?;

        Ok(Outcome {
            value: pr,
            warnings: outcome.warnings,
        })
    }

    /// Map reviewer names to account UUIDs: workspace members first, then a
    /// user lookup. Unresolved names are dropped with a warning.
    async fn resolve_reviewers(
        &self,
        names: &[String],
        outcome: &mut Outcome<()>,
    ) -> Vec<AccountRef> {
        let names = names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>();
        if names.is_empty() {
            return Vec::new();
        }

        let members = match self.client.list_workspace_members(&self.repo.workspace).await {
            Ok(members) => members,
            Err(e) => {
                log::debug!("Cannot list members of {}: {e}", self.repo.workspace);
                Vec::new()
            }
        };

        let mut reviewers = Vec::new();
        for name in names {
            let uuid = match members.iter().find(|m| m.matches(name)).and_then(|m| m.uuid.clone()) {
                Some(uuid) => Some(uuid),
                None => match self.client.get_user(name).await {
                    Ok(account) => account.uuid,
                    Err(e) => {
                        log::debug!("Cannot look up user {name}: {e}");
                        None
                    }
                },
            };

            match uuid {
                Some(uuid) => reviewers.push(AccountRef { uuid }),
                None => outcome.warn(format!("could not resolve reviewer \"{name}\"; skipping")),
            }
        }
        reviewers
    }
}
