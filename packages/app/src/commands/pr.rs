use bkt_bitbucket::models::PrState;
use bkt_pr::{
    CreateOptions, EditOptions, ListOptions, MergeOptions, MergeResult, ReviewOptions,
    colorize_diff, source_branch, status_symbol,
};

use crate::AppContext;
use crate::cli::PrCommand;
use crate::output::{Table, pull_request_record};

#[allow(clippy::too_many_lines)]
pub async fn run(
    ctx: &mut AppContext,
    repo: Option<&str>,
    json: bool,
    command: PrCommand,
) -> anyhow::Result<()> {
    let repo = ctx.resolve_repo(repo)?;
    if let PrCommand::Create { source, .. } = &command {
        source_branch(source.as_ref(), ctx.working_copy())?;
    }
    let client = ctx.client()?;
    let ops = ctx.pr_operations(&client, &repo);

    match command {
        PrCommand::List {
            state,
            author,
            limit,
        } => {
            let outcome = ops
                .list(&ListOptions {
                    state,
                    author,
                    limit,
                })
                .await?;
            let mut printer = ctx.printer();
            printer.warnings(&outcome.warnings)?;
            if json {
                printer.json(&outcome.value)?;
            } else if outcome.value.is_empty() {
                printer.note(&format!("No pull requests match in {}", repo.full_name()))?;
            } else {
                let mut table = Table::new(vec!["ID", "TITLE", "BRANCH", "AUTHOR", "STATE"]);
                for pr in &outcome.value {
                    table.row(vec![
                        format!("#{}", pr.id),
                        pr.title.clone(),
                        pr.source_branch().to_string(),
                        pr.author.as_ref().map(|a| a.name().to_string()).unwrap_or_default(),
                        pr.state.to_string(),
                    ]);
                }
                printer.table(&table)?;
            }
        }
        PrCommand::View { selector, web } => {
            if web {
                let url = ops.web_url(selector.as_deref()).await?;
                ctx.printer().note(&format!("Opening {url} in your browser."))?;
                ctx.browser().open(&url)?;
                return Ok(());
            }
            let outcome = ops.view(selector.as_deref()).await?;
            let mut printer = ctx.printer();
            printer.warnings(&outcome.warnings)?;
            if json {
                printer.json(&outcome.value)?;
            } else {
                printer.out().write_all(pull_request_record(&outcome.value).as_bytes())?;
            }
        }
        PrCommand::Create {
            source,
            destination,
            title,
            body,
            reviewers,
            draft,
            fill,
        } => {
            let outcome = ops
                .create(&CreateOptions {
                    source,
                    destination,
                    title,
                    body,
                    reviewers,
                    draft,
                    fill,
                })
                .await?;
            let pr = &outcome.value;
            let mut printer = ctx.printer();
            printer.warnings(&outcome.warnings)?;
            if json {
                printer.json(pr)?;
            } else {
                printer.success(&format!(
                    "Created pull request #{} ({} → {})",
                    pr.id,
                    pr.source_branch(),
                    pr.destination_branch()
                ))?;
                printer.line(&pr.links.html_href().map_or_else(|| repo.pull_request_url(pr.id), ToString::to_string))?;
            }
        }
        PrCommand::Edit {
            selector,
            title,
            body,
            base,
        } => {
            let outcome = ops
                .edit(selector.as_deref(), &EditOptions { title, body, base })
                .await?;
            let mut printer = ctx.printer();
            if json {
                printer.json(&outcome.value)?;
            } else {
                printer.success(&format!("Updated pull request #{}", outcome.value.id))?;
            }
        }
        PrCommand::Checkout { selector, force } => {
            let outcome = ops.checkout(selector.as_deref(), force).await?;
            let mut printer = ctx.printer();
            printer.warnings(&outcome.warnings)?;
            printer.success(&format!(
                "Checked out branch '{}' for pull request #{}",
                outcome.value.branch, outcome.value.id
            ))?;
        }
        PrCommand::Merge {
            selector,
            squash,
            rebase,
            message,
            delete_branch,
            auto,
            yes,
        } => {
            let outcome = ops
                .merge(
                    selector.as_deref(),
                    &MergeOptions {
                        squash,
                        rebase,
                        message,
                        delete_branch,
                        auto,
                        yes,
                    },
                )
                .await?;
            let mut printer = ctx.printer();
            printer.warnings(&outcome.warnings)?;
            if let MergeResult::Merged {
                id,
                strategy,
                pull_request,
                deleted_branch,
            } = outcome.value
            {
                match (json, pull_request) {
                    (true, Some(pr)) => printer.json(&pr)?,
                    (true, None) => printer.json(&serde_json::json!({"id": id, "state": PrState::Merged}))?,
                    (false, _) => {
                        printer.success(&format!("Merged pull request #{id} ({strategy})"))?;
                        if let Some(branch) = deleted_branch {
                            printer.success(&format!("Deleted branch {branch}"))?;
                        }
                    }
                }
            }
        }
        PrCommand::Close { selector, comment } => {
            let outcome = ops.close(selector.as_deref(), comment.as_deref()).await?;
            let mut printer = ctx.printer();
            if json {
                printer.json(&outcome.value)?;
            } else {
                printer.success(&format!("Declined pull request #{}", outcome.value.id))?;
            }
        }
        PrCommand::Reopen { selector } => {
            let outcome = ops.reopen(selector.as_deref()).await?;
            let mut printer = ctx.printer();
            if json {
                printer.json(&outcome.value)?;
            } else {
                printer.success(&format!("Reopened pull request #{}", outcome.value.id))?;
            }
        }
        PrCommand::Comment { selector, body } => {
            let outcome = ops.comment(selector.as_deref(), body.as_deref()).await?;
            let mut printer = ctx.printer();
            if json {
                printer.json(&serde_json::json!({"id": outcome.value.id, "url": outcome.value.url}))?;
            } else {
                printer.line(&outcome.value.url)?;
            }
        }
        PrCommand::Review {
            selector,
            approve,
            request_changes,
            comment,
            body,
        } => {
            let outcome = ops
                .review(
                    selector.as_deref(),
                    &ReviewOptions {
                        approve,
                        request_changes,
                        comment,
                        body,
                    },
                )
                .await?;
            let (id, action) = outcome.value;
            ctx.printer()
                .success(&format!("{} pull request #{id}", action.past_tense()))?;
        }
        PrCommand::Diff { selector, no_color } => {
            let diff = ops.diff(selector.as_deref()).await?.value;
            let mut printer = ctx.printer();
            if printer.color_out() && !no_color {
                printer.out().write_all(colorize_diff(&diff).as_bytes())?;
            } else {
                printer.out().write_all(diff.as_bytes())?;
            }
        }
        PrCommand::Checks { selector } => {
            let statuses = ops.checks(selector.as_deref()).await?.value;
            let mut printer = ctx.printer();
            if json {
                printer.json(&statuses)?;
            } else if statuses.is_empty() {
                printer.note("No checks reported")?;
            } else {
                let mut table = Table::new(vec!["", "NAME", "STATE", "URL"]);
                for status in &statuses {
                    table.row(vec![
                        status_symbol(status.state).to_string(),
                        status.label().to_string(),
                        status.state.to_string(),
                        status.url.clone().unwrap_or_default(),
                    ]);
                }
                printer.table(&table)?;
            }
        }
    }
    Ok(())
}
