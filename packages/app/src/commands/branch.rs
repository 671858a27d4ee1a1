use crate::AppContext;
use crate::cli::BranchCommand;
use crate::output::Table;

pub async fn run(
    ctx: &mut AppContext,
    repo: Option<&str>,
    json: bool,
    command: BranchCommand,
) -> anyhow::Result<()> {
    let repo = ctx.resolve_repo(repo)?;
    let client = ctx.client()?;

    match command {
        BranchCommand::List { limit } => {
            let branches = bkt_branch::list(&client, &repo, limit).await?;
            let mut printer = ctx.printer();
            if json {
                printer.json(&branches)?;
            } else if branches.is_empty() {
                printer.note(&format!("No branches in {}", repo.full_name()))?;
            } else {
                let mut table = Table::new(vec!["NAME", "COMMIT", "MESSAGE"]);
                for branch in branches {
                    table.row(vec![branch.name, branch.hash, branch.message]);
                }
                printer.table(&table)?;
            }
        }
        BranchCommand::Delete { name, force } => {
            bkt_branch::delete(&client, &repo, &name, force, ctx.prompter()).await?;
            ctx.printer().success(&format!("Deleted branch {name}"))?;
        }
    }
    Ok(())
}
