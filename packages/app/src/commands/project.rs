use bkt_project::CreateProject;

use crate::AppContext;
use crate::cli::ProjectCommand;
use crate::output::{Table, project_record};

pub async fn run(
    ctx: &mut AppContext,
    repo: Option<&str>,
    json: bool,
    command: ProjectCommand,
) -> anyhow::Result<()> {
    let workspace = ctx.resolve_workspace(repo)?;
    let client = ctx.client()?;

    match command {
        ProjectCommand::List { limit } => {
            let projects = bkt_project::list(&client, &workspace, limit).await?;
            let mut printer = ctx.printer();
            if json {
                printer.json(&projects)?;
            } else if projects.is_empty() {
                printer.note(&format!("No projects in {workspace}"))?;
            } else {
                let mut table = Table::new(vec!["KEY", "NAME", "VISIBILITY"]);
                for project in projects {
                    let visibility = if project.is_private { "private" } else { "public" };
                    table.row(vec![project.key, project.name, visibility.to_string()]);
                }
                printer.table(&table)?;
            }
        }
        ProjectCommand::View { key } => {
            let project = bkt_project::view(&client, &workspace, &key).await?;
            let mut printer = ctx.printer();
            if json {
                printer.json(&project)?;
            } else {
                printer.line(project_record(&project).trim_end())?;
            }
        }
        ProjectCommand::Create {
            key,
            name,
            description,
            private,
        } => {
            let project = bkt_project::create(
                &client,
                &workspace,
                &CreateProject {
                    key,
                    name,
                    description,
                    private,
                },
            )
            .await?;
            let mut printer = ctx.printer();
            if json {
                printer.json(&project)?;
            } else {
                printer.success(&format!("Created project {} in {workspace}", project.key))?;
            }
        }
    }
    Ok(())
}
