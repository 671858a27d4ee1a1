use std::collections::BTreeMap;

use bkt_config::ConfigKey;

use crate::AppContext;
use crate::cli::ConfigCommand;

pub fn run(ctx: &mut AppContext, json: bool, command: ConfigCommand) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Get { key } => {
            let value = ctx.config.get(ConfigKey::parse(&key)?).unwrap_or_default();
            ctx.printer().line(&value)?;
        }
        ConfigCommand::Set { key, value } => {
            let key = ConfigKey::parse(&key)?;
            let dir = ctx.config_dir()?;
            ctx.config.set(key, &value)?;
            ctx.config.save(&dir)?;
            log::debug!("Set {key} in {}", dir.display());
        }
        ConfigCommand::List => {
            let entries = ctx.config.entries();
            let mut printer = ctx.printer();
            if json {
                let map: BTreeMap<String, Option<String>> = entries
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value))
                    .collect();
                printer.json(&map)?;
            } else {
                for (key, value) in entries {
                    printer.line(&format!("{key}={}", value.unwrap_or_default()))?;
                }
            }
        }
    }
    Ok(())
}
