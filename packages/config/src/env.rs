//! Snapshot of the process environment.

use std::collections::BTreeMap;

/// Raw bearer token override.
pub const BKT_TOKEN: &str = "BKT_TOKEN";
/// Disables colour when set to anything.
pub const NO_COLOR: &str = "NO_COLOR";
pub const BKT_NO_COLOR: &str = "BKT_NO_COLOR";
pub const BKT_EDITOR: &str = "BKT_EDITOR";
pub const VISUAL: &str = "VISUAL";
pub const EDITOR: &str = "EDITOR";
pub const BKT_BROWSER: &str = "BKT_BROWSER";
pub const BROWSER: &str = "BROWSER";
/// Overrides the configuration directory.
pub const BKT_CONFIG_DIR: &str = "BKT_CONFIG_DIR";

/// Environment variables visible to a command.
///
/// Empty values are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    #[must_use]
    pub fn system() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build an environment from explicit pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The value of `name`, if set and non-empty.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// The first set variable among `names`.
    #[must_use]
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.get(name))
    }

    /// Whether `name` is present at all, even when empty.
    ///
    /// `NO_COLOR` is honoured regardless of its value.
    #[must_use]
    pub fn is_present(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}
