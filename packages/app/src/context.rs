//! Per-invocation state threaded through every command.

use std::path::PathBuf;

use bkt_auth::{CredentialResolver, CredentialStore, KeyringStore};
use bkt_bitbucket::{BitbucketClient, DEFAULT_BASE_URL};
use bkt_config::{Config, ConfigError, Environment, HostsConfig, config_dir};
use bkt_context::{ContextError, RepoContextResolver};
use bkt_git_backend::{GitBackend, GitBackendError, GitRepository};
use bkt_git_backend_git2::Git2Backend;
use bkt_pr::PrOperations;
use bkt_repo_ref::RepoRef;
use bkt_terminal::{Browser, Editor, Prompter, StdinPrompter, TextEditor, color_enabled};

use crate::output::{Io, Printer};

/// Everything a command needs besides its arguments.
///
/// The REST client is built on demand by [`AppContext::client`] so commands
/// that never talk to the service (`config`, `completion`, `browse`) work
/// without a credential.
pub struct AppContext {
    pub env: Environment,
    pub config: Config,
    io: Io,
    working_copy: Result<Box<dyn GitRepository>, GitBackendError>,
    prompter: Box<dyn Prompter>,
    editor: Box<dyn TextEditor>,
    browser: Browser,
    credentials: Box<dyn CredentialStore>,
    base_url: String,
}

impl AppContext {
    /// Build the context from the process environment and current directory.
    ///
    /// # Errors
    ///
    /// * The config file exists but cannot be read or parsed.
    /// * The current directory is not accessible.
    pub fn from_system() -> anyhow::Result<Self> {
        let env = Environment::system();
        let config = match config_dir(&env) {
            Ok(dir) => Config::load(&dir)?,
            Err(e) => {
                log::debug!("Using default configuration: {e}");
                Config::default()
            }
        };
        let cwd = std::env::current_dir()?;
        let working_copy = Git2Backend::new().discover(&cwd);

        Ok(Self::new(env, config, Io::system(), working_copy))
    }

    #[must_use]
    pub fn new(
        env: Environment,
        config: Config,
        io: Io,
        working_copy: Result<Box<dyn GitRepository>, GitBackendError>,
    ) -> Self {
        let editor = Editor::resolve(&env, config.editor.as_deref());
        let browser = Browser::resolve(&env, config.browser.as_deref());
        Self {
            env,
            config,
            io,
            working_copy,
            prompter: Box::new(StdinPrompter),
            editor: Box::new(editor),
            browser,
            credentials: Box::new(KeyringStore::new()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_prompter(mut self, prompter: Box<dyn Prompter>) -> Self {
        self.prompter = prompter;
        self
    }

    #[must_use]
    pub fn with_editor(mut self, editor: Box<dyn TextEditor>) -> Self {
        self.editor = editor;
        self
    }

    #[must_use]
    pub fn with_browser(mut self, browser: Browser) -> Self {
        self.browser = browser;
        self
    }

    #[must_use]
    pub fn with_credential_store(mut self, store: Box<dyn CredentialStore>) -> Self {
        self.credentials = store;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// # Errors
    ///
    /// * [`ConfigError::NoConfigDir`] when no directory can be determined.
    pub fn config_dir(&self) -> Result<PathBuf, ConfigError> {
        config_dir(&self.env)
    }

    pub fn working_copy(&self) -> Option<&dyn GitRepository> {
        self.working_copy.as_deref().ok()
    }

    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }

    pub const fn browser(&self) -> &Browser {
        &self.browser
    }

    fn resolver(&self) -> RepoContextResolver<'_> {
        RepoContextResolver::new(
            self.config.default_workspace.as_deref(),
            self.working_copy.as_deref(),
        )
    }

    /// # Errors
    ///
    /// See [`RepoContextResolver::resolve_repo`].
    pub fn resolve_repo(&self, flag: Option<&str>) -> Result<RepoRef, ContextError> {
        self.resolver().resolve_repo(flag)
    }

    /// # Errors
    ///
    /// See [`RepoContextResolver::resolve_workspace`].
    pub fn resolve_workspace(&self, flag: Option<&str>) -> Result<String, ContextError> {
        self.resolver().resolve_workspace(flag)
    }

    /// Resolve a credential and build an authenticated client.
    ///
    /// # Errors
    ///
    /// * No credential could be found.
    /// * The HTTP client cannot be constructed.
    pub fn client(&self) -> anyhow::Result<BitbucketClient> {
        let hosts = self
            .config_dir()
            .and_then(|dir| HostsConfig::load(&dir))
            .unwrap_or_else(|e| {
                log::warn!("Ignoring hosts file: {e}");
                HostsConfig::default()
            });
        let credential =
            CredentialResolver::new(&self.env, &hosts, self.credentials.as_ref()).resolve()?;
        log::debug!("Using credential from {:?}", credential.source());

        Ok(BitbucketClient::new(credential.token())?.with_base_url(&self.base_url))
    }

    pub fn pr_operations<'a>(
        &'a self,
        client: &'a BitbucketClient,
        repo: &'a RepoRef,
    ) -> PrOperations<'a> {
        PrOperations::new(
            client,
            repo,
            self.working_copy(),
            self.prompter.as_ref(),
            self.editor.as_ref(),
        )
    }

    /// Whether stdout output should be coloured.
    pub fn color_stdout(&self) -> bool {
        color_enabled(&self.env, self.config.no_color, self.io.stdout_is_terminal)
    }

    /// Whether stderr output should be coloured.
    pub fn color_stderr(&self) -> bool {
        color_enabled(&self.env, self.config.no_color, self.io.stderr_is_terminal)
    }

    pub fn printer(&mut self) -> Printer<'_> {
        let color_out = self.color_stdout();
        let color_err = self.color_stderr();
        self.io.printer(color_out, color_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bkt_config::{BKT_CONFIG_DIR, BKT_TOKEN};
    use bkt_testing::FakeGitRepository;

    fn context(env: Environment, working_copy: Result<Box<dyn GitRepository>, GitBackendError>) -> AppContext {
        AppContext::new(env, Config::default(), Io::captured().0, working_copy)
    }

    #[test]
    fn test_repo_flag_wins_over_detection() {
        let fake = FakeGitRepository::new().with_remote("origin", "git@bitbucket.org:acme/widgets.git");
        let ctx = context(Environment::default(), Ok(Box::new(fake)));

        assert_eq!(ctx.resolve_repo(Some("other/repo")).unwrap(), RepoRef::new("other", "repo"));
        assert_eq!(ctx.resolve_repo(None).unwrap(), RepoRef::new("acme", "widgets"));
    }

    #[test]
    fn test_default_workspace_from_config() {
        let mut ctx = context(
            Environment::default(),
            Err(GitBackendError::NotAWorkingCopy {
                path: "/tmp".to_string(),
            }),
        );
        ctx.config.default_workspace = Some("acme".to_string());

        assert_eq!(ctx.resolve_workspace(None).unwrap(), "acme");
        assert!(ctx.working_copy().is_none());
    }

    #[test]
    fn test_client_uses_env_token() {
        let ctx = context(
            Environment::from_pairs([(BKT_TOKEN, "tok"), (BKT_CONFIG_DIR, "/nonexistent/bkt")]),
            Err(GitBackendError::DetachedHead),
        );
        assert!(ctx.client().is_ok());
    }

    #[test]
    fn test_no_color_disables_color() {
        let ctx = context(
            Environment::from_pairs([("NO_COLOR", "")]),
            Err(GitBackendError::DetachedHead),
        );
        assert!(!ctx.color_stdout());
        assert!(!ctx.color_stderr());
    }
}
