//! Command-line definitions.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Work with Bitbucket Cloud pull requests from the command line.
#[derive(Debug, Parser)]
#[command(name = "bkt", version, propagate_version = true)]
pub struct Cli {
    /// Repository to operate on, instead of the one detected from git.
    #[arg(short = 'R', long, global = true, value_name = "WORKSPACE/REPO")]
    pub repo: Option<String>,

    /// Print JSON instead of tables and records.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage pull requests
    Pr {
        #[command(subcommand)]
        command: PrCommand,
    },

    /// Manage branches on the service
    Branch {
        #[command(subcommand)]
        command: BranchCommand,
    },

    /// Manage workspace projects
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Open the repository in a web browser
    Browse,

    /// Print a shell completion script
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Read and write settings in config.json
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Pull request number, URL or branch name. Defaults to the current branch.
#[derive(Debug, Clone, Args)]
pub struct SelectorArg {
    #[arg(value_name = "NUMBER|URL|BRANCH")]
    pub selector: Option<String>,
}

impl SelectorArg {
    pub fn as_deref(&self) -> Option<&str> {
        self.selector.as_deref()
    }
}

#[derive(Debug, Subcommand)]
pub enum PrCommand {
    /// List pull requests
    List {
        /// OPEN, MERGED or DECLINED
        #[arg(short, long)]
        state: Option<String>,

        /// Only pull requests by this nickname
        #[arg(short, long)]
        author: Option<String>,

        #[arg(short = 'L', long, default_value_t = bkt_pr::ListOptions::DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Show a pull request
    View {
        #[command(flatten)]
        selector: SelectorArg,

        /// Open the pull request in a browser
        #[arg(short, long)]
        web: bool,
    },

    /// Open a pull request from a branch
    Create {
        /// Source branch; defaults to the current branch
        #[arg(short = 'H', long = "head")]
        source: Option<String>,

        /// Destination branch; defaults to the repository's main branch
        #[arg(short = 'B', long = "base")]
        destination: Option<String>,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        body: Option<String>,

        /// Nickname, account id or display name; repeatable or comma-separated
        #[arg(short, long = "reviewer", value_delimiter = ',')]
        reviewers: Vec<String>,

        /// Mark the title as a draft
        #[arg(short, long)]
        draft: bool,

        /// Fill an empty title and body from commit subjects
        #[arg(short, long)]
        fill: bool,
    },

    /// Change the title, description or destination of a pull request
    Edit {
        #[command(flatten)]
        selector: SelectorArg,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        body: Option<String>,

        /// New destination branch
        #[arg(short = 'B', long)]
        base: Option<String>,
    },

    /// Check out the source branch of a pull request
    Checkout {
        #[command(flatten)]
        selector: SelectorArg,

        /// Replace an existing local branch
        #[arg(short, long)]
        force: bool,
    },

    /// Merge a pull request
    Merge {
        #[command(flatten)]
        selector: SelectorArg,

        #[arg(short, long, conflicts_with = "rebase")]
        squash: bool,

        /// Fast-forward; Bitbucket has no rebase strategy
        #[arg(short, long)]
        rebase: bool,

        /// Merge commit message
        #[arg(short, long)]
        message: Option<String>,

        /// Delete the source branch after merging
        #[arg(short, long)]
        delete_branch: bool,

        /// Merge once requirements pass (unsupported)
        #[arg(long)]
        auto: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Decline a pull request
    Close {
        #[command(flatten)]
        selector: SelectorArg,

        /// Leave a comment before declining
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Reopen a declined pull request
    Reopen {
        #[command(flatten)]
        selector: SelectorArg,
    },

    /// Comment on a pull request
    Comment {
        #[command(flatten)]
        selector: SelectorArg,

        /// Comment text; opens an editor when omitted
        #[arg(short, long)]
        body: Option<String>,
    },

    /// Approve, request changes on, or comment on a pull request
    Review {
        #[command(flatten)]
        selector: SelectorArg,

        #[arg(short, long)]
        approve: bool,

        #[arg(short, long)]
        request_changes: bool,

        #[arg(short, long)]
        comment: bool,

        #[arg(short, long)]
        body: Option<String>,
    },

    /// Show the diff of a pull request
    Diff {
        #[command(flatten)]
        selector: SelectorArg,

        /// Print the diff without colour
        #[arg(long)]
        no_color: bool,
    },

    /// Show build statuses of a pull request
    Checks {
        #[command(flatten)]
        selector: SelectorArg,
    },
}

#[derive(Debug, Subcommand)]
pub enum BranchCommand {
    /// List branches
    List {
        #[arg(short = 'L', long, default_value_t = bkt_branch::DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Delete a branch on the service
    Delete {
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// List projects in the workspace
    List {
        #[arg(short = 'L', long, default_value_t = bkt_project::DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Show a project
    View { key: String },

    /// Create a project
    Create {
        key: String,

        /// Defaults to the key
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        private: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print a setting
    Get { key: String },

    /// Change a setting; an empty value clears it
    Set { key: String, value: String },

    /// Print every setting
    List,
}
