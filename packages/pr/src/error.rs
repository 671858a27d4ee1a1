use bkt_bitbucket::BitbucketError;
use bkt_bitbucket::models::PrState;
use bkt_context::ContextError;
use bkt_git_backend::GitBackendError;
use bkt_terminal::TerminalError;

/// Errors from pull-request operations.
#[derive(Debug, thiserror::Error)]
pub enum PrError {
    #[error("invalid state \"{value}\"; expected one of OPEN, MERGED, DECLINED")]
    InvalidState { value: String },

    #[error("cannot create a pull request from branch \"{branch}\"")]
    ProtectedSource { branch: String },

    #[error("a pull request for branch \"{branch}\" already exists: {url}")]
    PrAlreadyExists { branch: String, url: String },

    #[error("a title is required; pass --title or --fill")]
    MissingTitle,

    #[error("nothing to edit; pass --title, --body or --base")]
    NothingToEdit,

    #[error("branch '{branch}' already exists locally. Use --force to overwrite")]
    BranchExists { branch: String },

    #[error("cannot overwrite branch '{branch}' while it is checked out")]
    BranchCheckedOut { branch: String },

    #[error("pull request #{id} is not open (state: {state})")]
    MergeStateInvalid { id: u64, state: PrState },

    #[error("merge cancelled")]
    MergeCancelled,

    #[error("cannot confirm {action} in non-interactive mode; pass --yes")]
    ConfirmationRequired { action: String },

    #[error("pull request #{id} cannot be reopened (state: {state})")]
    ReopenInvalid { id: u64, state: PrState },

    #[error("specify exactly one of --approve, --request-changes or --comment")]
    InvalidReviewAction,

    #[error("comment body is empty")]
    EmptyBody,

    #[error("this command must be run inside a git working copy")]
    NoWorkingCopy,

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Api(#[from] BitbucketError),

    #[error(transparent)]
    WorkingCopy(#[from] GitBackendError),

    #[error(transparent)]
    Terminal(#[from] TerminalError),
}
