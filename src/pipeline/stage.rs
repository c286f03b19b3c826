//! Stage results and the per-repository state machine

use crate::error::Error;
use crate::types::RepoId;

/// One of the pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Both branches exist
    BranchCheck,
    /// Pull request creation (includes the pre-flight wait and branch check)
    PullRequest,
    /// Manifest version bump on the origin branch (release runs only)
    VersionBump,
    /// Pull request merge
    Merge,
    /// Release creation
    Release,
    /// Version branch creation after the release
    VersionBranch,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BranchCheck => write!(f, "branch check"),
            Self::PullRequest => write!(f, "pull request"),
            Self::VersionBump => write!(f, "version bump"),
            Self::Merge => write!(f, "merge"),
            Self::Release => write!(f, "release"),
            Self::VersionBranch => write!(f, "version branch"),
        }
    }
}

/// Outcome of one stage for one repository
///
/// A failure is a value: the errors travel with the repository through every
/// later stage instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageResult<T> {
    /// The stage succeeded
    Success {
        /// Repository the result belongs to
        repo: RepoId,
        /// Stage payload
        value: T,
    },
    /// The stage (or an earlier one) failed
    Failure {
        /// Repository the result belongs to
        repo: RepoId,
        /// Errors in the order they were found
        errors: Vec<Error>,
    },
}

impl<T> StageResult<T> {
    /// Successful result
    pub const fn success(repo: RepoId, value: T) -> Self {
        Self::Success { repo, value }
    }

    /// Failed result with several errors
    pub const fn failure(repo: RepoId, errors: Vec<Error>) -> Self {
        Self::Failure { repo, errors }
    }

    /// Failed result with a single error
    pub fn failed(repo: RepoId, error: Error) -> Self {
        Self::Failure {
            repo,
            errors: vec![error],
        }
    }

    /// Repository this result belongs to
    pub const fn repo(&self) -> &RepoId {
        match self {
            Self::Success { repo, .. } | Self::Failure { repo, .. } => repo,
        }
    }

    /// Whether the stage succeeded
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Success payload, if any
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    /// Errors of a failed result (empty on success)
    pub fn errors(&self) -> &[Error] {
        match self {
            Self::Success { .. } => &[],
            Self::Failure { errors, .. } => errors,
        }
    }

    /// Continue with the success payload, or carry the failure forward
    ///
    /// The returned failure has the next stage's output type and the same
    /// repository and errors.
    pub fn proceed<U>(&self) -> Result<(&RepoId, &T), StageResult<U>> {
        match self {
            Self::Success { repo, value } => Ok((repo, value)),
            Self::Failure { repo, errors } => Err(StageResult::Failure {
                repo: repo.clone(),
                errors: errors.clone(),
            }),
        }
    }
}

/// How a stage ended for a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Stage succeeded
    Ok,
    /// Stage failed, or an earlier stage did
    Failed,
    /// Stage was not run (release without a release name)
    Skipped,
}

impl<T> From<&StageResult<T>> for Outcome {
    fn from(result: &StageResult<T>) -> Self {
        if result.is_success() {
            Self::Ok
        } else {
            Self::Failed
        }
    }
}

/// Where a repository is in the pipeline
///
/// `Pending -> BranchChecked -> PrCreated -> Merged -> Released`. Once a
/// state is failed, every later state is failed too. On release runs the
/// version bump counts towards `PrCreated` and the version branch towards
/// `Released`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoState {
    /// Nothing has run yet
    Pending,
    /// Branch guard finished
    BranchChecked(Outcome),
    /// PR stage finished
    PrCreated(Outcome),
    /// Merge stage finished
    Merged(Outcome),
    /// Release stage finished or was skipped for the run
    Released(Outcome),
}

impl RepoState {
    /// Outcome of the latest finished stage (`None` while pending)
    pub const fn outcome(self) -> Option<Outcome> {
        match self {
            Self::Pending => None,
            Self::BranchChecked(o) | Self::PrCreated(o) | Self::Merged(o) | Self::Released(o) => {
                Some(o)
            }
        }
    }

    /// Whether this repository has failed at some stage
    pub const fn is_failed(self) -> bool {
        matches!(self.outcome(), Some(Outcome::Failed))
    }

    /// Move to the next state with the given stage outcome
    ///
    /// A failed repository stays failed regardless of `outcome`. `Released`
    /// is terminal.
    #[must_use]
    pub const fn advance(self, outcome: Outcome) -> Self {
        let outcome = if self.is_failed() {
            Outcome::Failed
        } else {
            outcome
        };
        match self {
            Self::Pending => Self::BranchChecked(outcome),
            Self::BranchChecked(_) => Self::PrCreated(outcome),
            Self::PrCreated(_) => Self::Merged(outcome),
            Self::Merged(_) => Self::Released(outcome),
            Self::Released(_) => self,
        }
    }
}
