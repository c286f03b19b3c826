//! Per-repository sync pipeline
//!
//! Four stages run for every configured repository:
//! 1. Branch guard - both branches must exist (read-only, paginated)
//! 2. Pull request - open `origin` -> `target` with the shared pattern
//! 3. Merge - merge the PR created in stage 2
//! 4. Release - optional, tag the merge commit
//!
//! Release runs add a version bump of the origin branch's manifest before the
//! merge and a version branch after the release.
//!
//! Each stage consumes the previous stage's [`StageResult`] and produces its
//! own. A failed repository short-circuits every later stage without a
//! network call. Repositories run concurrently, with a barrier between
//! phases: every PR creation settles before any merge starts, and every
//! merge settles before any release starts.

mod guard;
mod merge;
mod progress;
mod pull_request;
mod release;
mod run;
mod stage;
mod version;

pub use guard::{check_branches, guard_branches};
pub use merge::{merge_pull_request, merge_pull_requests};
pub use progress::{NoProgress, ProgressCallback};
pub use pull_request::{create_pull_request, open_pull_requests};
pub use release::{create_release, create_releases};
pub use run::{SyncOptions, SyncReport, run_sync};
pub use stage::{Outcome, RepoState, Stage, StageResult};
pub use version::{
    BUMP_COMMIT_MESSAGE, Manifest, bump_version, bump_versions, create_version_branch,
    create_version_branches,
};
