//! Progress reporting for pipeline phases

use super::Stage;
use async_trait::async_trait;

/// Receives phase start/finish notifications from the orchestrator
///
/// The CLI drives spinners from these; tests use [`NoProgress`].
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// A fleet-wide phase is starting
    async fn on_phase_start(&self, stage: Stage, repositories: usize);

    /// Every repository has settled for this phase
    async fn on_phase_complete(&self, stage: Stage, succeeded: usize, failed: usize);
}

/// Progress callback that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

#[async_trait]
impl ProgressCallback for NoProgress {
    async fn on_phase_start(&self, _stage: Stage, _repositories: usize) {}

    async fn on_phase_complete(&self, _stage: Stage, _succeeded: usize, _failed: usize) {}
}
