//! Stage observer backed by tracing
//!
//! The domain reports pipeline progress through the `StageObserver` port;
//! this implementation forwards the events to the tracing subscriber.
//! Logging never blocks or fails the pipeline.

use tracing::info;
use voxify_domain::conversion::Stage;
use voxify_domain::ports::StageObserver;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStageObserver;

impl StageObserver for TracingStageObserver {
    fn stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        info!(stage = stage.as_str(), elapsed_ms, "Conversion stage complete");
    }
}
