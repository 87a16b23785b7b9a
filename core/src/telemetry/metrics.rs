use std::sync::Mutex;

use serde::Serialize;

use crate::prelude::{PipelineState, SceneError};

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Per-batch scene counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub attempted: usize,
    pub succeeded: usize,
    pub baseline_failures: usize,
    pub asset_failures: usize,
    pub configure_failures: usize,
    pub render_failures: usize,
}

impl MetricsSnapshot {
    pub fn failed(&self) -> usize {
        self.baseline_failures
            + self.asset_failures
            + self.configure_failures
            + self.render_failures
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_attempt(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.attempted += 1;
        }
    }

    pub fn record_success(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.succeeded += 1;
        }
    }

    pub fn record_failure(&self, error: &SceneError) {
        if let Ok(mut metrics) = self.inner.lock() {
            match error.state() {
                PipelineState::Init => metrics.baseline_failures += 1,
                PipelineState::AssetLoading => metrics.asset_failures += 1,
                PipelineState::Configuring => metrics.configure_failures += 1,
                PipelineState::Rendering => metrics.render_failures += 1,
                PipelineState::Done | PipelineState::Failed => {}
            }
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
