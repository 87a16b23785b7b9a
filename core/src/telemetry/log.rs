use std::path::Path;

use log::{info, warn};

use crate::prelude::SceneError;

/// Scene-lifecycle log lines, with enough context to reproduce a failure.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn scene_started(&self, index: usize, total: usize, asset: &Path, output: &Path) {
        info!(
            "Generating scene {}: {} -> {}",
            scene_label(index, total),
            asset.display(),
            output.display()
        );
    }

    pub fn scene_failed(&self, index: usize, total: usize, asset: &Path, error: &SceneError) {
        warn!(
            "Scene {} ({}) failed in {:?}: {}",
            scene_label(index, total),
            asset.display(),
            error.state(),
            error
        );
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}

/// 1-based `n/total` used by every scene log line.
fn scene_label(index: usize, total: usize) -> String {
    format!("{}/{}", index + 1, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_numbers_are_one_based() {
        assert_eq!(scene_label(0, 3), "1/3");
        assert_eq!(scene_label(2, 3), "3/3");
    }
}
