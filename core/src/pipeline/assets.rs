use std::path::{Path, PathBuf};

use serde::Serialize;

/// A discovered model file, handed opaquely to the host importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
    pub path: PathBuf,
}

/// Read-only pool of assets for one batch run.
#[derive(Debug, Clone)]
pub struct AssetPool {
    origin: PathBuf,
    assets: Vec<AssetRecord>,
}

impl AssetPool {
    pub fn new(origin: impl Into<PathBuf>, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            origin: origin.into(),
            assets: paths.into_iter().map(|path| AssetRecord { path }).collect(),
        }
    }

    /// Directory the pool was enumerated from.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn assets(&self) -> &[AssetRecord] {
        &self.assets
    }

    /// Round-robin selection: scene `index` uses asset `index mod len`.
    /// Returns `None` only for an empty pool.
    pub fn select(&self, index: usize) -> Option<(usize, &AssetRecord)> {
        if self.assets.is_empty() {
            return None;
        }
        let slot = index % self.assets.len();
        Some((slot, &self.assets[slot]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(size: usize) -> AssetPool {
        AssetPool::new(
            "models",
            (0..size).map(|i| PathBuf::from(format!("models/m{i}.fbx"))),
        )
    }

    #[test]
    fn select_cycles_through_pool() {
        let pool = pool(3);
        let picked: Vec<usize> = (0..7).filter_map(|i| pool.select(i)).map(|(s, _)| s).collect();
        assert_eq!(picked, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn round_robin_law_holds_for_larger_batches() {
        for size in 1..6 {
            let pool = pool(size);
            for index in 0..(size * 4 + 1) {
                let (slot, asset) = pool.select(index).unwrap();
                assert_eq!(slot, index % size);
                assert_eq!(asset, &pool.assets()[index % size]);
            }
        }
    }

    #[test]
    fn empty_pool_selects_nothing() {
        assert!(pool(0).select(0).is_none());
        assert!(pool(0).is_empty());
    }
}
