use anyhow::Context;
use fallcore::AssetPool;
use log::info;
use std::fs;
use std::path::Path;

/// Lists the model files directly inside `dir` whose extension matches
/// `extension` (case-insensitive), sorted by path.
pub fn scan_assets(dir: &Path, extension: &str) -> anyhow::Result<AssetPool> {
    let wanted = extension.trim_start_matches('.');
    let entries = fs::read_dir(dir)
        .with_context(|| format!("reading model directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, wanted) {
            paths.push(path);
        }
    }
    paths.sort();

    info!("found {} .{} models in {}", paths.len(), wanted, dir.display());
    Ok(AssetPool::new(dir, paths))
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.fbx", "a.FBX", "notes.txt", "c.obj"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.fbx")).unwrap();

        let pool = scan_assets(dir.path(), "fbx").unwrap();
        let names: Vec<_> = pool
            .assets()
            .iter()
            .filter_map(|asset| asset.path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.FBX", "b.fbx"]);
        assert_eq!(pool.origin(), dir.path());
    }

    #[test]
    fn empty_directory_yields_empty_pool() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_assets(dir.path(), ".fbx").unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_assets(&dir.path().join("absent"), "fbx").is_err());
    }
}
