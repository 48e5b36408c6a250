use std::path::Path;

#[derive(Debug, Default)]
pub struct AssetSummary {
    pub yaml_files: usize,
    pub has_items: bool,
    pub has_caches: bool,
}

/// Shallow scan of the content root so startup can report what it found before
/// any of it is parsed.
pub fn scan(root: &Path) -> Result<AssetSummary, String> {
    let mut summary = AssetSummary::default();
    let entries = std::fs::read_dir(root)
        .map_err(|err| format!("content root {} unreadable: {}", root.display(), err))?;
    for entry in entries {
        let entry = entry.map_err(|err| format!("content root scan failed: {}", err))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.ends_with(".yaml") || name.ends_with(".yml") {
            summary.yaml_files += 1;
        }
        if name == crate::content::ITEMS_FILE {
            summary.has_items = true;
        }
        if name == crate::content::CACHES_FILE {
            summary.has_caches = true;
        }
    }
    Ok(summary)
}
