use crate::output::traits::{OutputError, OutputResult};
use std::path::{Path, PathBuf};

/// File name of the snapshot taken when the listing page cannot be loaded
pub const LISTING_ERROR_SLUG: &str = "listing-page-error";

/// Saves a raw page snapshot as `<dir>/<slug>.html`
pub fn save_debug_html(dir: &Path, slug: &str, html: &str) -> OutputResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::Open {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(format!("{}.html", slug));
    std::fs::write(&path, html)?;

    tracing::debug!("Saved debug snapshot to {}", path.display());
    Ok(path)
}
