//! Output directory preparation.

use std::path::Path;

/// Empty `dir`, or create it (and any parents) if it does not exist.
///
/// Everything inside is removed, including subdirectories; the directory
/// itself is kept.
pub fn clean_or_create_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.exists() {
        return std::fs::create_dir_all(dir);
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            std::fs::remove_dir_all(&path)?;
        } else {
            std::fs::remove_file(&path)?;
        }
    }

    Ok(())
}
