use std::{fs::remove_file, path::Path};

use anyhow::{Context, Result};

use crate::config::{TTF_FILENAME, WOFF_FILENAME, WOFF2_FILENAME};

/// Remove generated font files from `fonts_dir`. Returns the number removed.
pub fn clean(fonts_dir: &Path) -> Result<usize> {
    let mut removed = 0;

    for name in [TTF_FILENAME, WOFF_FILENAME, WOFF2_FILENAME] {
        let path = fonts_dir.join(name);
        if path.exists() {
            remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
            println!("Removed {}", path.display());
            removed += 1;
        } else {
            println!("Skipped {} (not found)", path.display());
        }
    }

    println!("Cleaned {removed} files");
    Ok(removed)
}
