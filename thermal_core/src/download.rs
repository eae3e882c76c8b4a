//! # Report Download
//!
//! Saves an exported report under its fixed filename with atomic write
//! semantics:
//!
//! 1. Write the bytes to `<filename>.tmp` in the target directory
//! 2. Sync to disk (fsync)
//! 3. Rename over `<filename>` (atomic on most filesystems)
//!
//! A failed save never leaves the temporary file behind, and an existing
//! report is only replaced once the new one is complete.
//!
//! ## Example
//!
//! ```rust,no_run
//! use thermal_core::download::save_report;
//! use std::path::Path;
//!
//! let path = save_report(b"%PDF-1.4", Path::new("reports"), "fin_calculator_report.pdf")?;
//! assert!(path.ends_with("fin_calculator_report.pdf"));
//! # Ok::<(), thermal_core::errors::ThermalError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{ThermalError, ThermalResult};

/// Save `bytes` as `dir/filename`, creating `dir` if needed.
pub fn save_report(bytes: &[u8], dir: &Path, filename: &str) -> ThermalResult<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| {
        ThermalError::file_error("create directory", dir.display().to_string(), e.to_string())
    })?;

    let path = dir.join(filename);
    let tmp_path = dir.join(format!("{}.tmp", filename));

    if let Err(e) = write_synced(&tmp_path, bytes) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, &path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        ThermalError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(path = %path.display(), bytes = bytes.len(), "report saved");
    Ok(path)
}

fn write_synced(path: &Path, bytes: &[u8]) -> ThermalResult<()> {
    let mut file = File::create(path).map_err(|e| {
        ThermalError::file_error("create temp file", path.display().to_string(), e.to_string())
    })?;

    file.write_all(bytes).map_err(|e| {
        ThermalError::file_error("write temp file", path.display().to_string(), e.to_string())
    })?;

    file.sync_all().map_err(|e| {
        ThermalError::file_error("sync temp file", path.display().to_string(), e.to_string())
    })
}
