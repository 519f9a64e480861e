//! Crash-safe file replacement.
//!
//! Data is written to a sibling temp file, flushed to disk and renamed over the
//! destination. A rename within one directory is atomic on the platforms we
//! target, so readers see either the old file or the complete new one.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to the destination file name for the temp copy.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Returns the temp path used while writing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}

/// Atomically replaces `path` with `data`.
///
/// The parent directory must already exist. On any failure the temp file is
/// removed and the previous content of `path` is left untouched.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let temp = temp_path(path);

    let result = write_and_sync(&temp, data).and_then(|()| std::fs::rename(&temp, path));

    if result.is_err() {
        let _ = std::fs::remove_file(&temp);
    }
    result
}

fn write_and_sync(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
