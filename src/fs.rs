//! File system utilities.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes content to a file atomically using a temp file and rename.
///
/// This prevents file corruption if the process is interrupted (e.g., Ctrl+C).
/// The temp file is created in the same directory as the target file so the
/// rename stays on one filesystem. Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the temp file
/// cannot be written or renamed.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    write_via_temp(path, content.as_bytes(), false)
}

/// Like [`atomic_write`], but the file is readable only by its owner from the
/// moment it is created. No bytes of `content` are ever on disk with wider
/// permissions. On non-Unix platforms this is [`atomic_write`].
pub fn atomic_write_private(path: &Path, content: &[u8]) -> Result<()> {
    write_via_temp(path, content, true)
}

fn write_via_temp(path: &Path, content: &[u8], private: bool) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let temp_path = temp_path_for(path, parent);

    if let Err(e) = write_temp(&temp_path, content, private) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("Failed to write {}", temp_path.display()));
    }

    fs::rename(&temp_path, path).with_context(|| {
        let _ = fs::remove_file(&temp_path);
        format!("Failed to replace {}", path.display())
    })
}

/// Creates the temp file fresh so a leftover from an earlier run cannot
/// carry its permissions over.
fn write_temp(temp_path: &Path, content: &[u8], private: bool) -> std::io::Result<()> {
    match fs::remove_file(temp_path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if private {
            options.mode(0o600);
        }
    }
    #[cfg(not(unix))]
    let _ = private;

    let mut file = options.open(temp_path)?;
    file.write_all(content)?;
    file.sync_all()
}

fn temp_path_for(path: &Path, parent: &Path) -> PathBuf {
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    parent.join(format!(".{file_name}.tmp"))
}
