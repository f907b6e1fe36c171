use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use fs2::FileExt;

use crate::error::TuckError;

static TEMP_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

const HASH_HEX_LEN: usize = 16;

/// Advisory exclusive lock held for the whole read-wrap-write cycle.
#[derive(Debug)]
pub(super) struct WrapFileLock {
    _file: File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AtomicWritePhase {
    TempWritten,
    TempSynced,
    Renamed,
}

pub(super) fn acquire_wrap_lock(path: &Path) -> Result<WrapFileLock, TuckError> {
    let file = OpenOptions::new()
        .truncate(false)
        .read(true)
        .write(true)
        .open(path)
        .map_err(|error| TuckError::io(path, error))?;

    file.try_lock_exclusive().map_err(|error| {
        if error.kind() == std::io::ErrorKind::WouldBlock {
            TuckError::ResourceBusy {
                path: path.display().to_string(),
            }
        } else {
            TuckError::io(path, error)
        }
    })?;

    Ok(WrapFileLock { _file: file })
}

pub(super) fn hash_text(text: &str) -> String {
    let full_hex = blake3::hash(text.as_bytes()).to_hex().to_string();
    full_hex[..HASH_HEX_LEN.min(full_hex.len())].to_string()
}

/// Fails when the file no longer holds the text the wrap was computed from.
pub(super) fn verify_source_unchanged(path: &Path, expected_hash: &str) -> Result<(), TuckError> {
    let current = fs::read_to_string(path).map_err(|error| TuckError::io(path, error))?;
    let actual_hash = hash_text(&current);
    if actual_hash != expected_hash {
        return Err(TuckError::SourceChanged {
            path: path.display().to_string(),
            expected_hash: expected_hash.to_string(),
            actual_hash,
        });
    }

    Ok(())
}

pub(super) fn write_text_atomically(
    path: &Path,
    contents: &str,
    expected_hash: &str,
) -> Result<(), TuckError> {
    write_text_atomically_with_hook(path, contents, expected_hash, |_| Ok(()))
}

pub(super) fn write_text_atomically_with_hook<F>(
    path: &Path,
    contents: &str,
    expected_hash: &str,
    mut phase_hook: F,
) -> Result<(), TuckError>
where
    F: FnMut(AtomicWritePhase) -> std::io::Result<()>,
{
    let target_permissions = fs::metadata(path)
        .map_err(|error| TuckError::io(path, error))?
        .permissions();
    let (temp_path, mut temp_file) = create_temp_file_adjacent(path)?;

    let result = (|| {
        temp_file
            .write_all(contents.as_bytes())
            .map_err(|error| TuckError::io(&temp_path, error))?;
        phase_hook(AtomicWritePhase::TempWritten).map_err(|error| TuckError::io(path, error))?;

        temp_file
            .sync_all()
            .map_err(|error| TuckError::io(&temp_path, error))?;
        phase_hook(AtomicWritePhase::TempSynced).map_err(|error| TuckError::io(path, error))?;

        verify_source_unchanged(path, expected_hash)?;

        fs::set_permissions(&temp_path, target_permissions.clone())
            .map_err(|error| TuckError::io(&temp_path, error))?;
        drop(temp_file);

        fs::rename(&temp_path, path).map_err(|error| TuckError::io(path, error))?;
        phase_hook(AtomicWritePhase::Renamed).map_err(|error| TuckError::io(path, error))?;

        sync_parent_directory(path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn create_temp_file_adjacent(path: &Path) -> Result<(PathBuf, File), TuckError> {
    let parent = resolve_parent_directory(path);
    let file_name = path
        .file_name()
        .and_then(|value| value.to_str())
        .unwrap_or("tuck-target");

    for _ in 0..64 {
        let counter = TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_nanos());
        let temp_path = parent.join(format!(".{file_name}.tuck-tmp-{nanos}-{counter}"));

        match OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp_path)
        {
            Ok(file) => return Ok((temp_path, file)),
            Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(error) => return Err(TuckError::io(&temp_path, error)),
        }
    }

    Err(TuckError::InvalidRequest {
        message: format!(
            "Failed to allocate an adjacent temporary file for '{}'",
            path.display()
        ),
    })
}

fn resolve_parent_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn sync_parent_directory(path: &Path) -> Result<(), TuckError> {
    #[cfg(unix)]
    {
        let parent = resolve_parent_directory(path);
        let directory_handle = File::open(&parent).map_err(|error| TuckError::io(&parent, error))?;
        directory_handle
            .sync_all()
            .map_err(|error| TuckError::io(&parent, error))
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        Ok(())
    }
}
