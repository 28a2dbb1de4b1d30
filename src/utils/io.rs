//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

/// Read file contents with standardized error handling.
///
/// Never creates the file. A missing file is reported as "file not found"
/// rather than the raw OS message.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        let message = if e.kind() == io::ErrorKind::NotFound {
            format!("file not found: {}", path.display())
        } else {
            format!("failed to read {}: {}", path.display(), e)
        };
        Error::internal_io(message, Some(operation.to_string())).with_cause(e)
    })
}

/// Write content to file atomically (write to a sibling temp file, then rename).
///
/// Readers see either the old content or the new content, never a partial
/// write. Permissions of an existing target are carried over.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let io_err = |e: io::Error, step: &str| {
        Error::internal_io(
            format!("failed to write {}: {}", path.display(), e),
            Some(format!("{} ({})", operation, step)),
        )
        .with_cause(e)
    };

    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let perms = fs::metadata(path).map(|m| m.permissions()).ok();

    let mut attempt: u32 = 0;
    let (tmp_path, mut file) = loop {
        let candidate: PathBuf = parent.join(format!(
            ".{}.tmp.{}.{}",
            filename.to_string_lossy(),
            process::id(),
            attempt
        ));
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(f) => break (candidate, f),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(io_err(e, "create temp")),
        }
    };

    let written = file
        .write_all(content.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| io_err(e, "write temp"));
    drop(file);

    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    if let Some(p) = perms {
        let _ = fs::set_permissions(&tmp_path, p);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_err(e, "rename")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_reports_missing_file_without_creating_it() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("version.go");

        let err = read_file(&missing, "test read").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert!(err.message.starts_with("file not found"));
        assert!(!missing.exists());
    }

    #[test]
    fn write_file_atomic_replaces_content_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("version.go");
        fs::write(&path, "old").unwrap();

        write_file_atomic(&path, "new content", "test write").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new content");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn write_file_atomic_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("version.go");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_file_atomic(&path, "new", "test write").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn write_file_atomic_returns_error_for_missing_dir() {
        let result = write_file_atomic(
            Path::new("/nonexistent/dir/file.txt"),
            "content",
            "test write",
        );
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }
}
