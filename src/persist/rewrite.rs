use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Replace the contents of `path` without ever leaving a partial file.
///
/// The new contents go to a temporary file in the same directory, which is
/// then renamed over the original. The original file's permissions are kept.
///
/// # Errors
///
/// Returns an I/O error if the temporary file cannot be written or renamed.
pub fn rewrite_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.as_file().sync_all()?;

    if let Ok(metadata) = std::fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S1.mlst");
        std::fs::write(&path, "S1\tecoli\t5\n").unwrap();

        rewrite_atomically(&path, "S1\tecoli\t-\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "S1\tecoli\t-\n");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S1.mlst");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        rewrite_atomically(&path, "new").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
