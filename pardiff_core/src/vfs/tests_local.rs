#[cfg(test)]
mod tests {
    use crate::vfs::LocalVfs;
    use pardiff_common::{Entry, Vfs, VfsError};
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    fn sorted(mut entries: Vec<Entry>) -> Vec<Entry> {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    // ============================================================================
    // LocalVfs Basic Tests
    // ============================================================================

    #[test]
    fn test_local_vfs_metadata_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("metadata-test.txt");
        fs::write(&path, b"1234567890").expect("Failed to write file");

        let meta = LocalVfs::new().metadata(&path).expect("Failed to get metadata");
        assert_eq!(meta.size, 10);
        assert!(!meta.is_dir);
    }

    #[test]
    fn test_local_vfs_metadata_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let meta = LocalVfs::new()
            .metadata(temp_dir.path())
            .expect("Failed to get metadata");
        assert!(meta.is_dir);
    }

    #[test]
    fn test_local_vfs_metadata_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let err = LocalVfs::new()
            .metadata(&temp_dir.path().join("nope"))
            .unwrap_err();
        assert!(matches!(err, VfsError::NotFound(_)));
    }

    // ============================================================================
    // File Operations Tests
    // ============================================================================

    #[test]
    fn test_local_vfs_open_and_read_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("test.txt");
        fs::write(&path, b"Hello, LocalVfs!").expect("Failed to write file");

        let mut reader = LocalVfs::new().open_file(&path).expect("Failed to open file");
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).expect("Failed to read file");

        assert_eq!(buffer, b"Hello, LocalVfs!");
    }

    #[test]
    fn test_local_vfs_open_directory_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let result = LocalVfs::new().open_file(temp_dir.path());
        assert!(result.is_err());
    }

    // ============================================================================
    // Directory Operations Tests
    // ============================================================================

    #[test]
    fn test_local_vfs_read_dir_lists_immediate_children() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("a.txt"), b"a").unwrap();
        fs::create_dir_all(temp_dir.path().join("sub/deeper")).unwrap();
        fs::write(temp_dir.path().join("sub/inner.txt"), b"i").unwrap();

        let entries = sorted(
            LocalVfs::new()
                .read_dir(temp_dir.path(), false)
                .expect("Failed to read dir"),
        );

        assert_eq!(entries, vec![Entry::file("a.txt"), Entry::dir("sub")]);
    }

    #[test]
    fn test_local_vfs_read_dir_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let entries = LocalVfs::new()
            .read_dir(temp_dir.path(), false)
            .expect("Failed to read dir");
        assert!(entries.is_empty());
    }

    #[test]
    fn test_local_vfs_read_dir_on_file_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("file.txt");
        fs::write(&path, b"x").unwrap();

        let err = LocalVfs::new().read_dir(&path, false).unwrap_err();
        assert!(matches!(err, VfsError::NotADirectory(_)));
    }

    #[test]
    fn test_local_vfs_read_dir_missing_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let err = LocalVfs::new()
            .read_dir(&temp_dir.path().join("gone"), false)
            .unwrap_err();
        assert!(matches!(err, VfsError::NotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_local_vfs_symlink_classification() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("target")).unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("target"),
            temp_dir.path().join("link"),
        )
        .unwrap();

        let vfs = LocalVfs::new();

        let unfollowed = sorted(vfs.read_dir(temp_dir.path(), false).unwrap());
        assert_eq!(unfollowed, vec![Entry::file("link"), Entry::dir("target")]);

        let followed = sorted(vfs.read_dir(temp_dir.path(), true).unwrap());
        assert_eq!(followed, vec![Entry::dir("link"), Entry::dir("target")]);
    }
}
