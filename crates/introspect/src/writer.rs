//! Saving encoded schemas to disk.

use crate::{IntrospectionError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes `text` to `path`, replacing whatever was there.
///
/// The parent directory must already exist. The file handle is released on
/// every path, including a failed write.
#[tracing::instrument(skip(text), fields(path = %path.display(), bytes = text.len()))]
pub fn save_schema(text: &str, path: &Path) -> Result<()> {
    let io_error = |source| IntrospectionError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes()).map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    tracing::info!("Schema written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.graphql");
        std::fs::write(&path, "type Old {\n  field: String\n  other: Int\n}\n").unwrap();

        save_schema("type Query {\n  ping: String\n}\n", &path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "type Query {\n  ping: String\n}\n"
        );
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("schema.graphql");

        let err = save_schema("scalar Date\n", &path).unwrap_err();

        let IntrospectionError::Io { path: failed, .. } = &err else {
            panic!("expected I/O error, got {err:?}");
        };
        assert_eq!(failed, &path);
        assert!(!path.exists());
    }

    #[test]
    fn test_save_to_directory_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_schema("scalar Date\n", dir.path()).unwrap_err();
        assert!(matches!(err, IntrospectionError::Io { .. }));
    }
}
