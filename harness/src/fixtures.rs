//! Serialization of seed fixtures into the fixture tree.

use crate::logging::Logger;
use std::fs;
use std::path::{Path, PathBuf};
use testkit::fixtures::Fixture;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to write fixture file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Serialize each fixture as one JSON document (an array of records) into
/// `fixture_root`. Files are overwritten wholesale; identical input yields
/// byte-identical output.
pub fn write_fixtures(
    fixture_root: &Path,
    fixtures: &[Fixture],
    logger: &Logger,
) -> Result<Vec<PathBuf>, FixtureError> {
    let mut written = Vec::with_capacity(fixtures.len());

    for fixture in fixtures {
        let path = fixture_root.join(fixture.file_name());
        let mut body = serde_json::to_string_pretty(&fixture.records)?;
        body.push('\n');

        fs::write(&path, body).map_err(|e| FixtureError::Write {
            path: path.display().to_string(),
            source: e,
        })?;

        logger.info(&format!(
            "Wrote fixture {} ({} records)",
            path.display(),
            fixture.records.len()
        ));
        written.push(path);
    }

    Ok(written)
}

/// Ensure a `.gitkeep` marker exists in each "empty but tracked" directory.
/// Markers are created only when absent.
pub fn ensure_placeholders(
    dirs: &[PathBuf],
    logger: &Logger,
) -> Result<Vec<PathBuf>, FixtureError> {
    let mut created = Vec::new();

    for dir in dirs {
        let marker = dir.join(".gitkeep");
        if marker.exists() {
            continue;
        }

        fs::write(&marker, "").map_err(|e| FixtureError::Write {
            path: marker.display().to_string(),
            source: e,
        })?;
        logger.debug(&format!("Created placeholder {}", marker.display()));
        created.push(marker);
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use testkit::fixtures::{seed_fixtures, FixtureRecord};

    #[test]
    fn test_fixture_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::default();
        let fixtures = seed_fixtures();

        let written = write_fixtures(dir.path(), &fixtures, &logger).unwrap();
        assert_eq!(written.len(), fixtures.len());

        for (path, fixture) in written.iter().zip(&fixtures) {
            let body = fs::read_to_string(path).unwrap();
            let records: Vec<FixtureRecord> = serde_json::from_str(&body).unwrap();
            assert_eq!(records, fixture.records);
        }
    }

    #[test]
    fn test_fixture_overwrite_is_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::default();
        let path = dir.path().join("users.json");

        fs::write(&path, "stale content that should vanish").unwrap();

        let fixtures = seed_fixtures();
        write_fixtures(dir.path(), &fixtures[..1], &logger).unwrap();

        let body = fs::read_to_string(&path).unwrap();
        assert!(!body.contains("stale content"));
        assert!(body.trim_start().starts_with('['));
    }

    #[test]
    fn test_fixture_output_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::default();
        let fixtures = seed_fixtures();

        write_fixtures(dir.path(), &fixtures, &logger).unwrap();
        let first = fs::read(dir.path().join("users.json")).unwrap();

        write_fixtures(dir.path(), &fixtures, &logger).unwrap();
        let second = fs::read(dir.path().join("users.json")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_placeholders_created_only_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::default();
        let target = dir.path().join("security");
        fs::create_dir_all(&target).unwrap();

        let first = ensure_placeholders(&[target.clone()], &logger).unwrap();
        assert_eq!(first.len(), 1);

        let second = ensure_placeholders(&[target], &logger).unwrap();
        assert!(second.is_empty());
    }
}
