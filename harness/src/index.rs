//! Recursive discovery of test files.
//!
//! A test file carries a `.test.` or `.spec.` infix immediately before its
//! source extension (`auth.test.rs`, `login.spec.ts`). Traversal is iterative
//! with an explicit pending stack, and a visited set of canonicalized
//! directories bounds symlink cycles: each canonical directory is descended at
//! most once.

use chrono::{DateTime, Utc};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read directory '{path}': {source}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read metadata for '{path}': {source}")]
    Metadata {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Conventional test kinds, inferred from directory names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestCategory {
    Unit,
    Integration,
    E2e,
    Api,
    Performance,
    Security,
    Other,
}

impl TestCategory {
    /// The known categories, excluding the `Other` bucket.
    pub const KNOWN: [TestCategory; 6] = [
        TestCategory::Unit,
        TestCategory::Integration,
        TestCategory::E2e,
        TestCategory::Api,
        TestCategory::Performance,
        TestCategory::Security,
    ];

    pub fn from_segment(segment: &str) -> Self {
        match segment {
            "unit" => TestCategory::Unit,
            "integration" => TestCategory::Integration,
            "e2e" => TestCategory::E2e,
            "api" => TestCategory::Api,
            "performance" => TestCategory::Performance,
            "security" => TestCategory::Security,
            _ => TestCategory::Other,
        }
    }

    pub fn segment(&self) -> &'static str {
        match self {
            TestCategory::Unit => "unit",
            TestCategory::Integration => "integration",
            TestCategory::E2e => "e2e",
            TestCategory::Api => "api",
            TestCategory::Performance => "performance",
            TestCategory::Security => "security",
            TestCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for TestCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.segment())
    }
}

/// Metadata for one discovered test file. Created fresh per indexing pass;
/// only the aggregate report is ever persisted.
#[derive(Debug, Clone, Serialize)]
pub struct TestFileRecord {
    pub path: PathBuf,
    pub category: TestCategory,
    pub size_bytes: u64,
    pub modified_at: DateTime<Utc>,
}

/// Does `name` follow the test-file naming convention?
pub fn is_test_file(name: &str) -> bool {
    let Some((stem, _extension)) = name.rsplit_once('.') else {
        return false;
    };
    stem.ends_with(".test") || stem.ends_with(".spec")
}

/// Infer the category from the path segment nearest `root` that names a
/// conventional test kind; everything else buckets as `Other`.
pub fn infer_category(root: &Path, file: &Path) -> TestCategory {
    let Ok(relative) = file.strip_prefix(root) else {
        return TestCategory::Other;
    };

    let mut components: Vec<&str> = relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    // The last component is the file name, never a category segment.
    components.pop();

    components
        .into_iter()
        .map(TestCategory::from_segment)
        .find(|category| *category != TestCategory::Other)
        .unwrap_or(TestCategory::Other)
}

/// Index every test file under `roots`.
pub fn index_test_files(roots: &[PathBuf]) -> Result<Vec<TestFileRecord>, IndexError> {
    index_test_files_matching(roots, &[])
}

/// Index test files under `roots`, additionally requiring the file name to
/// match at least one of `include` when the list is non-empty.
pub fn index_test_files_matching(
    roots: &[PathBuf],
    include: &[Pattern],
) -> Result<Vec<TestFileRecord>, IndexError> {
    let mut records = Vec::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();

    for root in roots {
        if !root.is_dir() {
            debug!(root = %root.display(), "skipping missing index root");
            continue;
        }

        let mut pending = vec![root.clone()];

        while let Some(dir) = pending.pop() {
            // Unreadable or vanished directories are skipped, not fatal; the
            // canonical form is the cycle guard.
            let Ok(canonical) = fs::canonicalize(&dir) else {
                debug!(dir = %dir.display(), "skipping non-canonicalizable directory");
                continue;
            };
            if !visited.insert(canonical) {
                debug!(dir = %dir.display(), "already visited, cycle bounded");
                continue;
            }

            let entries = fs::read_dir(&dir).map_err(|e| IndexError::ReadDir {
                path: dir.display().to_string(),
                source: e,
            })?;

            for entry in entries {
                let entry = entry.map_err(|e| IndexError::ReadDir {
                    path: dir.display().to_string(),
                    source: e,
                })?;
                let path = entry.path();

                // is_dir follows symlinks; the visited set keeps that bounded.
                if path.is_dir() {
                    pending.push(path);
                    continue;
                }

                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };

                if !is_test_file(name) {
                    continue;
                }

                if !include.is_empty() && !include.iter().any(|pattern| pattern.matches(name)) {
                    continue;
                }

                let metadata = fs::metadata(&path).map_err(|e| IndexError::Metadata {
                    path: path.display().to_string(),
                    source: e,
                })?;
                let modified_at = metadata
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .map_err(|e| IndexError::Metadata {
                        path: path.display().to_string(),
                        source: e,
                    })?;

                records.push(TestFileRecord {
                    category: infer_category(root, &path),
                    size_bytes: metadata.len(),
                    modified_at,
                    path,
                });
            }
        }
    }

    // Traversal order is set-like; sort for stable downstream output.
    records.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(records)
}
