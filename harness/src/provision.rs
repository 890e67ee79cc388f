//! Idempotent provisioning of the on-disk test workspace.

use crate::index::TestCategory;
use crate::logging::Logger;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The directory tree one invocation provisions, rooted at the project
/// directory. Owned by the provisioner for the duration of the invocation.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory all test roots live under.
    pub fn tests_root(&self) -> PathBuf {
        self.root.join("tests")
    }

    /// One root per known test category.
    pub fn test_roots(&self) -> Vec<PathBuf> {
        TestCategory::KNOWN
            .iter()
            .map(|category| self.tests_root().join(category.segment()))
            .collect()
    }

    pub fn fixture_root(&self) -> PathBuf {
        self.tests_root().join("fixtures")
    }

    pub fn output_root(&self) -> PathBuf {
        self.tests_root().join("output")
    }

    pub fn support_root(&self) -> PathBuf {
        self.tests_root().join("support")
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_root().join("test-report.json")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("Cargo.toml")
    }

    pub fn coverage_summary_path(&self) -> PathBuf {
        self.root.join("coverage").join("coverage-summary.json")
    }

    /// The ordered set of directories to provision.
    pub fn directories(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.tests_root()];
        dirs.extend(self.test_roots());
        dirs.push(self.fixture_root());
        dirs.push(self.output_root());
        dirs.push(self.support_root());
        dirs
    }

    /// Directories that stay empty until a project grows into them; they get
    /// placeholder markers so the tree survives version control.
    pub fn placeholder_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.tests_root().join(TestCategory::Performance.segment()),
            self.tests_root().join(TestCategory::Security.segment()),
        ]
    }
}

/// Ensure every directory in the layout exists, creating intermediate
/// segments as needed. Pre-existing directories are not errors; only newly
/// created paths are logged and returned.
pub fn provision_workspace(
    layout: &WorkspaceLayout,
    logger: &Logger,
) -> Result<Vec<PathBuf>, ProvisionError> {
    let mut created = Vec::new();

    for dir in layout.directories() {
        if dir.is_dir() {
            logger.debug(&format!("Directory exists: {}", dir.display()));
            continue;
        }

        fs::create_dir_all(&dir).map_err(|e| ProvisionError::CreateFailed {
            path: dir.display().to_string(),
            source: e,
        })?;
        logger.info(&format!("Created directory: {}", dir.display()));
        created.push(dir);
    }

    Ok(created)
}
