//! Categorized report over the indexed test corpus.

use crate::index::{TestCategory, TestFileRecord};
use crate::logging::Logger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub path: String,
    pub category: TestCategory,
    pub size_bytes: u64,
    pub modified_at: DateTime<Utc>,
}

/// The persisted report artifact. Each `report` invocation fully replaces the
/// previous one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    pub generated_at: DateTime<Utc>,
    pub total_files: usize,
    pub counts_by_category: BTreeMap<String, usize>,
    pub files: Vec<ReportEntry>,
}

/// Compute category counts and per-file metadata. The six known categories
/// are always present (zero-filled); `other` appears only when populated.
pub fn build_report(files: &[TestFileRecord]) -> TestReport {
    let mut counts: BTreeMap<String, usize> = TestCategory::KNOWN
        .iter()
        .map(|category| (category.segment().to_string(), 0))
        .collect();

    for record in files {
        *counts.entry(record.category.segment().to_string()).or_insert(0) += 1;
    }

    TestReport {
        generated_at: Utc::now(),
        total_files: files.len(),
        counts_by_category: counts,
        files: files
            .iter()
            .map(|record| ReportEntry {
                path: record.path.display().to_string(),
                category: record.category,
                size_bytes: record.size_bytes,
                modified_at: record.modified_at,
            })
            .collect(),
    }
}

/// Build the report, persist it at `output_path` (full overwrite), and return
/// it for display.
pub fn generate_report(
    files: &[TestFileRecord],
    output_path: &Path,
    logger: &Logger,
) -> Result<TestReport, ReportError> {
    let report = build_report(files);

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| ReportError::Write {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let mut body = serde_json::to_string_pretty(&report)?;
    body.push('\n');
    fs::write(output_path, body).map_err(|e| ReportError::Write {
        path: output_path.display().to_string(),
        source: e,
    })?;

    logger.success(&format!(
        "Report written to {} ({} files)",
        output_path.display(),
        report.total_files
    ));

    Ok(report)
}
