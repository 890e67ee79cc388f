//! Static quality audits over the discovered test corpus.
//!
//! Four independent, order-insensitive rules run behind the [`AuditRule`]
//! trait and their issues are aggregated by [`QualityAuditor`]. Findings are
//! advisory: the audit never fails the process by itself.
//!
//! The naming and structure rules are deliberately textual — regex matching
//! over raw source, not parsing. Multi-line or computed grouping descriptions
//! are accepted silently; a parser-backed rule can replace the heuristic
//! behind the same trait without touching aggregation.

use crate::index::{is_test_file, TestFileRecord};
use crate::logging::Logger;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest '{path}': {source}")]
    ManifestParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse coverage summary '{path}': {source}")]
    CoverageParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCode {
    Naming,
    Structure,
    Dependency,
    Coverage,
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueCode::Naming => write!(f, "naming"),
            IssueCode::Structure => write!(f, "structure"),
            IssueCode::Dependency => write!(f, "dependency"),
            IssueCode::Coverage => write!(f, "coverage"),
        }
    }
}

/// One advisory finding. Immutable once created.
#[derive(Debug, Clone)]
pub struct QualityIssue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub file: Option<PathBuf>,
    pub message: String,
}

impl QualityIssue {
    pub fn warning(code: IssueCode, file: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            code,
            file,
            message: message.into(),
        }
    }

    pub fn info(code: IssueCode, file: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Info,
            code,
            file,
            message: message.into(),
        }
    }
}

/// Everything a rule may inspect during one audit pass.
pub struct AuditContext<'a> {
    pub files: &'a [TestFileRecord],
    pub manifest_path: PathBuf,
    pub coverage_path: PathBuf,
    pub logger: &'a Logger,
}

pub trait AuditRule {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<QualityIssue>, AuditError>;
}

/// Required tooling every audited project must declare, with the concern each
/// entry covers (used in remediation hints).
pub const REQUIRED_TOOLING: &[(&str, &str)] = &[
    ("tokio", "the async test executor"),
    ("reqwest", "HTTP assertions against the server under test"),
    ("serde_json", "typed request and response payloads"),
];

/// Helpers worth having; their absence is reported informationally only.
pub const OPTIONAL_TOOLING: &[&str] = &["tempfile", "serial_test", "wiremock"];

/// Line coverage below this percentage draws a warning.
pub const LINE_COVERAGE_FLOOR: f64 = 70.0;

const MIN_DESCRIPTION_LEN: usize = 3;

static SUITE_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bsuite\s*\(\s*"([^"]*)""#).expect("suite description pattern compiles")
});
static SUITE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bsuite\s*\(").expect("suite pattern compiles"));
static CASE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bcase\s*\(").expect("case pattern compiles"));
static ASSERTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bexpect\s*\(|\bassert").expect("assertion pattern compiles"));

fn read_source(path: &Path) -> Result<String, AuditError> {
    fs::read_to_string(path).map_err(|e| AuditError::ReadFailed {
        path: path.display().to_string(),
        source: e,
    })
}

/// Rule 1: file names follow the convention and grouping descriptions carry
/// at least a few characters of meaning.
pub struct NamingRule;

impl AuditRule for NamingRule {
    fn name(&self) -> &'static str {
        "naming"
    }

    fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<QualityIssue>, AuditError> {
        let mut issues = Vec::new();

        for record in ctx.files {
            let name = record
                .path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();

            if !is_test_file(name) {
                issues.push(QualityIssue::warning(
                    IssueCode::Naming,
                    Some(record.path.clone()),
                    format!("'{name}' does not follow the <name>.test.<ext> convention"),
                ));
                continue;
            }

            let source = read_source(&record.path)?;
            for capture in SUITE_DESCRIPTION.captures_iter(&source) {
                let description = capture[1].trim();
                if description.chars().count() < MIN_DESCRIPTION_LEN {
                    issues.push(QualityIssue::warning(
                        IssueCode::Naming,
                        Some(record.path.clone()),
                        format!(
                            "Grouping description '{description}' is too short \
                             (minimum {MIN_DESCRIPTION_LEN} characters)"
                        ),
                    ));
                }
            }
        }

        Ok(issues)
    }
}

/// Rule 2: every file contains a grouping block, a test case, and at least
/// one assertion.
pub struct StructureRule;

impl AuditRule for StructureRule {
    fn name(&self) -> &'static str {
        "structure"
    }

    fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<QualityIssue>, AuditError> {
        let mut issues = Vec::new();

        for record in ctx.files {
            let source = read_source(&record.path)?;

            let checks: [(&Regex, &str); 3] = [
                (&*SUITE_CALL, "a grouping block (suite)"),
                (&*CASE_CALL, "a test case (case)"),
                (&*ASSERTION, "an assertion (expect/assert)"),
            ];

            for (pattern, what) in checks {
                if !pattern.is_match(&source) {
                    issues.push(QualityIssue::warning(
                        IssueCode::Structure,
                        Some(record.path.clone()),
                        format!("Missing {what}"),
                    ));
                }
            }
        }

        Ok(issues)
    }
}

/// Rule 3: the project manifest declares the required test tooling.
pub struct DependencyRule;

impl AuditRule for DependencyRule {
    fn name(&self) -> &'static str {
        "dependency"
    }

    fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<QualityIssue>, AuditError> {
        if !ctx.manifest_path.exists() {
            return Ok(vec![QualityIssue::warning(
                IssueCode::Dependency,
                None,
                format!(
                    "Project manifest not found at {}",
                    ctx.manifest_path.display()
                ),
            )]);
        }

        let declared = declared_dependencies(&ctx.manifest_path)?;
        let mut issues = Vec::new();

        for (name, purpose) in REQUIRED_TOOLING {
            if !declared.contains(*name) {
                issues.push(QualityIssue::warning(
                    IssueCode::Dependency,
                    None,
                    format!(
                        "Required test dependency '{name}' ({purpose}) is not declared; \
                         add it to [dev-dependencies]"
                    ),
                ));
            }
        }

        for name in OPTIONAL_TOOLING {
            if !declared.contains(*name) {
                ctx.logger
                    .info(&format!("Optional test helper '{name}' is not declared"));
            }
        }

        Ok(issues)
    }
}

/// Rule 4: line coverage meets the floor, when a coverage summary exists.
pub struct CoverageRule;

#[derive(Debug, Deserialize)]
struct CoverageSummary {
    total: CoverageTotals,
}

#[derive(Debug, Deserialize)]
struct CoverageTotals {
    lines: CoverageMetric,
    functions: CoverageMetric,
    branches: CoverageMetric,
    statements: CoverageMetric,
}

#[derive(Debug, Deserialize)]
struct CoverageMetric {
    pct: f64,
}

impl AuditRule for CoverageRule {
    fn name(&self) -> &'static str {
        "coverage"
    }

    fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<QualityIssue>, AuditError> {
        if !ctx.coverage_path.exists() {
            ctx.logger.info(&format!(
                "No coverage summary at {}; run the suite with --coverage to produce one",
                ctx.coverage_path.display()
            ));
            return Ok(Vec::new());
        }

        let body = read_source(&ctx.coverage_path)?;
        let summary: CoverageSummary =
            serde_json::from_str(&body).map_err(|e| AuditError::CoverageParse {
                path: ctx.coverage_path.display().to_string(),
                source: e,
            })?;

        let totals = &summary.total;
        ctx.logger.debug(&format!(
            "Coverage: lines {:.1}%, functions {:.1}%, branches {:.1}%, statements {:.1}%",
            totals.lines.pct, totals.functions.pct, totals.branches.pct, totals.statements.pct
        ));

        let mut issues = Vec::new();
        if totals.lines.pct < LINE_COVERAGE_FLOOR {
            issues.push(QualityIssue::warning(
                IssueCode::Coverage,
                None,
                format!(
                    "Line coverage {:.1}% is below the {LINE_COVERAGE_FLOOR:.0}% floor",
                    totals.lines.pct
                ),
            ));
        }

        Ok(issues)
    }
}

fn declared_dependencies(manifest_path: &Path) -> Result<HashSet<String>, AuditError> {
    let body = read_source(manifest_path)?;
    let manifest: toml::Value = toml::from_str(&body).map_err(|e| AuditError::ManifestParse {
        path: manifest_path.display().to_string(),
        source: e,
    })?;

    let tables = [
        manifest.get("dependencies"),
        manifest.get("dev-dependencies"),
        manifest
            .get("workspace")
            .and_then(|workspace| workspace.get("dependencies")),
    ];

    let mut names = HashSet::new();
    for table in tables.into_iter().flatten() {
        if let Some(table) = table.as_table() {
            names.extend(table.keys().cloned());
        }
    }

    Ok(names)
}

/// Names from [`REQUIRED_TOOLING`] missing from the manifest. Used by the
/// runner entry as a fatal preflight; the audit reports the same gaps as
/// advisory issues.
pub fn missing_required_dependencies(
    manifest_path: &Path,
) -> Result<Vec<&'static str>, AuditError> {
    let declared = declared_dependencies(manifest_path)?;
    Ok(REQUIRED_TOOLING
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| !declared.contains(*name))
        .collect())
}

/// Aggregated audit outcome. Advisory only.
#[derive(Debug)]
pub struct AuditSummary {
    pub issues: Vec<QualityIssue>,
}

impl AuditSummary {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Warning)
            .count()
    }
}

pub struct QualityAuditor {
    rules: Vec<Box<dyn AuditRule>>,
}

impl QualityAuditor {
    pub fn new() -> Self {
        Self::with_rules(vec![
            Box::new(NamingRule),
            Box::new(StructureRule),
            Box::new(DependencyRule),
            Box::new(CoverageRule),
        ])
    }

    pub fn with_rules(rules: Vec<Box<dyn AuditRule>>) -> Self {
        Self { rules }
    }

    pub fn run(&self, ctx: &AuditContext<'_>) -> Result<AuditSummary, AuditError> {
        let mut issues = Vec::new();

        for rule in &self.rules {
            let found = rule.run(ctx)?;
            ctx.logger
                .debug(&format!("Rule '{}' found {} issue(s)", rule.name(), found.len()));
            issues.extend(found);
        }

        Ok(AuditSummary { issues })
    }
}

impl Default for QualityAuditor {
    fn default() -> Self {
        Self::new()
    }
}
