pub mod audit;
pub mod cli;
pub mod fixtures;
pub mod index;
pub mod logging;
pub mod provision;
pub mod report;
pub mod runner;
pub mod scaffold;

pub use audit::{
    AuditContext, AuditError, AuditRule, AuditSummary, IssueCode, IssueSeverity, QualityAuditor,
    QualityIssue,
};
pub use cli::{Command, HarnessError};
pub use fixtures::{ensure_placeholders, write_fixtures, FixtureError};
pub use index::{
    index_test_files, index_test_files_matching, is_test_file, IndexError, TestCategory,
    TestFileRecord,
};
pub use logging::{LogLevel, Logger};
pub use provision::{provision_workspace, ProvisionError, WorkspaceLayout};
pub use report::{build_report, generate_report, ReportError, TestReport};
pub use runner::{
    build_runner_args, parse_run_options, run_delegated, supervise, ProcessOutcome, RunOptions,
    RunnerError,
};
pub use scaffold::{write_sample_tests, write_scaffolding};
