//! End-to-end coverage of the orchestration pipelines: init, samples, check,
//! report, and a delegated run against stub executables.

use harness::audit::{AuditContext, IssueCode, QualityAuditor};
use harness::cli::{execute, Command};
use harness::index::{index_test_files, TestCategory};
use harness::logging::Logger;
use harness::provision::WorkspaceLayout;
use harness::report::generate_report;
use harness::runner::{run_delegated, RunOptions, RunnerError, RUNNER_PROGRAM_VAR};
use serial_test::serial;
use std::fs;
use std::path::Path;
use testkit::config::EnvironmentConfig;
use testkit::fixtures::{seed_fixtures, FixtureRecord};

fn in_memory_config() -> EnvironmentConfig {
    EnvironmentConfig::default().with_in_memory_store(true)
}

fn write_test_file(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        path,
        "suite(\"generated\", || {\n    case(\"works\", || {\n        assert!(true);\n    });\n});\n",
    )
    .unwrap();
}

#[tokio::test]
async fn test_init_builds_a_complete_environment() {
    let dir = tempfile::tempdir().unwrap();
    let layout = WorkspaceLayout::new(dir.path());
    let logger = Logger::default();

    let command = Command::Init {
        generate_samples: false,
        run_checks: false,
    };
    execute(&command, &layout, &in_memory_config(), &logger)
        .await
        .unwrap();

    // Every provisioned directory exists.
    for dir in layout.directories() {
        assert!(dir.is_dir(), "missing {}", dir.display());
    }

    // Fixtures round-trip to the seed data.
    for fixture in seed_fixtures() {
        let path = layout.fixture_root().join(fixture.file_name());
        let body = fs::read_to_string(&path).unwrap();
        let records: Vec<FixtureRecord> = serde_json::from_str(&body).unwrap();
        assert_eq!(records, fixture.records);
    }

    // Scaffolding documents the lifecycle hooks.
    let helpers = fs::read_to_string(layout.support_root().join("helpers.rs")).unwrap();
    for hook in ["setup_database", "load_fixture", "poll_until"] {
        assert!(helpers.contains(hook));
    }
}

#[tokio::test]
async fn test_init_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let layout = WorkspaceLayout::new(dir.path());
    let logger = Logger::default();

    let command = Command::Init {
        generate_samples: true,
        run_checks: true,
    };
    execute(&command, &layout, &in_memory_config(), &logger)
        .await
        .unwrap();
    execute(&command, &layout, &in_memory_config(), &logger)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_generated_samples_audit_clean() {
    let dir = tempfile::tempdir().unwrap();
    let layout = WorkspaceLayout::new(dir.path());
    let logger = Logger::default();

    execute(
        &Command::Init {
            generate_samples: true,
            run_checks: false,
        },
        &layout,
        &in_memory_config(),
        &logger,
    )
    .await
    .unwrap();

    let files = index_test_files(&[layout.tests_root()]).unwrap();
    assert_eq!(files.len(), 3);

    let ctx = AuditContext {
        files: &files,
        manifest_path: layout.manifest_path(),
        coverage_path: layout.coverage_summary_path(),
        logger: &logger,
    };
    let summary = QualityAuditor::new().run(&ctx).unwrap();

    // The generated samples carry no naming or structure findings; the only
    // findings come from the absent manifest in the temp workspace.
    assert!(summary
        .issues
        .iter()
        .all(|issue| issue.code == IssueCode::Dependency));
}

#[tokio::test]
async fn test_report_counts_a_mixed_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let layout = WorkspaceLayout::new(dir.path());
    let logger = Logger::default();
    let tests_root = layout.tests_root();

    for name in ["a", "b", "c"] {
        write_test_file(&tests_root.join("unit").join(format!("{name}.test.rs")));
    }
    for name in ["d", "e"] {
        write_test_file(&tests_root.join("integration").join(format!("{name}.test.rs")));
    }
    write_test_file(&tests_root.join("e2e").join("f.test.rs"));

    let files = index_test_files(&[tests_root]).unwrap();
    let report = generate_report(&files, &layout.report_path(), &logger).unwrap();

    assert_eq!(report.total_files, 6);
    assert_eq!(report.counts_by_category["unit"], 3);
    assert_eq!(report.counts_by_category["integration"], 2);
    assert_eq!(report.counts_by_category["e2e"], 1);
    assert_eq!(report.counts_by_category["api"], 0);
    assert_eq!(report.counts_by_category["performance"], 0);
    assert_eq!(report.counts_by_category["security"], 0);

    assert!(layout.report_path().is_file());
    assert!(files.iter().all(|f| f.category != TestCategory::Other));
}

fn write_complete_manifest(path: &Path) {
    fs::write(
        path,
        "[package]\nname = \"demo\"\nversion = \"0.1.0\"\n\n[dev-dependencies]\n\
         tokio = \"1\"\nreqwest = \"0.11\"\nserde_json = \"1\"\n",
    )
    .unwrap();
}

#[tokio::test]
#[serial]
async fn test_delegated_run_succeeds_with_zero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("Cargo.toml");
    write_complete_manifest(&manifest);

    std::env::set_var(RUNNER_PROGRAM_VAR, "true");
    let result = run_delegated(&RunOptions::default(), &manifest, &Logger::default()).await;
    std::env::remove_var(RUNNER_PROGRAM_VAR);

    let outcome = result.unwrap();
    assert!(outcome.succeeded);
    assert_eq!(outcome.exit_code, 0);
}

#[tokio::test]
#[serial]
async fn test_delegated_run_propagates_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("Cargo.toml");
    write_complete_manifest(&manifest);

    std::env::set_var(RUNNER_PROGRAM_VAR, "false");
    let result = run_delegated(&RunOptions::default(), &manifest, &Logger::default()).await;
    std::env::remove_var(RUNNER_PROGRAM_VAR);

    assert!(matches!(result, Err(RunnerError::ExitCode { code: 1 })));
}
