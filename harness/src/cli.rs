//! Top-level command routing for the orchestration entry.
//!
//! Subcommands are independent pipelines sharing only the logger and the
//! workspace layout. Unrecognized input is never fatal: it warns and falls
//! through to help.

use crate::audit::{AuditContext, IssueSeverity, QualityAuditor};
use crate::fixtures::{ensure_placeholders, write_fixtures, FixtureError};
use crate::index::{index_test_files, IndexError};
use crate::logging::Logger;
use crate::provision::{provision_workspace, ProvisionError, WorkspaceLayout};
use crate::report::{generate_report, ReportError};
use crate::scaffold::{write_sample_tests, write_scaffolding};
use std::path::PathBuf;
use testkit::config::EnvironmentConfig;
use testkit::fixtures::seed_fixtures;
use testkit::store::select_store_strategy;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Provisioning failed: {0}")]
    Provision(#[from] ProvisionError),

    #[error("Fixture generation failed: {0}")]
    Fixture(#[from] FixtureError),

    #[error("Scaffolding failed: {0}")]
    Scaffold(#[from] std::io::Error),

    #[error("Indexing failed: {0}")]
    Index(#[from] IndexError),

    #[error("Audit failed: {0}")]
    Audit(#[from] crate::audit::AuditError),

    #[error("Report generation failed: {0}")]
    Report(#[from] ReportError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init {
        generate_samples: bool,
        run_checks: bool,
    },
    Samples,
    Check,
    Report,
    Help,
}

/// Resolve a subcommand from the argument list. The first recognized
/// subcommand wins; help is the default when none is present.
pub fn parse_command(args: &[String], logger: &Logger) -> Command {
    let mut subcommand: Option<&str> = None;
    let mut generate_samples = false;
    let mut run_checks = false;

    for arg in args {
        match arg.as_str() {
            "init" | "samples" | "check" | "report" => {
                if subcommand.is_none() {
                    subcommand = Some(arg);
                } else {
                    logger.warn(&format!("Ignoring extra subcommand '{arg}'"));
                }
            }
            "--generate-samples" => generate_samples = true,
            "--run-checks" => run_checks = true,
            "help" | "-h" | "--help" => return Command::Help,
            other if other.starts_with('-') => {
                logger.warn(&format!("Ignoring unrecognized flag '{other}'"));
            }
            other => {
                logger.warn(&format!("Ignoring unrecognized argument '{other}'"));
            }
        }
    }

    match subcommand {
        Some("init") => Command::Init {
            generate_samples,
            run_checks,
        },
        Some("samples") => Command::Samples,
        Some("check") => Command::Check,
        Some("report") => Command::Report,
        _ => Command::Help,
    }
}

/// Execute one command. Each branch is a single pass.
pub async fn execute(
    command: &Command,
    layout: &WorkspaceLayout,
    config: &EnvironmentConfig,
    logger: &Logger,
) -> Result<(), HarnessError> {
    match command {
        Command::Init {
            generate_samples,
            run_checks,
        } => {
            provision_workspace(layout, logger)?;
            write_fixtures(&layout.fixture_root(), &seed_fixtures(), logger)?;
            ensure_placeholders(&layout.placeholder_dirs(), logger)?;
            write_scaffolding(layout, logger)?;

            let strategy = select_store_strategy(config).await;
            logger.info(&format!("Datastore strategy: {strategy}"));

            if *generate_samples {
                write_sample_tests(layout, logger)?;
            }
            if *run_checks {
                run_quality_checks(layout, logger)?;
            }

            logger.success("Test environment ready");
        }
        Command::Samples => {
            write_sample_tests(layout, logger)?;
            logger.success("Sample tests written");
        }
        Command::Check => {
            run_quality_checks(layout, logger)?;
        }
        Command::Report => {
            let files = index_test_files(&[layout.tests_root()])?;
            let report = generate_report(&files, &layout.report_path(), logger)?;
            for (category, count) in &report.counts_by_category {
                logger.info(&format!("{category}: {count}"));
            }
        }
        Command::Help => print_help(),
    }

    Ok(())
}

fn run_quality_checks(layout: &WorkspaceLayout, logger: &Logger) -> Result<(), HarnessError> {
    let files = index_test_files(&[layout.tests_root()])?;
    logger.info(&format!("Auditing {} test file(s)", files.len()));

    let ctx = AuditContext {
        files: &files,
        manifest_path: layout.manifest_path(),
        coverage_path: layout.coverage_summary_path(),
        logger,
    };
    let summary = QualityAuditor::new().run(&ctx)?;

    for issue in &summary.issues {
        let location = issue
            .file
            .as_ref()
            .map(|path| format!(" [{}]", path.display()))
            .unwrap_or_default();
        let line = format!("({}){location} {}", issue.code, issue.message);
        match issue.severity {
            IssueSeverity::Warning => logger.warn(&line),
            IssueSeverity::Info => logger.info(&line),
        }
    }

    // Findings are advisory; they never change the exit status.
    if summary.is_clean() {
        logger.success("Quality checks passed with no findings");
    } else {
        logger.info(&format!(
            "Quality checks finished with {} advisory finding(s)",
            summary.issues.len()
        ));
    }

    Ok(())
}

fn print_help() {
    println!("testbench - test environment orchestration and quality audits");
    println!();
    println!("Usage: testbench <subcommand> [flags]");
    println!();
    println!("Subcommands:");
    println!("  init      Provision the workspace, seed fixtures, write scaffolding");
    println!("  samples   Emit sample test files (unit, integration, e2e)");
    println!("  check     Run the quality audit over the test corpus");
    println!("  report    Write the categorized test report");
    println!("  help      Show this message");
    println!();
    println!("Flags (init):");
    println!("  --generate-samples   Also emit the sample tests");
    println!("  --run-checks         Also run the quality audit");
    println!();
    println!("Delegated runs are handled by the `testbench-run` binary.");
}

/// Entry point shared by the orchestration binary: resolves configuration,
/// dispatches, and maps errors to the process exit code at this single
/// boundary.
pub async fn run(args: &[String]) -> i32 {
    let config = EnvironmentConfig::from_env();
    let logger = Logger::for_config(&config);
    let command = parse_command(args, &logger);

    let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let layout = WorkspaceLayout::new(root);

    match execute(&command, &layout, &config, &logger).await {
        Ok(()) => 0,
        Err(e) => {
            logger.error(&e.to_string());
            1
        }
    }
}
