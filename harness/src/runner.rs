//! Delegated test-run options and subprocess supervision.
//!
//! The actual test-execution engine is an external program. This module
//! parses the runner entry's flags, translates them into the delegated
//! runner's argument vector, and supervises exactly one child process per
//! invocation, streaming its output through inherited descriptors.

use crate::audit::{self, AuditError};
use crate::logging::Logger;
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Environment variable overriding the delegated runner executable.
pub const RUNNER_PROGRAM_VAR: &str = "TESTBENCH_RUNNER";
/// Delegated runner executable used when no override is set.
pub const DEFAULT_RUNNER_PROGRAM: &str = "test-runner";
/// Per-test timeout always passed to the delegated runner.
pub const TEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(
        "Required test tooling missing from the manifest: {}. \
         Add the listed crates to [dev-dependencies] and re-run.",
        .0.join(", ")
    )]
    MissingTooling(Vec<String>),

    #[error("Could not inspect the project manifest: {0}")]
    Preflight(#[from] AuditError),

    #[error("Failed to spawn test runner '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Test runner exited with code {code}")]
    ExitCode { code: i32 },

    #[error("Test runner was terminated by a signal")]
    Terminated,
}

/// Options for one delegated run. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub coverage: bool,
    pub watch: bool,
    pub verbose: bool,
    pub target_file: Option<String>,
    pub update_snapshots: bool,
    pub silent: bool,
    pub detect_open_handles: bool,
}

/// Terminal outcome of one supervised invocation. Never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub exit_code: i32,
    pub succeeded: bool,
}

struct FlagSpec {
    long: &'static str,
    short: Option<&'static str>,
    apply: fn(&mut RunOptions),
}

/// Declarative flag table: each recognized flag sets exactly one field.
const FLAGS: &[FlagSpec] = &[
    FlagSpec {
        long: "--coverage",
        short: Some("-c"),
        apply: |options| options.coverage = true,
    },
    FlagSpec {
        long: "--watch",
        short: Some("-w"),
        apply: |options| options.watch = true,
    },
    FlagSpec {
        long: "--verbose",
        short: Some("-v"),
        apply: |options| options.verbose = true,
    },
    FlagSpec {
        long: "--update-snapshots",
        short: Some("-u"),
        apply: |options| options.update_snapshots = true,
    },
    FlagSpec {
        long: "--silent",
        short: Some("-s"),
        apply: |options| options.silent = true,
    },
    FlagSpec {
        long: "--detect-open-handles",
        short: None,
        apply: |options| options.detect_open_handles = true,
    },
];

/// Parse a flat argument list. Parsing never fails: unknown flags are logged
/// as warnings and ignored, non-flag tokens are ignored, and defaults fill
/// everything unset.
pub fn parse_run_options(args: &[String], logger: &Logger) -> RunOptions {
    let mut options = RunOptions::default();
    let mut index = 0;

    while index < args.len() {
        let arg = args[index].as_str();

        if arg == "--file" || arg == "-f" {
            index += 1;
            match args.get(index) {
                Some(value) => options.target_file = Some(value.clone()),
                None => logger.warn("Flag --file requires a value; ignoring"),
            }
        } else if let Some(spec) = FLAGS
            .iter()
            .find(|spec| spec.long == arg || spec.short == Some(arg))
        {
            (spec.apply)(&mut options);
        } else if arg.starts_with('-') {
            logger.warn(&format!("Ignoring unrecognized flag '{arg}'"));
        }
        // Bare tokens are ignored: the runner entry has no subcommands.

        index += 1;
    }

    options
}

/// Translate options into the delegated runner's argument vector.
///
/// The worker cap of one is deliberate: suites share one fixture-backed
/// datastore, and concurrent workers would race on it.
pub fn build_runner_args(options: &RunOptions) -> Vec<String> {
    let mut args = Vec::new();

    if options.coverage {
        args.push("--coverage".to_string());
        for format in ["text", "lcov", "html"] {
            args.push(format!("--coverage-report={format}"));
        }
    }
    if options.watch {
        args.push("--watch".to_string());
    }
    if options.verbose {
        args.push("--verbose".to_string());
    }
    if options.update_snapshots {
        args.push("--update-snapshots".to_string());
    }
    if options.silent {
        args.push("--silent".to_string());
    }
    if options.detect_open_handles {
        args.push("--detect-open-handles".to_string());
    }
    if let Some(target) = &options.target_file {
        args.push(target.clone());
    }

    args.push(format!("--test-timeout={TEST_TIMEOUT_MS}"));
    args.push("--force-exit".to_string());
    args.push("--workers=1".to_string());

    args
}

/// The delegated runner executable for this invocation.
pub fn runner_program() -> String {
    std::env::var(RUNNER_PROGRAM_VAR).unwrap_or_else(|_| DEFAULT_RUNNER_PROGRAM.to_string())
}

/// Spawn `program` with `args`, inheriting the parent's standard streams, and
/// wait for it to finish. Succeeds only on exit code zero.
pub async fn supervise(
    program: &str,
    args: &[String],
    logger: &Logger,
) -> Result<ProcessOutcome, RunnerError> {
    logger.info(&format!("Delegating to: {program} {}", args.join(" ")));

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| RunnerError::Spawn {
            program: program.to_string(),
            source: e,
        })?;

    match status.code() {
        Some(0) => Ok(ProcessOutcome {
            exit_code: 0,
            succeeded: true,
        }),
        Some(code) => Err(RunnerError::ExitCode { code }),
        None => Err(RunnerError::Terminated),
    }
}

/// Preflight the manifest for required tooling, then perform the single
/// supervised invocation of the delegated runner.
pub async fn run_delegated(
    options: &RunOptions,
    manifest_path: &Path,
    logger: &Logger,
) -> Result<ProcessOutcome, RunnerError> {
    let missing = audit::missing_required_dependencies(manifest_path)?;
    if !missing.is_empty() {
        return Err(RunnerError::MissingTooling(
            missing.into_iter().map(String::from).collect(),
        ));
    }

    let args = build_runner_args(options);
    supervise(&runner_program(), &args, logger).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let logger = Logger::default();
        let options = parse_run_options(&[], &logger);
        assert_eq!(options, RunOptions::default());
    }

    #[test]
    fn test_parse_coverage_verbose_and_target() {
        let logger = Logger::default();
        let options = parse_run_options(&args(&["-c", "-v", "-f", "auth.test"]), &logger);

        assert!(options.coverage);
        assert!(options.verbose);
        assert_eq!(options.target_file.as_deref(), Some("auth.test"));
        assert!(!options.watch);
        assert!(!options.update_snapshots);
        assert!(!options.silent);
        assert!(!options.detect_open_handles);
    }

    #[test]
    fn test_parse_long_flags() {
        let logger = Logger::default();
        let options = parse_run_options(
            &args(&["--watch", "--update-snapshots", "--silent", "--detect-open-handles"]),
            &logger,
        );

        assert!(options.watch);
        assert!(options.update_snapshots);
        assert!(options.silent);
        assert!(options.detect_open_handles);
    }

    #[test]
    fn test_unknown_flags_are_ignored() {
        let logger = Logger::default();
        let options = parse_run_options(&args(&["--bogus", "-z", "stray", "-c"]), &logger);
        assert!(options.coverage);
        assert!(!options.watch);
    }

    #[test]
    fn test_trailing_file_flag_without_value() {
        let logger = Logger::default();
        let options = parse_run_options(&args(&["-f"]), &logger);
        assert!(options.target_file.is_none());
    }

    #[test]
    fn test_worker_cap_is_always_present() {
        let all_on = RunOptions {
            coverage: true,
            watch: true,
            verbose: true,
            target_file: Some("auth.test".to_string()),
            update_snapshots: true,
            silent: true,
            detect_open_handles: true,
        };

        for options in [RunOptions::default(), all_on] {
            let built = build_runner_args(&options);
            assert!(built.contains(&"--workers=1".to_string()));
            assert!(built.contains(&"--force-exit".to_string()));
            assert!(built.contains(&format!("--test-timeout={TEST_TIMEOUT_MS}")));
        }
    }

    #[test]
    fn test_coverage_expands_to_report_formats() {
        let options = RunOptions {
            coverage: true,
            ..RunOptions::default()
        };
        let built = build_runner_args(&options);

        assert!(built.contains(&"--coverage".to_string()));
        assert!(built.contains(&"--coverage-report=text".to_string()));
        assert!(built.contains(&"--coverage-report=lcov".to_string()));
        assert!(built.contains(&"--coverage-report=html".to_string()));

        let without = build_runner_args(&RunOptions::default());
        assert!(!without.iter().any(|arg| arg.starts_with("--coverage")));
    }

    #[tokio::test]
    async fn test_zero_exit_resolves() {
        let logger = Logger::default();
        let outcome = supervise("true", &[], &logger).await.unwrap();
        assert_eq!(
            outcome,
            ProcessOutcome {
                exit_code: 0,
                succeeded: true
            }
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_a_failure_with_code() {
        let logger = Logger::default();
        let result = supervise("sh", &args(&["-c", "exit 2"]), &logger).await;
        assert!(matches!(result, Err(RunnerError::ExitCode { code: 2 })));
    }

    #[tokio::test]
    async fn test_spawn_failure_surfaces_os_error() {
        let logger = Logger::default();
        let result = supervise("testbench-no-such-program", &[], &logger).await;
        assert!(matches!(result, Err(RunnerError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_preflight_blocks_missing_tooling() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("Cargo.toml");
        std::fs::write(&manifest, "[package]\nname = \"demo\"\nversion = \"0.1.0\"\n").unwrap();

        let logger = Logger::default();
        let result = run_delegated(&RunOptions::default(), &manifest, &logger).await;
        match result {
            Err(RunnerError::MissingTooling(missing)) => {
                assert_eq!(missing, vec!["tokio", "reqwest", "serde_json"]);
            }
            other => panic!("expected MissingTooling, got {other:?}"),
        }
    }
}
