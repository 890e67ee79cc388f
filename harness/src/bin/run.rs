//! Runner entry: parse delegated-run flags, preflight the manifest, and
//! supervise exactly one invocation of the external test runner.

use harness::logging::Logger;
use harness::runner::{parse_run_options, run_delegated};
use std::path::Path;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return;
    }

    let base_logger = Logger::from_env();
    let options = parse_run_options(&args, &base_logger);
    let logger = base_logger.with_verbose(options.verbose);

    let exit_code = tokio::select! {
        result = run_delegated(&options, Path::new("Cargo.toml"), &logger) => {
            match result {
                Ok(_outcome) => {
                    logger.success("Delegated test run passed");
                    0
                }
                Err(e) => {
                    logger.error(&e.to_string());
                    1
                }
            }
        }
        _ = tokio::signal::ctrl_c() => 130,
    };

    std::process::exit(exit_code);
}

fn print_help() {
    println!("testbench-run - delegate a test run to the external runner");
    println!();
    println!("Usage: testbench-run [flags]");
    println!();
    println!("Flags:");
    println!("  -c, --coverage          Collect coverage (text, lcov, html reports)");
    println!("  -w, --watch             Re-run on file changes");
    println!("  -v, --verbose           Verbose runner output");
    println!("  -f, --file <file>       Run a single test file");
    println!("  -u, --update-snapshots  Refresh stored snapshots");
    println!("  -s, --silent            Suppress runner output");
    println!("      --detect-open-handles  Report handles keeping the runner alive");
    println!("  -h, --help              Show this message");
    println!();
    println!("The runner executable defaults to `test-runner`; override it with");
    println!("the TESTBENCH_RUNNER environment variable. Runs always use one");
    println!("worker to avoid races on the shared fixture datastore.");
}
