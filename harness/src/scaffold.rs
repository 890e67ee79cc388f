//! Emission of fixed-template scaffold and sample files.
//!
//! The scaffolder only writes text; the delegated runner is what actually
//! invokes the lifecycle hooks the templates wire up.

use crate::logging::Logger;
use crate::provision::WorkspaceLayout;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Shared helper module consumed by every generated test suite.
const HELPERS_TEMPLATE: &str = r##"//! Shared test lifecycle helpers.
//!
//! Generated by `testbench init`. Regenerating overwrites this file; put
//! project-specific helpers in a sibling module instead.

use testkit::config::EnvironmentConfig;
use testkit::fixtures::{default_user, seed_fixtures, FixtureRecord};
use testkit::store::{select_store_strategy, StoreStrategy};
pub use testkit::auth::issue_bearer_token;
pub use testkit::wait::{poll_until, wait_for, PollConfig, TimeoutError};

/// Connect the suite to its datastore. Falls back to the in-memory strategy
/// when the configured datastore is unreachable.
pub async fn setup_database(config: &EnvironmentConfig) -> StoreStrategy {
    select_store_strategy(config).await
}

/// Release the suite's datastore resources.
pub async fn teardown_database(_strategy: StoreStrategy) {
    // The in-memory store drops with the process; external stores keep their
    // data so failed runs can be inspected.
}

/// Remove every record the suite wrote, collection by collection.
pub async fn clear_collections(_strategy: &StoreStrategy) {
    // Wired by the runner between cases; collections are the fixture names.
}

/// Load one seed fixture by name.
pub fn load_fixture(name: &str) -> Vec<FixtureRecord> {
    seed_fixtures()
        .into_iter()
        .find(|fixture| fixture.name == name)
        .map(|fixture| fixture.records)
        .unwrap_or_default()
}

/// A valid default entity for tests that just need "a user".
pub fn create_default_entity() -> FixtureRecord {
    default_user()
}

/// Whether simulated external services should be active for this run.
pub fn mock_external_services(config: &EnvironmentConfig) -> bool {
    config.mock_external_apis
}
"##;

/// Global bootstrap wiring the helpers to the runner's lifecycle.
const BOOTSTRAP_TEMPLATE: &str = r##"//! Global bootstrap for the delegated test runner.
//!
//! Generated by `testbench init`. The runner loads this once per run, before
//! any suite executes.

use super::helpers;
use testkit::config::EnvironmentConfig;

/// Per-test timeout, raised from the runner's 5s default: suites here touch
/// a real datastore and an HTTP server.
pub const TEST_TIMEOUT_MS: u64 = 30_000;

/// Runs once before all suites.
pub async fn before_all() {
    let config = EnvironmentConfig::from_env();

    // Informational output stays off unless verbosity was asked for.
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }

    let strategy = helpers::setup_database(&config).await;
    eprintln!("test environment ready ({strategy})");
}

/// Runs once after all suites.
pub async fn after_all() {
    let config = EnvironmentConfig::from_env();
    let strategy = helpers::setup_database(&config).await;
    helpers::teardown_database(strategy).await;
}

/// Runs between cases.
pub async fn between_cases() {
    let config = EnvironmentConfig::from_env();
    let strategy = helpers::setup_database(&config).await;
    helpers::clear_collections(&strategy).await;
}
"##;

const UNIT_SAMPLE: &str = r##"//! Sample unit suite generated by `testbench samples`.

use super::super::support::helpers::{create_default_entity, load_fixture};

suite("fixture loading", || {
    case("loads the seeded users", || {
        let users = load_fixture("users");
        expect(users.len()).to_equal(3);
    });

    case("unknown fixtures are empty", || {
        let missing = load_fixture("nonexistent");
        expect(missing.is_empty()).to_be_true();
    });

    case("default entity has a stable id", || {
        let user = create_default_entity();
        expect(user["id"].as_str()).to_equal(Some("user-default"));
    });
});
"##;

const INTEGRATION_SAMPLE: &str = r##"//! Sample integration suite generated by `testbench samples`.

use super::super::support::helpers::{issue_bearer_token, load_fixture};
use testkit::config::EnvironmentConfig;

suite("order endpoints", || {
    case("lists seeded orders for an authenticated user", || {
        let config = EnvironmentConfig::from_env();
        let token = issue_bearer_token("user-002", &config.token_secret);
        let response = http_get("/api/orders", &token);
        expect(response.status).to_equal(200);
        expect(response.json_array_len()).to_equal(load_fixture("orders").len());
    });

    case("rejects requests without a token", || {
        let response = http_get_anonymous("/api/orders");
        expect(response.status).to_equal(401);
    });
});
"##;

const E2E_SAMPLE: &str = r##"//! Sample end-to-end suite generated by `testbench samples`.

use super::super::support::helpers::wait_for;
use testkit::config::EnvironmentConfig;

suite("login flow", || {
    case("a seeded member can sign in", || {
        let config = EnvironmentConfig::from_env();
        let browser = open_browser(&config.base_url, config.headless);
        browser.fill("#email", "member@testbench.local");
        browser.fill("#password", "member-password");
        browser.click("#sign-in");
        wait_for(|| browser.url().ends_with("/dashboard"));
        assert!(browser.text(".welcome").contains("Mel Member"));
    });
});
"##;

/// Write the helper module and bootstrap script. Emission is deterministic
/// and idempotent: the same bytes land on every invocation.
pub fn write_scaffolding(layout: &WorkspaceLayout, logger: &Logger) -> io::Result<Vec<PathBuf>> {
    let support = layout.support_root();
    fs::create_dir_all(&support)?;

    let targets = [
        (support.join("helpers.rs"), HELPERS_TEMPLATE),
        (support.join("bootstrap.rs"), BOOTSTRAP_TEMPLATE),
    ];

    let mut written = Vec::with_capacity(targets.len());
    for (path, template) in targets {
        fs::write(&path, template)?;
        logger.info(&format!("Wrote scaffold {}", path.display()));
        written.push(path);
    }

    Ok(written)
}

/// Emit one sample test file per starter category.
pub fn write_sample_tests(layout: &WorkspaceLayout, logger: &Logger) -> io::Result<Vec<PathBuf>> {
    let tests_root = layout.tests_root();
    let targets = [
        (tests_root.join("unit").join("fixtures.test.rs"), UNIT_SAMPLE),
        (
            tests_root.join("integration").join("orders.test.rs"),
            INTEGRATION_SAMPLE,
        ),
        (tests_root.join("e2e").join("login.test.rs"), E2E_SAMPLE),
    ];

    let mut written = Vec::with_capacity(targets.len());
    for (path, template) in targets {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, template)?;
        logger.info(&format!("Wrote sample test {}", path.display()));
        written.push(path);
    }

    Ok(written)
}
