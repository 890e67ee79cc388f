use serde::{Deserialize, Serialize};

/// Environment variable naming the datastore connection URI.
pub const DATABASE_URL_VAR: &str = "TEST_DATABASE_URL";
/// Environment variable naming the token-signing secret.
pub const TOKEN_SECRET_VAR: &str = "TEST_TOKEN_SECRET";
/// Set to suppress informational console output.
pub const QUIET_VAR: &str = "TEST_QUIET";
/// Set to force the in-memory datastore strategy.
pub const IN_MEMORY_VAR: &str = "TEST_IN_MEMORY_DB";
/// Set to disable simulated external API calls.
pub const DISABLE_MOCKS_VAR: &str = "TEST_DISABLE_MOCKS";
/// Base URL for browser-driven scenarios.
pub const BASE_URL_VAR: &str = "TEST_BASE_URL";
/// Controls headless browser execution ("0"/"false" disables).
pub const HEADLESS_VAR: &str = "TEST_HEADLESS";
/// Browser slow-motion delay in milliseconds.
pub const SLOW_MO_VAR: &str = "TEST_SLOW_MO";

const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/testbench_test";
const DEFAULT_TOKEN_SECRET: &str = "testbench-dev-secret";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration for one test-environment invocation, read once from the
/// process environment. Every field has a development default so a bare
/// checkout works without any setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub database_url: String,
    pub token_secret: String,
    pub quiet: bool,
    pub use_in_memory_store: bool,
    pub mock_external_apis: bool,
    pub base_url: String,
    pub headless: bool,
    pub slow_mo_ms: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            token_secret: DEFAULT_TOKEN_SECRET.to_string(),
            quiet: false,
            use_in_memory_store: false,
            mock_external_apis: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            slow_mo_ms: 0,
        }
    }
}

impl EnvironmentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the configuration from process environment variables, falling
    /// back to the development defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env_string(DATABASE_URL_VAR, &defaults.database_url),
            token_secret: env_string(TOKEN_SECRET_VAR, &defaults.token_secret),
            quiet: env_flag(QUIET_VAR),
            use_in_memory_store: env_flag(IN_MEMORY_VAR),
            mock_external_apis: !env_flag(DISABLE_MOCKS_VAR),
            base_url: env_string(BASE_URL_VAR, &defaults.base_url),
            headless: !env_flag_off(HEADLESS_VAR),
            slow_mo_ms: env_u64(SLOW_MO_VAR, 0),
        }
    }

    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }

    pub fn with_token_secret(mut self, token_secret: impl Into<String>) -> Self {
        self.token_secret = token_secret.into();
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_in_memory_store(mut self, in_memory: bool) -> Self {
        self.use_in_memory_store = in_memory;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        if !self.database_url.contains("://") {
            return Err("Database URL must include a scheme (e.g. postgres://)".to_string());
        }

        if self.token_secret.is_empty() {
            return Err("Token secret cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("Base URL must start with http:// or https://".to_string());
        }

        Ok(())
    }
}

fn env_string(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Truthy check: "1", "true", and "yes" (any case) enable the flag.
fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref().map(str::to_lowercase).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Falsy check for flags that default to on: "0", "false", and "no" disable.
fn env_flag_off(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref().map(str::to_lowercase).as_deref(),
        Ok("0") | Ok("false") | Ok("no")
    )
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
