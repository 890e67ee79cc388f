//! Shared test-environment support.
//!
//! This crate holds the pieces of the test environment that are consumed both
//! by the `harness` binaries and by the scaffolding they generate: the
//! environment configuration derived from process environment variables, the
//! fixed seed fixtures, bearer-token issuance for authenticated requests,
//! datastore strategy selection, and the generic poll-until-condition helper.

pub mod auth;
pub mod config;
pub mod fixtures;
pub mod store;
pub mod wait;

pub use auth::{issue_bearer_token, verify_bearer_token};
pub use config::EnvironmentConfig;
pub use fixtures::{default_user, seed_fixtures, Fixture, FixtureRecord};
pub use store::{select_store_strategy, StoreError, StoreStrategy};
pub use wait::{poll_until, wait_for, PollConfig, TimeoutError};

pub mod prelude {
    pub use crate::auth::*;
    pub use crate::config::*;
    pub use crate::fixtures::*;
    pub use crate::store::*;
    pub use crate::wait::*;
}
