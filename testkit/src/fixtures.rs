//! Fixed seed datasets for the test datastore.
//!
//! Fixture records are plain JSON objects with a stable `id` field. The data
//! here is deliberately constant — timestamps included — so that writing the
//! same fixtures twice produces byte-identical files.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A single seed record: string-keyed, heterogeneous values, insertion order
/// preserved (serde_json is built with `preserve_order`).
pub type FixtureRecord = Map<String, Value>;

/// A named, ordered collection of seed records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub records: Vec<FixtureRecord>,
}

impl Fixture {
    pub fn new(name: impl Into<String>, records: Vec<FixtureRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    /// File name of the on-disk document for this fixture.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }
}

/// The full set of seed fixtures, in generation order.
pub fn seed_fixtures() -> Vec<Fixture> {
    vec![
        Fixture::new("users", seed_users()),
        Fixture::new("products", seed_products()),
        Fixture::new("orders", seed_orders()),
    ]
}

/// Default user entity for tests that just need "a valid user".
pub fn default_user() -> FixtureRecord {
    object(json!({
        "id": "user-default",
        "email": "default@testbench.local",
        "name": "Default User",
        "role": "member",
        "password_hash": "$argon2id$stub$default",
        "created_at": "2024-01-01T00:00:00Z"
    }))
}

fn seed_users() -> Vec<FixtureRecord> {
    vec![
        object(json!({
            "id": "user-001",
            "email": "admin@testbench.local",
            "name": "Ada Admin",
            "role": "admin",
            "password_hash": "$argon2id$stub$admin",
            "created_at": "2024-01-01T00:00:00Z"
        })),
        object(json!({
            "id": "user-002",
            "email": "member@testbench.local",
            "name": "Mel Member",
            "role": "member",
            "password_hash": "$argon2id$stub$member",
            "created_at": "2024-01-02T00:00:00Z"
        })),
        object(json!({
            "id": "user-003",
            "email": "viewer@testbench.local",
            "name": "Vic Viewer",
            "role": "viewer",
            "password_hash": "$argon2id$stub$viewer",
            "created_at": "2024-01-03T00:00:00Z"
        })),
    ]
}

fn seed_products() -> Vec<FixtureRecord> {
    vec![
        object(json!({
            "id": "product-001",
            "name": "Widget",
            "price_cents": 1999,
            "stock": 120,
            "tags": ["hardware", "popular"]
        })),
        object(json!({
            "id": "product-002",
            "name": "Gadget",
            "price_cents": 4999,
            "stock": 8,
            "tags": ["hardware"]
        })),
        object(json!({
            "id": "product-003",
            "name": "Gizmo Subscription",
            "price_cents": 900,
            "stock": null,
            "tags": ["subscription"]
        })),
    ]
}

fn seed_orders() -> Vec<FixtureRecord> {
    vec![
        object(json!({
            "id": "order-001",
            "user_id": "user-002",
            "product_ids": ["product-001", "product-003"],
            "total_cents": 2899,
            "status": "paid",
            "placed_at": "2024-02-01T09:30:00Z"
        })),
        object(json!({
            "id": "order-002",
            "user_id": "user-003",
            "product_ids": ["product-002"],
            "total_cents": 4999,
            "status": "pending",
            "placed_at": "2024-02-02T14:00:00Z"
        })),
    ]
}

fn object(value: Value) -> FixtureRecord {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
