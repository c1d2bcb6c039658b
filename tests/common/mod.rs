#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use connector_gen::NodeRegistry;
use std::path::PathBuf;

/// Path of a file under `tests/fixtures`
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Built-in services plus the acme test catalog
pub fn registry_with_fixture() -> NodeRegistry {
    let mut registry = NodeRegistry::with_builtin().expect("built-in registry");
    registry
        .load_catalog(&fixture("acme.yaml"))
        .expect("acme catalog");
    registry
}
