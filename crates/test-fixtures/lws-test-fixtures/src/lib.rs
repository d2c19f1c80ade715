//! Named JSON fixtures shared by the envelope crates' tests and benches.
//!
//! `fixtures/manifest.json` maps fixture names to files under `fixtures/`.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    envelopes: BTreeMap<String, String>,
    motions: BTreeMap<String, String>,
}

/// Read the fixture registered as `name` in one manifest section.
fn read(section: &BTreeMap<String, String>, kind: &str, name: &str) -> Result<String> {
    let rel = section
        .get(name)
        .with_context(|| format!("no {kind} fixture named '{name}'"))?;
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../../fixtures")
        .join(rel);
    std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {kind} fixture at {}", path.display()))
}

pub mod envelopes {
    use super::*;

    /// Registered envelope fixture names, sorted.
    pub fn names() -> Vec<&'static str> {
        MANIFEST.envelopes.keys().map(String::as_str).collect()
    }

    pub fn json(name: &str) -> Result<String> {
        read(&MANIFEST.envelopes, "envelope", name)
    }
}

pub mod motions {
    use super::*;

    /// Registered motion fixture names, sorted.
    pub fn names() -> Vec<&'static str> {
        MANIFEST.motions.keys().map(String::as_str).collect()
    }

    pub fn json(name: &str) -> Result<String> {
        read(&MANIFEST.motions, "motion", name)
    }
}
