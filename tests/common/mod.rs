//! Shared helpers for the integration tests: write a model definition to a
//! scratch file and load it through the regular loader.

use std::fs;
use std::path::PathBuf;

use tissue_simulator::{load_model, Model};

/// Unique scratch path for this test process.
pub fn scratch_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("tissue_simulator_{}_{}", std::process::id(), name));
    path
}

/// Write `text` to a scratch model file and load it.
pub fn load_from_text(name: &str, text: &str) -> Model {
    let path = scratch_path(name);
    fs::write(&path, text).expect("failed to write scratch model file");
    load_model(path.to_str().unwrap()).expect("model should load")
}
