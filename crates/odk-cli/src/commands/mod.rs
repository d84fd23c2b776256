//! Command handler modules for odk-cli.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod journal;
pub mod replay;

pub use odk_config::load_document;

use anyhow::Result;
use odk_config::LoadedConfig;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub fn load_config(paths: &[String]) -> Result<LoadedConfig> {
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    odk_config::load_layered_yaml(&path_refs)
}
