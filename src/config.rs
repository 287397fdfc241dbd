//! Library configuration
//!
//! Passed explicitly into the components that need it; there is no
//! global configuration object.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the music library
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Base directory for generated static assets. Album art is written
    /// under `<static_folder_path>/album-art/`. When unset, album-art
    /// persistence is skipped and rows keep an empty art path.
    #[serde(default)]
    pub static_folder_path: Option<PathBuf>,
}
