//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMeta {
    /// Project display name
    pub name: String,
}

/// Bundle settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Explicit entry module, relative to the project root.
    /// When absent, `index.<platform>.js` and `index.js` are tried in order.
    #[serde(default)]
    pub entry: Option<String>,

    /// Polyfills prepended to the bundle, relative to the project root
    #[serde(default)]
    pub polyfills: Vec<String>,
}
