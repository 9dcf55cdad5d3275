//! Configuration handling for Haul
//!
//! Parses `haul.toml` project manifests and resolves them against the
//! options supplied on the command line.

mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use schema::{BundleConfig, ProjectMeta};

use crate::cli::StartOptions;

/// Fixed name of the project manifest, looked up in the working directory
pub const CONFIG_FILENAME: &str = "haul.toml";

/// Raw project manifest, exactly as written in `haul.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project metadata
    pub project: ProjectMeta,

    /// Bundle settings
    #[serde(default)]
    pub bundle: BundleConfig,
}

impl ProjectConfig {
    /// Load a manifest from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ProjectConfig =
            toml::from_str(&content).with_context(|| "Failed to parse haul.toml")?;

        Ok(config)
    }
}

/// The final configuration handed to the compiler and the dev server.
///
/// Constructed exactly once per invocation and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Project display name
    pub name: String,

    /// Target platform, as supplied on the command line
    pub platform: String,

    /// Development-mode flag
    pub dev: bool,

    /// The port the user asked for (see `bundle_url`)
    pub port: u16,

    /// Project root directory
    pub root: PathBuf,

    /// Absolute path of the entry module
    pub entry: PathBuf,

    /// Absolute paths of polyfills prepended to the bundle
    pub polyfills: Vec<PathBuf>,

    /// File name the bundle is served under
    pub bundle_name: String,
}

impl ResolvedConfig {
    /// URL the bundle is advertised at, using the user-chosen port
    pub fn bundle_url(&self) -> String {
        format!("http://localhost:{}/{}", self.port, self.bundle_name)
    }
}

/// Merge CLI options into a raw manifest.
///
/// The entry module is the explicit `[bundle] entry` when present, otherwise
/// `index.<platform>.js` if it exists under the root, otherwise `index.js`.
pub fn resolve(raw: ProjectConfig, options: &StartOptions) -> ResolvedConfig {
    let root = options.cwd.clone();

    let entry = match &raw.bundle.entry {
        Some(path) => root.join(path),
        None => {
            let platform_entry = root.join(format!("index.{}.js", options.platform));
            if platform_entry.exists() {
                platform_entry
            } else {
                root.join("index.js")
            }
        }
    };

    let polyfills = raw
        .bundle
        .polyfills
        .iter()
        .map(|path| root.join(path))
        .collect();

    ResolvedConfig {
        name: raw.project.name,
        platform: options.platform.clone(),
        dev: options.dev,
        port: options.port,
        bundle_name: format!("index.{}.bundle", options.platform),
        root,
        entry,
        polyfills,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn manifest(name: &str) -> ProjectConfig {
        ProjectConfig {
            project: ProjectMeta {
                name: name.to_string(),
            },
            bundle: BundleConfig::default(),
        }
    }

    fn default_options(cwd: PathBuf) -> StartOptions {
        StartOptions {
            port: 8081,
            dev: true,
            platform: "ios".to_string(),
            cwd,
        }
    }

    #[test]
    fn load_parses_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            "[project]\nname = \"MyApp\"\n\n[bundle]\nentry = \"src/index.js\"\n",
        )
        .unwrap();

        let config = ProjectConfig::load(&path).unwrap();
        assert_eq!(config.project.name, "MyApp");
        assert_eq!(config.bundle.entry.as_deref(), Some("src/index.js"));
    }

    #[test]
    fn load_fails_on_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "project = ").unwrap();

        assert!(ProjectConfig::load(&path).is_err());
    }

    #[test]
    fn resolve_carries_default_options_through() {
        let dir = tempfile::tempdir().unwrap();
        let options = default_options(dir.path().to_path_buf());

        let resolved = resolve(manifest("MyApp"), &options);

        assert_eq!(resolved.port, 8081);
        assert!(resolved.dev);
        assert_eq!(resolved.platform, "ios");
        assert_eq!(resolved.bundle_name, "index.ios.bundle");
        assert_eq!(resolved.entry, dir.path().join("index.js"));
    }

    #[test]
    fn resolve_prefers_platform_entry_when_present() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.ios.js"), "export default 1;\n").unwrap();

        let options = default_options(dir.path().to_path_buf());
        let resolved = resolve(manifest("MyApp"), &options);

        assert_eq!(resolved.entry, dir.path().join("index.ios.js"));
    }

    #[test]
    fn resolve_honors_explicit_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut raw = manifest("MyApp");
        raw.bundle.entry = Some("src/app.js".to_string());

        let options = default_options(dir.path().to_path_buf());
        let resolved = resolve(raw, &options);

        assert_eq!(resolved.entry, dir.path().join("src/app.js"));
    }

    #[test]
    fn bundle_url_uses_chosen_port() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = default_options(dir.path().to_path_buf());
        options.port = 3000;

        let resolved = resolve(manifest("MyApp"), &options);
        assert_eq!(resolved.bundle_url(), "http://localhost:3000/index.ios.bundle");
    }
}
