//! Watch-mode compiler
//!
//! Rebuilds the bundle whenever project sources change and broadcasts each
//! pass of the build lifecycle as events. Bundling proper (module graphs,
//! transformation) is out of scope; a pass concatenates the configured
//! polyfills and the entry module behind a small runtime prologue.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, error};

use crate::config::ResolvedConfig;
use crate::utils;

/// Build lifecycle events.
///
/// Every pass emits exactly one `Compiling` followed by exactly one `Done`;
/// passes run sequentially on the watcher thread and never interleave.
#[derive(Debug, Clone)]
pub enum BuildEvent {
    /// A pass started; `had_issues` reports on the previous pass
    Compiling { had_issues: bool },

    /// A pass finished
    Done { stats: BuildStats },
}

/// Outcome of a single build pass
#[derive(Debug, Clone)]
pub struct BuildStats {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub duration_ms: u64,
    pub bundle_size: usize,
}

impl BuildStats {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A produced bundle, kept in memory and served over HTTP
#[derive(Debug, Clone)]
pub struct BundleOutput {
    /// Bundle source
    pub code: String,

    /// Content hash, used as the ETag
    pub hash: String,
}

/// Shared slot holding the most recent successful bundle
pub type BundleHandle = Arc<RwLock<Option<BundleOutput>>>;

/// The watch-mode compiler
pub struct Compiler {
    config: Arc<ResolvedConfig>,
    events_tx: broadcast::Sender<BuildEvent>,
    output: BundleHandle,
}

impl Compiler {
    /// Create a compiler for a resolved configuration
    pub fn new(config: Arc<ResolvedConfig>) -> Self {
        let (events_tx, _) = broadcast::channel(16);

        Self {
            config,
            events_tx,
            output: Arc::new(RwLock::new(None)),
        }
    }

    /// Subscribe to build lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<BuildEvent> {
        self.events_tx.subscribe()
    }

    /// Event channel handle, for components that subscribe lazily
    pub fn events(&self) -> broadcast::Sender<BuildEvent> {
        self.events_tx.clone()
    }

    /// Handle on the most recent bundle
    pub fn output(&self) -> BundleHandle {
        self.output.clone()
    }

    /// Run the initial build, then keep rebuilding on file changes
    pub fn watch(&self) -> Result<()> {
        let config = self.config.clone();
        let events_tx = self.events_tx.clone();
        let output = self.output.clone();

        // Use a debouncer to avoid too many events
        let (tx, rx) = std::sync::mpsc::channel();

        let mut debouncer = new_debouncer(std::time::Duration::from_millis(100), tx)?;
        debouncer.watcher().watch(&config.root, RecursiveMode::Recursive)?;

        // The debouncer is moved into the thread to keep it alive
        std::thread::spawn(move || {
            let _debouncer = debouncer;

            let mut had_issues = run_pass(&config, &events_tx, &output, false);

            loop {
                match rx.recv() {
                    Ok(Ok(events)) => {
                        if events.iter().any(|event| is_source_file(&event.path)) {
                            had_issues = run_pass(&config, &events_tx, &output, had_issues);
                        }
                    }
                    Ok(Err(e)) => {
                        error!("Watch error: {:?}", e);
                    }
                    Err(_) => {
                        // Channel closed, exit
                        break;
                    }
                }
            }
        });

        Ok(())
    }
}

/// Execute one pass and publish its events; returns whether it had issues
fn run_pass(
    config: &ResolvedConfig,
    events_tx: &broadcast::Sender<BuildEvent>,
    output: &BundleHandle,
    had_issues: bool,
) -> bool {
    let _ = events_tx.send(BuildEvent::Compiling { had_issues });

    let (bundle, stats) = build_bundle(config);
    let issues = stats.has_errors() || stats.has_warnings();

    if let Some(bundle) = bundle {
        *output.write() = Some(bundle);
    }

    let _ = events_tx.send(BuildEvent::Done { stats });

    issues
}

/// Produce a bundle from the configured entry file.
///
/// A failed entry read produces no bundle (the previous one stays current)
/// and reports the error through the stats. Missing polyfills degrade to
/// warnings.
pub fn build_bundle(config: &ResolvedConfig) -> (Option<BundleOutput>, BuildStats) {
    let start = Instant::now();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let mut code = format!(
        "// {} ({})\nvar __DEV__ = {};\n",
        config.bundle_name, config.platform, config.dev
    );

    for polyfill in &config.polyfills {
        match fs::read_to_string(polyfill) {
            Ok(source) => {
                code.push_str(&source);
                if !source.ends_with('\n') {
                    code.push('\n');
                }
            }
            Err(e) => {
                warnings.push(format!("Skipping polyfill {}: {}", polyfill.display(), e));
            }
        }
    }

    match fs::read_to_string(&config.entry) {
        Ok(source) => {
            if source.trim().is_empty() {
                warnings.push(format!("Entry module {} is empty", config.entry.display()));
            }
            code.push_str(&source);
        }
        Err(e) => {
            errors.push(format!(
                "Unable to read entry module {}: {}",
                config.entry.display(),
                e
            ));
        }
    }

    let duration_ms = start.elapsed().as_millis() as u64;

    if !errors.is_empty() {
        let stats = BuildStats {
            errors,
            warnings,
            duration_ms,
            bundle_size: 0,
        };
        return (None, stats);
    }

    let hash = utils::hash_content(code.as_bytes());
    let bundle_size = code.len();

    debug!(
        "Built {} ({}) in {}ms",
        config.bundle_name,
        utils::format_size(bundle_size),
        duration_ms
    );

    let stats = BuildStats {
        errors,
        warnings,
        duration_ms,
        bundle_size,
    };

    (Some(BundleOutput { code, hash }), stats)
}

/// Whether a changed file should trigger a rebuild
fn is_source_file(path: &Path) -> bool {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(extension, "js" | "jsx" | "ts" | "tsx" | "json")
}
