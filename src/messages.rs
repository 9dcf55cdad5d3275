//! Human-readable messages printed by the CLI
//!
//! Pure formatting functions; nothing in here writes to the terminal.

use std::path::Path;

use colored::Colorize;

use crate::compiler::BuildStats;
use crate::config::{ResolvedConfig, CONFIG_FILENAME};
use crate::utils;

/// The manifest is missing from the working directory
pub fn config_not_found(directory: &Path) -> String {
    format!(
        "Couldn't find configuration file {} in {}",
        CONFIG_FILENAME.bold(),
        directory.display()
    )
}

/// A build pass is starting
pub fn bundle_compiling(had_issues: bool) -> String {
    if had_issues {
        "Rebuilding the bundle (previous build had issues)...".to_string()
    } else {
        "Compiling the bundle...".to_string()
    }
}

/// A build pass failed
pub fn bundle_failed() -> String {
    "Failed to compile the bundle".to_string()
}

/// A build pass finished cleanly
pub fn bundle_compiled(stats: &BuildStats, platform: &str) -> String {
    let mut message = format!(
        "Compiled the {} bundle in {}ms ({})",
        platform.cyan(),
        stats.duration_ms,
        utils::format_size(stats.bundle_size)
    );

    for warning in &stats.warnings {
        message.push_str(&format!("\n  {} {}", "•".yellow(), warning));
    }

    message
}

/// Printed once, after the listener is bound
pub fn initial_start_information(config: &ResolvedConfig, port: u16) -> String {
    format!(
        "Running {} for {} in {} mode on port {}\n\n  {} {}\n\n  {} Press {} to stop",
        config.name.bold(),
        config.platform.cyan(),
        if config.dev { "development" } else { "release" },
        port,
        "•".dimmed(),
        config.bundle_url().cyan().underline(),
        "•".dimmed(),
        "Ctrl+C".yellow()
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn resolved() -> ResolvedConfig {
        ResolvedConfig {
            name: "MyApp".to_string(),
            platform: "ios".to_string(),
            dev: true,
            port: 3000,
            root: PathBuf::from("/app"),
            entry: PathBuf::from("/app/index.js"),
            polyfills: vec![],
            bundle_name: "index.ios.bundle".to_string(),
        }
    }

    #[test]
    fn config_not_found_names_the_directory() {
        let message = config_not_found(Path::new("/projects/my-app"));
        assert!(message.contains("/projects/my-app"));
        assert!(message.contains("haul.toml"));
    }

    #[test]
    fn bundle_compiling_reflects_issue_flag() {
        assert!(bundle_compiling(true).contains("previous build had issues"));
        assert!(!bundle_compiling(false).contains("previous build had issues"));
    }

    #[test]
    fn bundle_compiled_embeds_platform_and_warnings() {
        let stats = BuildStats {
            errors: vec![],
            warnings: vec!["Entry module is empty".to_string()],
            duration_ms: 42,
            bundle_size: 2048,
        };

        let message = bundle_compiled(&stats, "android");
        assert!(message.contains("android"));
        assert!(message.contains("42ms"));
        assert!(message.contains("Entry module is empty"));
    }

    #[test]
    fn start_information_reports_chosen_port() {
        let message = initial_start_information(&resolved(), 3000);
        assert!(message.contains("MyApp"));
        assert!(message.contains("3000"));
        assert!(message.contains("index.ios.bundle"));
    }
}
