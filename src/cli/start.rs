//! `start` command implementation

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{ArgAction, Args};
use tokio::sync::broadcast;

use crate::compiler::{BuildEvent, Compiler};
use crate::config::{self, ProjectConfig, CONFIG_FILENAME};
use crate::console::{Console, TerminalConsole};
use crate::messages;
use crate::server::DevServer;

// React Native clients expect the packager on 127.0.0.1:8081; the listener
// address is fixed and `--port` only flows into the resolved config.
const SERVER_HOST: Ipv4Addr = Ipv4Addr::LOCALHOST;
const SERVER_PORT: u16 = 8081;

/// Start the development server
#[derive(Args, Debug)]
pub struct StartCommand {
    /// Port to run the dev server on
    #[arg(long, value_name = "number", default_value_t = 8081)]
    pub port: u16,

    /// Whether to build in development mode
    #[arg(long, value_name = "true|false", default_value_t = true, action = ArgAction::Set)]
    pub dev: bool,

    /// Platform to bundle for
    #[arg(long, value_name = "ios|android", default_value = "ios")]
    pub platform: String,
}

impl StartCommand {
    pub async fn execute(&self) -> Result<()> {
        let console: Arc<dyn Console> = Arc::new(TerminalConsole::new());
        self.run(env::current_dir()?, console).await
    }

    /// Resolve the config found in `directory`, start the watch-mode
    /// compiler, and serve the bundle until the process is terminated.
    pub(crate) async fn run(&self, directory: PathBuf, console: Arc<dyn Console>) -> Result<()> {
        let config_path = directory.join(CONFIG_FILENAME);

        if !config_path.exists() {
            bail!(messages::config_not_found(&directory));
        }

        let raw = ProjectConfig::load(&config_path)?;
        let resolved = Arc::new(config::resolve(raw, &self.options(directory)));

        let compiler = Compiler::new(resolved.clone());
        spawn_reporter(compiler.subscribe(), console.clone(), resolved.platform.clone());
        compiler.watch()?;

        let server = DevServer::new(resolved.clone(), &compiler);

        let listener = tokio::net::TcpListener::bind(bind_addr()).await?;
        console.info(&messages::initial_start_information(&resolved, self.port));

        server.serve(listener).await
    }

    fn options(&self, cwd: PathBuf) -> StartOptions {
        StartOptions {
            port: self.port,
            dev: self.dev,
            platform: self.platform.clone(),
            cwd,
        }
    }
}

/// Options the `start` command threads into config resolution
#[derive(Debug, Clone)]
pub struct StartOptions {
    pub port: u16,
    pub dev: bool,
    pub platform: String,
    pub cwd: PathBuf,
}

/// The address the dev server binds to, independent of `--port`
fn bind_addr() -> SocketAddr {
    SocketAddr::from((SERVER_HOST, SERVER_PORT))
}

/// Forward build events to the console for the lifetime of the compiler
fn spawn_reporter(
    mut events: broadcast::Receiver<BuildEvent>,
    console: Arc<dyn Console>,
    platform: String,
) {
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            report(&event, &platform, console.as_ref());
        }
    });
}

/// Route one build event to the right console channel
fn report(event: &BuildEvent, platform: &str, console: &dyn Console) {
    match event {
        BuildEvent::Compiling { had_issues } => {
            console.clear();
            let message = messages::bundle_compiling(*had_issues);
            if *had_issues {
                console.warn(&message);
            } else {
                console.info(&message);
            }
        }
        BuildEvent::Done { stats } => {
            console.clear();
            if stats.has_errors() {
                console.error(&messages::bundle_failed());
            } else {
                console.done(&messages::bundle_compiled(stats, platform));
            }
        }
    }
}
