use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fileserv::{AppState, Config, registry};

#[derive(Parser, Debug)]
#[command(name = "fileserv")]
#[command(about = "Serve several directories over HTTP with browsable listings")]
#[command(version)]
struct Cli {
    /// Root directories to serve (space or comma separated, `~` is expanded)
    #[arg(env = "FILESERV_ROOTS", value_name = "DIR")]
    roots: Vec<String>,

    /// Port to listen on [default: 8000]
    #[arg(short, long, env = "FILESERV_PORT")]
    port: Option<u16>,

    /// Address to bind to [default: 0.0.0.0]
    #[arg(short, long, env = "FILESERV_BIND")]
    bind: Option<String>,

    /// List and serve dot entries [default: true]
    #[arg(long, env = "FILESERV_SHOW_HIDDEN")]
    show_hidden: Option<bool>,

    /// Enable verbose logging
    #[arg(short, long, env = "FILESERV_VERBOSE")]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, env = "FILESERV_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Layer command-line values over the file configuration.
    fn apply(self, mut config: Config) -> Config {
        if !self.roots.is_empty() {
            config.roots = self.roots;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(show_hidden) = self.show_hidden {
            config.show_hidden = show_hidden;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "fileserv=debug,tower_http=debug"
    } else {
        "fileserv=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from file if provided, otherwise use defaults
    let file_config = match &cli.config {
        Some(path) => Config::from_file(path)
            .map_err(|err| anyhow::anyhow!(err))
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    let config = cli.apply(file_config);

    let root_paths = config
        .root_paths()
        .context("determining the current directory")?;
    let roots = registry::validate(&root_paths).context("invalid root directory")?;

    for root in &roots {
        info!("Serving /{} from {}", root.name, root.path.display());
    }

    let state = AppState::with_config(roots, &config);
    let app = fileserv::app(state);

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.bind, config.port))?;
    info!("Starting fileserv on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
