//! Binary entry point for the Potluck API server.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum_server::Handle;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use potluck_core::{PostgresRecipeRepository, RecipeService, database};
use potluck_server::{
    AppState,
    config::{Config, ConfigLoad},
    create_app,
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "potluck-server")]
#[command(about = "REST API for the Potluck recipe catalog and spin wheel")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        match command {
            Command::Db(DbCommand::Migrate) => {
                run_db_migrate(&cli.serve).await?;
                return Ok(());
            }
        }
    }

    run_server(cli.serve).await
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Arc<Config>> {
    let ConfigLoad {
        mut config,
        env_file_loaded,
    } = Config::load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    init_tracing();

    if env_file_loaded {
        info!("loaded .env file");
    }

    Ok(Arc::new(config))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run_db_migrate(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(args)?;
    let pool = database::connect(&config.database.url)
        .await
        .context("failed to connect to PostgreSQL for migration")?;
    database::run_migrations(&pool)
        .await
        .context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(&args)?;

    let pool = database::connect(&config.database.url)
        .await
        .context("failed to connect to PostgreSQL")?;
    database::run_migrations(&pool)
        .await
        .context("database migration failed")?;

    let repository = Arc::new(PostgresRecipeRepository::new(pool));
    let recipes = Arc::new(RecipeService::new(repository));
    let state = AppState::new(recipes, Arc::clone(&config));
    let app = create_app(state);

    let addr: SocketAddr =
        format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .context("invalid server address")?;

    let handle = Handle::new();
    tokio::spawn(shutdown_watcher(handle.clone()));

    info!("Starting Potluck API server on {addr}");
    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;
    info!("Server exiting");

    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then gives in-flight requests five seconds
/// to drain.
async fn shutdown_watcher(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
    handle.graceful_shutdown(Some(Duration::from_secs(5)));
}
