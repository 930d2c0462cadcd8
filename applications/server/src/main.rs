/// Chat Player Relay Server - per-chat music player backend
use clap::{Parser, Subcommand};
use relay_core::ChatId;
use relay_player::{ManagerConfig, PlayerStateManager};
use relay_server::{
    config::ServerConfig,
    create_router,
    jobs::{HealthMonitor, RecordReaper},
    state::AppState,
    store, YtDlpResolver,
};
use std::{path::PathBuf, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "relay-server")]
#[command(about = "Chat player relay server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Delete player records idle for longer than the configured TTL
    Reap,
    /// Print a chat's player record as JSON
    State {
        /// Chat identifier
        chat_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "relay_server=info,relay_player=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load_from(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::Reap => reap(config).await?,
        Commands::State { chat_id } => print_state(config, &chat_id).await?,
    }

    Ok(())
}

async fn build_manager(
    config: &ServerConfig,
) -> anyhow::Result<(Arc<PlayerStateManager>, store::Stores)> {
    let stores = store::open_store(&config.storage).await?;
    let manager = PlayerStateManager::with_config(
        Arc::clone(&stores.players),
        ManagerConfig {
            storage_timeout: config.storage.op_timeout(),
        },
    );
    Ok((Arc::new(manager), stores))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Chat Player Relay");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let (manager, stores) = build_manager(&config).await?;
    let resolver = Arc::new(YtDlpResolver::new(
        config.resolver.ytdlp_path.clone(),
        config.resolver.max_duration_secs,
    ));
    let shutdown = CancellationToken::new();

    let mut app_state = AppState::new(Arc::clone(&manager), resolver, stores.playlists);

    // Storage health monitor
    if let Some(interval) = config.housekeeping.health_interval() {
        let monitor = Arc::new(HealthMonitor::new(
            Arc::clone(manager.store()),
            interval,
            config.storage.op_timeout(),
            config.housekeeping.max_failed_pings,
        ));
        tokio::spawn(Arc::clone(&monitor).run(shutdown.clone()));
        app_state = app_state.with_health(monitor);
    }

    // Stale record reaper
    if config.housekeeping.reap_enabled {
        let reaper = RecordReaper::new(
            Arc::clone(&manager),
            config.housekeeping.record_ttl(),
            config.housekeeping.reap_interval(),
        );
        tokio::spawn(reaper.run(shutdown.clone()));
    }

    let app = create_router(app_state);

    let addr = config.bind_address()?;
    if let Some(base_url) = &config.server.base_url {
        tracing::info!("Public URL: {}", base_url);
    }
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    // Only the health monitor cancels the token before the listener exits
    let storage_lost = shutdown.is_cancelled();
    shutdown.cancel();
    tracing::info!("Server stopped");

    if storage_lost {
        anyhow::bail!("storage unreachable, exiting for supervisor restart");
    }
    Ok(())
}

/// Resolves on SIGINT, SIGTERM or when a job cancels `shutdown`
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
        () = shutdown.cancelled() => tracing::warn!("Shutdown requested by background job"),
    }
}

async fn reap(config: ServerConfig) -> anyhow::Result<()> {
    let (manager, _) = build_manager(&config).await?;
    let reaper = RecordReaper::new(
        manager,
        config.housekeeping.record_ttl(),
        config.housekeeping.reap_interval(),
    );

    let removed = reaper.reap_once().await?;
    println!("Removed {removed} stale player record(s)");

    Ok(())
}

async fn print_state(config: ServerConfig, chat_id: &str) -> anyhow::Result<()> {
    let (manager, _) = build_manager(&config).await?;
    let chat_id: ChatId = relay_player::params::chat_id(Some(chat_id))?;

    let record = manager.state(&chat_id).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}
