use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use backend_lib::{
    auth::provision_admin,
    config::{Settings, DEFAULT_CONFIG_FILE},
    create_router,
    storage::{FlatFileUserStore, UserStore},
    AppState,
};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// TOML config file; `WHATHEFOOD_*` env vars override it
    #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create an ADMIN account, or promote an existing one
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Print every account with its role
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_from(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    init_tracing(&settings);

    let store: Arc<dyn UserStore> = Arc::new(
        FlatFileUserStore::new(&settings.storage.path)
            .with_context(|| format!("opening store at {}", settings.storage.path.display()))?,
    );

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(store, settings).await,
        Command::CreateAdmin {
            email,
            name,
            password,
        } => {
            let account = provision_admin(store.as_ref(), &settings.password, &email, &name, password)
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            info!(email = %account.email, id = %account.id, "admin ready");
            Ok(())
        },
        Command::ListUsers => {
            let accounts = store.list().await.map_err(|e| anyhow::anyhow!("{e}"))?;
            for account in accounts {
                println!("{}\t{}\t{}", account.role, account.email, account.display_name);
            }
            Ok(())
        },
    }
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    if settings.logging.json {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}

async fn serve(store: Arc<dyn UserStore>, settings: Settings) -> anyhow::Result<()> {
    let addr = settings.socket_addr()?;
    let static_dir = settings.server.static_dir.clone();
    let state = Arc::new(AppState::new(store, settings)?);
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, static_dir = %static_dir.display(), "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
