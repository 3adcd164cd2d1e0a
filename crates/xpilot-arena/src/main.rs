//! `XPilot` Focus Arena Server
//!
//! HTTP API for 1-vs-1 deep-work challenges, plus operator commands for
//! provisioning users and minting access tokens.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use xpilot_arena::api::{AppState, build_router};
use xpilot_arena::arena::ArenaService;
use xpilot_arena::auth::JwtManager;
use xpilot_arena::storage::{ArenaDatabase, UserRole};
use xpilot_core::Config;
use xpilot_core::config::load_config;
use xpilot_core::tracing_init::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "xpilot-arena")]
#[command(version, about = "XPilot Focus Arena server - challenges, ratings and leaderboard")]
struct Cli {
    /// Path to a JSON settings file layered over the global one.
    #[arg(long, global = true, env = "XPILOT_CONFIG")]
    config: Option<PathBuf>,

    /// Path to `SQLite` database file.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Provision a user record
    AddUser(AddUserArgs),
    /// Mint an access token for an existing user
    IssueToken(IssueTokenArgs),
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long)]
    addr: Option<String>,

    /// JWT secret key.
    #[arg(long)]
    jwt_secret: Option<String>,
}

#[derive(Debug, Args)]
struct AddUserArgs {
    /// Display name.
    #[arg(long)]
    name: String,

    /// Account role; only workers can be challenged.
    #[arg(long, default_value = "worker")]
    role: UserRole,

    /// User ID (generated when omitted).
    #[arg(long)]
    id: Option<String>,
}

#[derive(Debug, Args)]
struct IssueTokenArgs {
    #[arg(long)]
    user_id: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = cli.db_path {
        config.server.database_path = Some(path);
    }
    if cli.log_json {
        config.server.log_json = true;
    }

    init_tracing("xpilot_arena=info", config.server.log_json);

    let db = open_database(&config).await?;

    match cli.command {
        Commands::Serve(args) => serve(args, config, db).await,
        Commands::AddUser(args) => add_user(&db, args).await,
        Commands::IssueToken(args) => issue_token(&db, &config, &args.user_id).await,
    }
}

async fn open_database(config: &Config) -> anyhow::Result<ArenaDatabase> {
    let path = match &config.server.database_path {
        Some(path) => path.clone(),
        None => default_db_path()?,
    };
    info!(path = %path.display(), "Opening arena database");
    Ok(ArenaDatabase::open(&path).await?)
}

async fn serve(args: ServeArgs, mut config: Config, db: ArenaDatabase) -> anyhow::Result<()> {
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }
    if let Some(secret) = args.jwt_secret {
        config.auth.jwt_secret = secret;
    }
    let addr: SocketAddr = config.server.addr.parse()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %addr,
        k_factor = config.arena.k_factor,
        "Starting xpilot-arena"
    );

    let jwt = Arc::new(JwtManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.access_ttl_secs,
    ));
    let service = ArenaService::new(db, config.arena);
    let app = build_router(AppState::new(service, jwt));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received shutdown signal");
        })
        .await?;

    info!("Arena stopped");
    Ok(())
}

#[allow(clippy::print_stdout)]
async fn add_user(db: &ArenaDatabase, args: AddUserArgs) -> anyhow::Result<()> {
    let id = args
        .id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let user = db.create_user(&id, &args.name, args.role).await?;
    info!(user_id = %user.id, role = ?user.role, "User created");
    println!("{}", user.id);
    Ok(())
}

#[allow(clippy::print_stdout)]
async fn issue_token(db: &ArenaDatabase, config: &Config, user_id: &str) -> anyhow::Result<()> {
    let user = db.get_user(user_id).await?;
    let jwt = JwtManager::new(config.auth.jwt_secret.as_bytes(), config.auth.access_ttl_secs);
    let (token, ttl) = jwt.issue_access_token(&user.id, &user.name)?;
    info!(user_id = %user.id, ttl_secs = ttl, "Access token issued");
    println!("{token}");
    Ok(())
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".xpilot").join("arena.db"))
}
