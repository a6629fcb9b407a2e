// ============================================================================
// CHIRPY - SOCIAL POST SERVICE
// ============================================================================

// - Account signup/login with bcrypt password hashing
// - Access/refresh JWTs with a revocable live refresh-token set
// - Author-only post edits and deletes
// - Whole-store JSON snapshot persisted in the background

use anyhow::Context;
use chirpy::{
    AppState,
    config::{Args, Config},
    routes,
    store::Store,
    vault::Vault,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chirpy=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let mut config = Config::from_env().context("invalid configuration")?;
    config.apply_args(&args);

    let vault = Vault::new(config.bcrypt_cost);
    let store = if args.debug {
        Store::open_fresh(&config.database_path, vault).await
    } else {
        Store::open(&config.database_path, vault).await
    }
    .with_context(|| format!("cannot open database {}", config.database_path.display()))?;

    // Create application state
    let state = AppState::new(store.clone(), &config.jwt_secret, config.polka_key.clone());
    let app = routes::router(state, &config.static_dir, config.max_concurrency);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("API Endpoints:");
    info!("  GET    /api/healthz          - Health check");
    info!("  POST   /api/users            - Create account");
    info!("  PUT    /api/users            - Update own account (auth)");
    info!("  POST   /api/login            - Login, returns access + refresh token");
    info!("  POST   /api/refresh          - New access token (refresh token)");
    info!("  POST   /api/revoke           - Revoke refresh token");
    info!("  POST   /oauth/token          - OAuth2 password grant");
    info!("  POST   /api/chirps           - Create post (auth)");
    info!("  GET    /api/chirps           - List posts");
    info!("  GET    /api/chirps/{{id}}      - Get specific post");
    info!("  PUT    /api/chirps/{{id}}      - Edit post (auth, author only)");
    info!("  DELETE /api/chirps/{{id}}      - Delete post (auth, author only)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.flush().await.context("final snapshot write failed")?;
    info!("Snapshot flushed, bye");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
