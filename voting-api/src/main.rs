mod extract;
mod routes;

use voting_app::infrastructure::db::{create_connection, run_migrations};
use voting_app::{AppConfig, AppContext};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env().unwrap_or_else(|e| fatal("Invalid configuration", e));

    let db = create_connection(&config.database_url)
        .await
        .unwrap_or_else(|e| fatal("Failed to connect to database", e));
    if let Err(e) = run_migrations(&db).await {
        fatal("Failed to apply migrations", e);
    }

    let addr = config.site_addr;
    tracing::info!(
        admin = config.admin_email.is_some(),
        channel = config.channel_name.is_some(),
        secure_cookies = config.secure_cookies,
        static_dir = %config.static_dir.display(),
        "Configuration loaded"
    );

    let ctx = AppContext::new(config, db).unwrap_or_else(|e| fatal("Invalid OAuth settings", e));
    let app = routes::router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| fatal("Failed to bind address", e));
    tracing::info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        fatal("Server error", e);
    }
}

fn fatal(context: &str, err: impl std::fmt::Display) -> ! {
    tracing::error!("{}: {}", context, err);
    std::process::exit(1);
}
