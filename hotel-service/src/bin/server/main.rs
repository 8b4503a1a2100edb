use std::sync::Arc;

use anyhow::Context;
use auth::Authenticator;
use hotel_service::config::Config;
use hotel_service::config::StoreBackend;
use hotel_service::domain::auth::service::AuthService;
use hotel_service::domain::order::ports::OrderRepository;
use hotel_service::domain::order::service::OrderService;
use hotel_service::domain::user::models::Username;
use hotel_service::domain::user::ports::CredentialStore;
use hotel_service::domain::user::ports::UserServicePort;
use hotel_service::domain::user::service::UserService;
use hotel_service::inbound::http::router::create_router;
use hotel_service::inbound::http::router::AppState;
use hotel_service::outbound::repositories::InMemoryCredentialStore;
use hotel_service::outbound::repositories::InMemoryOrderRepository;
use hotel_service::outbound::repositories::PostgresCredentialStore;
use hotel_service::outbound::repositories::PostgresOrderRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotel_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "hotel-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let token_lifetime = config.jwt.token_lifetime()?;

    tracing::info!(
        http_port = config.server.http_port,
        backend = ?config.database.backend,
        token_lifetime_minutes = token_lifetime.num_minutes(),
        admin_scope_escalation = config.auth.allow_admin_scope_escalation,
        cors_origins = ?config.cors.allowed_origins,
        "Configuration loaded"
    );

    if config.auth.allow_admin_scope_escalation {
        tracing::warn!("Admin scope escalation enabled: admin logins get any requested scope");
    }

    let (credential_store, order_repository) = build_stores(&config).await?;

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        token_lifetime,
    ));

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&credential_store),
        Arc::clone(&authenticator),
        config.auth.allow_admin_scope_escalation,
    ));
    let user_service = Arc::new(UserService::new(Arc::clone(&credential_store)));
    let order_service = Arc::new(OrderService::new(order_repository));

    if let Some(bootstrap) = &config.bootstrap {
        let username = Username::new(bootstrap.username.clone())
            .context("bootstrap.username is not a valid username")?;
        let created = user_service
            .ensure_supervisor(username, bootstrap.password.clone())
            .await?;
        if !created {
            tracing::info!(username = %bootstrap.username, "Bootstrap account already present");
        }
    }

    let state = AppState {
        auth_service,
        user_service,
        order_service,
        api_token: config.api.token.clone(),
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(state, &config.cors.allowed_origins);
    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");

    Ok(())
}

async fn build_stores(
    config: &Config,
) -> Result<(Arc<dyn CredentialStore>, Arc<dyn OrderRepository>), anyhow::Error> {
    match config.database.backend {
        StoreBackend::Memory => {
            tracing::warn!(database = "memory", "Using in-memory stores; data is lost on exit");
            let credential_store: Arc<dyn CredentialStore> =
                Arc::new(InMemoryCredentialStore::new());
            let order_repository: Arc<dyn OrderRepository> =
                Arc::new(InMemoryOrderRepository::new());
            Ok((credential_store, order_repository))
        }
        StoreBackend::Postgres => {
            let url = config
                .database
                .url
                .as_deref()
                .context("database.url is required for the postgres backend")?;

            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let credential_store: Arc<dyn CredentialStore> =
                Arc::new(PostgresCredentialStore::new(pg_pool.clone()));
            let order_repository: Arc<dyn OrderRepository> =
                Arc::new(PostgresOrderRepository::new(pg_pool));
            Ok((credential_store, order_repository))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::warn!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::warn!("Received SIGTERM, shutting down");
        }
    }
}
