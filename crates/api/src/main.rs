use std::net::SocketAddr;
use std::sync::Arc;

use fuzzhub_events::TerminalHub;
use fuzzhub_registry::{NewUser, ToolRegistry, UserDirectory};
use fuzzhub_runner::JobRunner;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fuzzhub_api::auth::password::hash_password;
use fuzzhub_api::config::{BootstrapConfig, ServerConfig};
use fuzzhub_api::router::build_app_router;
use fuzzhub_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fuzzhub=debug,fuzzhub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage collaborators (in-memory, reset on restart) ---
    let tools = Arc::new(ToolRegistry::with_default_catalog().await);
    tracing::info!(count = tools.list().await.len(), "Tool catalog seeded");

    let users = Arc::new(UserDirectory::new());
    seed_accounts(&users, &config.bootstrap).await;

    // --- Terminal hub and job runner ---
    let hub = Arc::new(TerminalHub::new());
    let runner = Arc::new(JobRunner::new(Arc::clone(&hub), Arc::clone(&tools)));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        tools,
        users,
        hub,
        runner,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // In-flight jobs are detached child processes; they end with this
    // process. Subscriptions and catalog state are in-memory only.
    tracing::info!("Graceful shutdown complete");
}

/// Seed the bootstrap admin and demo user accounts.
async fn seed_accounts(users: &UserDirectory, bootstrap: &BootstrapConfig) {
    let accounts = [
        (
            &bootstrap.admin_email,
            &bootstrap.admin_password,
            "Admin",
            fuzzhub_core::roles::ROLE_ADMIN,
        ),
        (
            &bootstrap.user_email,
            &bootstrap.user_password,
            "Regular",
            fuzzhub_core::roles::ROLE_USER,
        ),
    ];

    for (email, password, first_name, role) in accounts {
        let password_hash = hash_password(password).expect("Password hashing failed");
        users
            .create(NewUser {
                email: email.clone(),
                password_hash,
                first_name: Some(first_name.to_string()),
                last_name: Some("User".to_string()),
                role: role.to_string(),
            })
            .await
            .expect("Failed to seed bootstrap account");
        tracing::info!(%email, role, "Bootstrap account created");
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
