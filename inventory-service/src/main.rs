use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;

use inventory_service::config::Config;
use inventory_service::repository::Repository;
use inventory_service::rest::AppState;
use inventory_service::service::Service;
use inventory_service::{database, grpc, observability, rest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    observability::init_tracing(&config);

    let pool = database::create_pool(&config.database)
        .await
        .context("failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    let repo = Repository::new(pool);
    let service = Service::new(repo.clone());

    let state = AppState {
        service: service.clone(),
        repo: repo.clone(),
    };
    let app = rest::router(state, &config);

    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.service.port));
    let grpc_addr = SocketAddr::from((
        [0, 0, 0, 0],
        config.grpc.effective_port(config.service.port),
    ));

    tracing::info!(%http_addr, "REST server listening");
    tracing::info!(%grpc_addr, "gRPC server listening");

    let http_server = async {
        let listener = TcpListener::bind(http_addr)
            .await
            .context("failed to bind REST listener")?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("REST server failed")
    };

    let grpc_server = async {
        tonic::transport::Server::builder()
            .add_service(grpc::server(service.clone()))
            .serve_with_shutdown(grpc_addr, shutdown_signal())
            .await
            .context("gRPC server failed")
    };

    tokio::try_join!(http_server, grpc_server)?;

    repo.close().await;
    tracing::info!("server stopped gracefully");

    Ok(())
}

/// Wait for SIGTERM, SIGINT, or Ctrl+C
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C signal");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM signal");
        }
    }
}
