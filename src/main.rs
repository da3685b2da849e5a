// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, sync::Arc};

use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use keycloak_custody_server::{
    api::router,
    auth::AssertionVerifier,
    chain::{BalanceReader, EvmGateway, TransferOrchestrator},
    config::AppConfig,
    state::AppState,
    store::InMemoryStore,
    vault::KeyVault,
};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match env::var("LOG_FORMAT").as_deref() {
        Ok("json") => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AppConfig::from_env().expect("invalid configuration");

    let verifier = AssertionVerifier::new(&config.jwt_public_key, &config.jwt_audience)
        .expect("invalid realm public key");
    let vault = KeyVault::new(&config.vault_master_key).expect("invalid vault master key");
    let gateway = Arc::new(
        EvmGateway::new(&config.rpc_url, config.token_address).expect("invalid RPC URL"),
    );

    let store = Arc::new(RwLock::new(InMemoryStore::new()));
    let vault = Arc::new(vault);
    let orchestrator = Arc::new(TransferOrchestrator::new(
        store.clone(),
        gateway.clone(),
        vault.clone(),
        config.token_address,
        config.chain_id,
        config.receipt_timeout,
    ));
    let balances = Arc::new(BalanceReader::new(gateway));

    let state = AppState::new(store, Arc::new(verifier), vault, orchestrator, balances);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("invalid bind address");

    info!(%addr, chain_id = config.chain_id, token = %config.token_address,
        "custody server listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
