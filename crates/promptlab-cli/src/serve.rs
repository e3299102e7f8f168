//! `promptlab serve` — run the chat proxy.
//!
//! Startup sequence:
//! 1. Load config (file + env), apply CLI overrides
//! 2. Build registry, credential snapshot, and dispatcher
//! 3. Bind the listener and serve `POST /api/chat`
//! 4. Ctrl+C triggers graceful shutdown

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use promptlab_core::config::load_config;
use promptlab_gateway::{router, serve, AppState, CHAT_PATH};
use promptlab_providers::Dispatcher;

use crate::helpers;

/// Run the proxy until Ctrl+C.
pub async fn run(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> Result<()> {
    helpers::print_banner();

    let mut config = load_config(config_path);
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let dispatcher = Dispatcher::from_config(&config);
    let providers = dispatcher.registry().len();
    let fallback = dispatcher.registry().fallback().display_name.clone();

    let state = AppState::new(Arc::new(dispatcher)).with_relay_status(config.upstream.relay_status);
    let app = router(state, config.server.cors);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        addr = %addr,
        providers,
        fallback = %fallback,
        cors = config.server.cors,
        relay_status = config.upstream.relay_status,
        "proxy starting"
    );

    println!("  Endpoint:  POST http://{addr}{CHAT_PATH}");
    println!("  Providers: {providers} (fallback: {fallback})");
    println!();
    println!("  Ctrl+C to stop");
    println!();

    serve(listener, app, async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                println!();
                println!("  Shutting down...");
                info!("received Ctrl+C, shutting down");
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for Ctrl+C, running until killed");
                std::future::pending::<()>().await;
            }
        }
    })
    .await
    .context("proxy server error")?;

    println!("  Proxy stopped. Goodbye!");
    Ok(())
}
