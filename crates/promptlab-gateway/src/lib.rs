//! HTTP surface of the chat proxy.
//!
//! A single route, `POST /api/chat`, hands the request body to a
//! [`ChatDispatch`](promptlab_providers::ChatDispatch) and answers with the
//! upstream JSON, or `{"error": "..."}` on failure.

mod error;
mod handler;

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;

pub use error::ApiError;
pub use handler::{router, AppState, CHAT_PATH};

/// Serve `app` on `listener` until `shutdown` resolves.
///
/// In-flight requests are allowed to finish once shutdown starts.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
