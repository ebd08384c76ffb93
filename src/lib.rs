//! Salescope is a web app for exploring sales data.
//!
//! On startup it loads a batch of sale records from a remote API, then serves
//! an HTML dashboard with trend metrics, revenue charts, product rankings,
//! and a filterable sales table.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

pub mod dashboard;
mod endpoints;
pub mod filter;
mod html;
pub mod loader;
mod navigation;
mod not_found;
pub mod record;
mod routing;
mod state;

pub use routing::build_router;
pub use state::AppState;

use crate::html::error_view;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The data load failed before producing records.
    ///
    /// Covers connection failures, body read errors, and malformed JSON.
    /// The error string should be logged on the server.
    #[error("loading sale records failed: {0}")]
    LoadFailed(String),

    /// The data API answered with a non-success status code.
    #[error("the data API returned status {0}")]
    UnexpectedStatus(u16),

    /// The load was cancelled via its handle before finishing.
    #[error("the data load was cancelled")]
    LoadCancelled,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Any error reaching a handler is not intended to be shown in detail to the client.
        tracing::error!("An unexpected error occurred: {}", self);

        error_view(
            "Internal Server Error",
            "500",
            "Something went wrong.",
            "An unexpected error occurred. Check the server logs for more details.",
        )
        .into_response()
    }
}
