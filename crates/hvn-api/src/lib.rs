//! # hvn-api — Axum HTTP Surface
//!
//! Thin request layer over the escrow and dispute services. Its jobs:
//!
//! - Normalize the caller's identity into a canonical [`hvn_core::Actor`]
//!   (the [`auth::CurrentActor`] extractor).
//! - Validate input shape and bounds before anything reaches the domain.
//! - Map domain errors to transport status codes ([`error::AppError`]).
//!
//! ## API Surface
//!
//! | Route                          | Module               | Operation |
//! |--------------------------------|----------------------|-----------|
//! | `POST /v1/escrow`              | [`routes::escrow`]   | Open a purchase |
//! | `GET /v1/escrow`               | [`routes::escrow`]   | Visibility-scoped listing |
//! | `GET /v1/escrow/:id`           | [`routes::escrow`]   | Fetch (party or admin) |
//! | `PATCH /v1/escrow/:id/status`  | [`routes::escrow`]   | Caller-driven status update |
//! | `POST /v1/escrow/:id/resolve`  | [`routes::escrow`]   | Admin arbitration |
//! | `POST /v1/disputes`            | [`routes::disputes`] | File a dispute |
//! | `GET /v1/disputes`             | [`routes::disputes`] | Participant-scoped listing |
//! | `GET /v1/disputes/:id`         | [`routes::disputes`] | Fetch (participant or admin) |
//! | `POST /v1/disputes/:id/messages` | [`routes::disputes`] | Append a timeline message |
//! | `PATCH /v1/disputes/:id/status`  | [`routes::disputes`] | Admin status transition |
//! | `GET /openapi.json`            | [`openapi`]          | OpenAPI document |
//! | `GET /health`                  | —                    | Liveness probe |

pub mod auth;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
///
/// The health probe is mounted outside the API router so it needs no
/// identity headers.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::escrow::router())
        .merge(routes::disputes::router())
        .merge(openapi::router())
        // Body size limit: 1 MiB. Dispute attachments are URIs, not blobs,
        // so nothing legitimate comes close.
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    api.route("/health", get(health))
}

/// GET /health — liveness probe.
async fn health() -> &'static str {
    "ok"
}
