//! # OpenAPI Document
//!
//! Aggregates the utoipa path annotations from the route modules into a
//! single OpenAPI document served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// The API document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Haven Escrow & Dispute API",
        description = "Escrow transaction lifecycle and dispute resolution for the Haven marketplace."
    ),
    paths(
        crate::routes::escrow::create_transaction,
        crate::routes::escrow::list_transactions,
        crate::routes::escrow::get_transaction,
        crate::routes::escrow::update_status,
        crate::routes::escrow::resolve_dispute,
        crate::routes::disputes::create_dispute,
        crate::routes::disputes::list_disputes,
        crate::routes::disputes::get_dispute,
        crate::routes::disputes::add_message,
        crate::routes::disputes::update_status,
    ),
    components(schemas(
        crate::routes::escrow::CreateEscrowRequest,
        crate::routes::escrow::UpdateEscrowStatusRequest,
        crate::routes::escrow::ResolveEscrowRequest,
        crate::routes::disputes::CreateDisputeRequest,
        crate::routes::disputes::AddMessageRequest,
        crate::routes::disputes::UpdateDisputeStatusRequest,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "escrow", description = "Escrow transaction lifecycle"),
        (name = "disputes", description = "Dispute resolution workflow"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
