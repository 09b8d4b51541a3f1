// SPDX-License-Identifier: BUSL-1.1
//! # Dispute API Routes
//!
//! HTTP surface for the dispute workflow: filing, listing, fetching,
//! timeline messages, and admin status transitions. Handlers validate
//! shape and bounds (description length, enum membership) and delegate the
//! participant-eligibility rules to [`DisputeWorkflow`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use hvn_core::{DisputeId, EscrowId, PropertyId, UserId};
use hvn_dispute::{
    AddMessage, CreateDispute, Dispute, DisputeReason, DisputeStatus, UpdateStatus,
};

use crate::auth::CurrentActor;
use crate::error::AppError;
use crate::state::AppState;

/// Description length bounds, inclusive.
const DESCRIPTION_LEN: std::ops::RangeInclusive<usize> = 10..=1_500;
/// Longest accepted message or resolution note.
const MAX_NOTES_LEN: usize = 1_000;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request to file a dispute.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDisputeRequest {
    /// Property anchor. Required when `escrow_id` is absent.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub property_id: Option<PropertyId>,
    /// Escrow anchor.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub escrow_id: Option<EscrowId>,
    /// Counterparty, required when the filer owns the property.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub counterparty_id: Option<UserId>,
    /// Dispute reason identifier.
    pub reason: String,
    /// The filer's account of the problem, 10–1500 characters.
    pub description: String,
    /// Supporting document URIs.
    pub attachments: Option<Vec<String>>,
}

/// Query parameters for dispute listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListDisputesQuery {
    /// Restrict to one status.
    pub status: Option<String>,
}

/// Request to append a timeline message.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddMessageRequest {
    /// Message body.
    pub message: String,
    /// Supporting document URIs.
    pub attachments: Option<Vec<String>>,
}

/// Admin status transition.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDisputeStatusRequest {
    /// Target status.
    pub status: String,
    /// Notes recorded with the transition.
    pub resolution_notes: Option<String>,
    /// Decision label (e.g. `seller_favor`).
    pub resolution: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the dispute router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/disputes", post(create_dispute).get(list_disputes))
        .route("/v1/disputes/:id", get(get_dispute))
        .route("/v1/disputes/:id/messages", post(add_message))
        .route("/v1/disputes/:id/status", patch(update_status))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/disputes — File a dispute.
#[utoipa::path(
    post,
    path = "/v1/disputes",
    request_body = CreateDisputeRequest,
    responses(
        (status = 201, description = "Dispute filed in open status"),
        (status = 403, description = "Filer is a stranger to the escrow transaction"),
        (status = 404, description = "Dangling property or escrow reference"),
        (status = 422, description = "Validation error"),
    ),
    tag = "disputes"
)]
pub(crate) async fn create_dispute(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(req): Json<CreateDisputeRequest>,
) -> Result<(StatusCode, Json<Dispute>), AppError> {
    let reason: DisputeReason = req
        .reason
        .parse()
        .map_err(|e: hvn_dispute::DisputeError| AppError::Validation(e.to_string()))?;
    if !DESCRIPTION_LEN.contains(&req.description.chars().count()) {
        return Err(AppError::Validation(format!(
            "description must be between {} and {} characters",
            DESCRIPTION_LEN.start(),
            DESCRIPTION_LEN.end()
        )));
    }

    let dispute = state.disputes.create_dispute(CreateDispute {
        user: actor,
        property_id: req.property_id,
        escrow_id: req.escrow_id,
        counterparty_id: req.counterparty_id,
        reason,
        description: req.description,
        attachments: req.attachments.unwrap_or_default(),
    })?;

    Ok((StatusCode::CREATED, Json(dispute)))
}

/// GET /v1/disputes — List disputes visible to the caller.
#[utoipa::path(
    get,
    path = "/v1/disputes",
    params(ListDisputesQuery),
    responses(
        (status = 200, description = "Disputes the caller may see, newest first"),
        (status = 422, description = "Unknown status filter"),
    ),
    tag = "disputes"
)]
pub(crate) async fn list_disputes(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ListDisputesQuery>,
) -> Result<Json<Vec<Dispute>>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<DisputeStatus>)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(Json(state.disputes.list_disputes(&actor, status)))
}

/// GET /v1/disputes/:id — Fetch one dispute.
#[utoipa::path(
    get,
    path = "/v1/disputes/{id}",
    params(("id" = String, Path, description = "Dispute UUID")),
    responses(
        (status = 200, description = "Dispute details"),
        (status = 403, description = "Caller is neither a participant nor an admin"),
        (status = 404, description = "Unknown dispute"),
    ),
    tag = "disputes"
)]
pub(crate) async fn get_dispute(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<DisputeId>,
) -> Result<Json<Dispute>, AppError> {
    let dispute = state.disputes.dispute_by_id(&id, &actor)?;
    Ok(Json(dispute))
}

/// POST /v1/disputes/:id/messages — Append a timeline message.
#[utoipa::path(
    post,
    path = "/v1/disputes/{id}/messages",
    params(("id" = String, Path, description = "Dispute UUID")),
    request_body = AddMessageRequest,
    responses(
        (status = 200, description = "Message appended"),
        (status = 403, description = "Caller is neither a participant nor an admin"),
        (status = 404, description = "Unknown dispute"),
        (status = 422, description = "Validation error"),
    ),
    tag = "disputes"
)]
pub(crate) async fn add_message(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<DisputeId>,
    Json(req): Json<AddMessageRequest>,
) -> Result<Json<Dispute>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }
    if req.message.chars().count() > DESCRIPTION_LEN.end() + MAX_NOTES_LEN {
        return Err(AppError::Validation("message is too long".to_string()));
    }

    let dispute = state.disputes.add_message(AddMessage {
        dispute_id: id,
        message: req.message,
        attachments: req.attachments.unwrap_or_default(),
        user: actor,
    })?;
    Ok(Json(dispute))
}

/// PATCH /v1/disputes/:id/status — Admin status transition.
#[utoipa::path(
    patch,
    operation_id = "update_dispute_status",
    path = "/v1/disputes/{id}/status",
    params(("id" = String, Path, description = "Dispute UUID")),
    request_body = UpdateDisputeStatusRequest,
    responses(
        (status = 200, description = "Status applied, every participant notified"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown dispute"),
        (status = 422, description = "Unknown status"),
    ),
    tag = "disputes"
)]
pub(crate) async fn update_status(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<DisputeId>,
    Json(req): Json<UpdateDisputeStatusRequest>,
) -> Result<Json<Dispute>, AppError> {
    let status: DisputeStatus = req
        .status
        .parse()
        .map_err(|e: hvn_dispute::DisputeError| AppError::Validation(e.to_string()))?;
    if let Some(notes) = &req.resolution_notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(AppError::Validation(format!(
                "resolution notes must not exceed {MAX_NOTES_LEN} characters"
            )));
        }
    }

    let dispute = state.disputes.update_status(UpdateStatus {
        dispute_id: id,
        status,
        resolution_notes: req.resolution_notes,
        resolution: req.resolution,
        user: actor,
    })?;
    Ok(Json(dispute))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{USER_ID_HEADER, USER_ROLE_HEADER};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    use hvn_escrow::{Property, PropertyStatus};
    use hvn_notify::CollectingGateway;

    fn test_state() -> (AppState, Arc<CollectingGateway>) {
        let gateway = Arc::new(CollectingGateway::new());
        (AppState::in_memory(gateway.clone()), gateway)
    }

    fn test_app(state: AppState) -> Router<()> {
        super::router().with_state(state)
    }

    fn seed_property(state: &AppState, owner: UserId) -> PropertyId {
        let id = PropertyId::new();
        state.directory.upsert(Property {
            id,
            title: "Semi-detached, Wuse II".to_string(),
            owner_id: Some(owner),
            status: PropertyStatus::Available,
        });
        id
    }

    fn authed(
        builder: axum::http::request::Builder,
        user: UserId,
        role: &str,
    ) -> axum::http::request::Builder {
        builder
            .header(USER_ID_HEADER, user.to_string())
            .header(USER_ROLE_HEADER, role)
            .header("content-type", "application/json")
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn file_via_api(state: &AppState, property: PropertyId, filer: UserId) -> Dispute {
        let app = test_app(state.clone());
        let body = serde_json::json!({
            "property_id": property,
            "reason": "property_condition",
            "description": "Severe structural cracks were found during inspection"
        });
        let request = authed(
            Request::builder().method("POST").uri("/v1/disputes"),
            filer,
            "buyer",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn file_against_property_defaults_respondent_to_owner() {
        let (state, gateway) = test_state();
        let owner = UserId::new();
        let property = seed_property(&state, owner);
        let filer = UserId::new();

        let dispute = file_via_api(&state, property, filer).await;
        assert_eq!(dispute.status, DisputeStatus::Open);
        assert_eq!(dispute.respondent.id, owner);
        assert_eq!(dispute.participants, vec![filer, owner]);

        let sent = gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, owner);
    }

    #[tokio::test]
    async fn filing_without_anchor_is_422() {
        let (state, _) = test_state();
        let app = test_app(state);
        let body = serde_json::json!({
            "reason": "other",
            "description": "No anchor supplied with this filing"
        });
        let request = authed(
            Request::builder().method("POST").uri("/v1/disputes"),
            UserId::new(),
            "buyer",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn filing_against_unknown_escrow_is_404() {
        let (state, _) = test_state();
        let app = test_app(state);
        let body = serde_json::json!({
            "escrow_id": EscrowId::new(),
            "reason": "payment_issues",
            "description": "Funds were never released to the seller"
        });
        let request = authed(
            Request::builder().method("POST").uri("/v1/disputes"),
            UserId::new(),
            "buyer",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn short_description_is_422() {
        let (state, _) = test_state();
        let property = seed_property(&state, UserId::new());
        let app = test_app(state);
        let body = serde_json::json!({
            "property_id": property,
            "reason": "other",
            "description": "too short"
        });
        let request = authed(
            Request::builder().method("POST").uri("/v1/disputes"),
            UserId::new(),
            "buyer",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_reason_is_422() {
        let (state, _) = test_state();
        let property = seed_property(&state, UserId::new());
        let app = test_app(state);
        let body = serde_json::json!({
            "property_id": property,
            "reason": "vibes",
            "description": "A long enough description of the problem"
        });
        let request = authed(
            Request::builder().method("POST").uri("/v1/disputes"),
            UserId::new(),
            "buyer",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn listing_is_participant_scoped() {
        let (state, _) = test_state();
        let filer = UserId::new();
        let property = seed_property(&state, UserId::new());
        file_via_api(&state, property, filer).await;

        let other_property = seed_property(&state, UserId::new());
        file_via_api(&state, other_property, UserId::new()).await;

        let app = test_app(state.clone());
        let request = authed(
            Request::builder().method("GET").uri("/v1/disputes"),
            filer,
            "buyer",
        )
        .body(Body::empty())
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let mine: Vec<Dispute> = body_json(response).await;
        assert_eq!(mine.len(), 1);

        let app = test_app(state);
        let request = authed(
            Request::builder().method("GET").uri("/v1/disputes"),
            UserId::new(),
            "admin",
        )
        .body(Body::empty())
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let all: Vec<Dispute> = body_json(response).await;
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn outsider_read_is_403() {
        let (state, _) = test_state();
        let property = seed_property(&state, UserId::new());
        let dispute = file_via_api(&state, property, UserId::new()).await;

        let app = test_app(state);
        let request = authed(
            Request::builder()
                .method("GET")
                .uri(format!("/v1/disputes/{}", dispute.id)),
            UserId::new(),
            "buyer",
        )
        .body(Body::empty())
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn message_appends_to_timeline() {
        let (state, _) = test_state();
        let filer = UserId::new();
        let property = seed_property(&state, UserId::new());
        let dispute = file_via_api(&state, property, filer).await;

        let app = test_app(state);
        let body = serde_json::json!({
            "message": "Engineer's report attached",
            "attachments": ["https://cdn.example/report.pdf"]
        });
        let request = authed(
            Request::builder()
                .method("POST")
                .uri(format!("/v1/disputes/{}/messages", dispute.id)),
            filer,
            "buyer",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let updated: Dispute = body_json(response).await;
        assert_eq!(updated.timeline.len(), 2);
        assert_eq!(updated.timeline[1].message, "Engineer's report attached");
    }

    #[tokio::test]
    async fn empty_message_is_422() {
        let (state, _) = test_state();
        let filer = UserId::new();
        let property = seed_property(&state, UserId::new());
        let dispute = file_via_api(&state, property, filer).await;

        let app = test_app(state);
        let body = serde_json::json!({ "message": "   " });
        let request = authed(
            Request::builder()
                .method("POST")
                .uri(format!("/v1/disputes/{}/messages", dispute.id)),
            filer,
            "buyer",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn status_update_is_admin_only() {
        let (state, _) = test_state();
        let filer = UserId::new();
        let property = seed_property(&state, UserId::new());
        let dispute = file_via_api(&state, property, filer).await;

        let body = serde_json::json!({ "status": "resolved" });

        let app = test_app(state.clone());
        let request = authed(
            Request::builder()
                .method("PATCH")
                .uri(format!("/v1/disputes/{}/status", dispute.id)),
            filer,
            "buyer",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let app = test_app(state);
        let request = authed(
            Request::builder()
                .method("PATCH")
                .uri(format!("/v1/disputes/{}/status", dispute.id)),
            UserId::new(),
            "admin",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let updated: Dispute = body_json(response).await;
        assert_eq!(updated.status, DisputeStatus::Resolved);
        assert!(updated.resolved_at.is_some());
    }

    #[tokio::test]
    async fn admin_with_unknown_status_is_422() {
        let (state, _) = test_state();
        let property = seed_property(&state, UserId::new());
        let dispute = file_via_api(&state, property, UserId::new()).await;

        let app = test_app(state);
        let body = serde_json::json!({ "status": "escalated" });
        let request = authed(
            Request::builder()
                .method("PATCH")
                .uri(format!("/v1/disputes/{}/status", dispute.id)),
            UserId::new(),
            "admin",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn router_builds_successfully() {
        let _router = super::router();
    }
}
