// SPDX-License-Identifier: BUSL-1.1
//! # Escrow API Routes
//!
//! HTTP surface for the escrow transaction lifecycle: opening a purchase,
//! listing visible transactions, fetching one, caller-driven status
//! updates, and admin arbitration of disputed transactions.
//!
//! The handlers validate shape and enum membership, then delegate to
//! [`EscrowManager`], which owns the domain invariants. Fetching a single
//! transaction is the one place authorization lives here: the lookup
//! primitive is unauthenticated by design, so the boundary enforces
//! party-or-admin access.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use hvn_core::{Currency, EscrowId, Money, PropertyId};
use hvn_escrow::{
    CreateTransaction, EscrowStatus, EscrowTransaction, Pagination, PaymentMethod, RoleFilter,
    ResolutionOutcome,
};

use crate::auth::CurrentActor;
use crate::error::AppError;
use crate::state::AppState;

/// Longest accepted free-text note.
const MAX_NOTES_LEN: usize = 1_000;
/// Hard cap on page size.
const MAX_PAGE_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to open an escrow transaction.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEscrowRequest {
    /// The property being purchased.
    #[schema(value_type = String, format = Uuid)]
    pub property_id: PropertyId,
    /// Purchase amount as a decimal string.
    pub amount: String,
    /// ISO 4217 currency code. Defaults to NGN.
    pub currency: Option<String>,
    /// Payment rail identifier.
    pub payment_method: String,
    /// Target completion instant (ISO 8601).
    pub expected_completion: Option<DateTime<Utc>>,
}

/// Query parameters for transaction listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListTransactionsQuery {
    /// Restrict to one status.
    pub status: Option<String>,
    /// Role-relative filter: `buyer`, `seller`, or `admin`.
    #[serde(rename = "type")]
    pub role: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
    /// Items per page, capped at 100.
    pub limit: Option<usize>,
}

/// One page of transactions.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListTransactionsResponse {
    pub transactions: Vec<EscrowTransaction>,
    pub pagination: Pagination,
}

/// Caller-driven status update.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEscrowStatusRequest {
    /// Target status.
    pub status: String,
    /// Optional note carried to the parties' notifications.
    pub notes: Option<String>,
}

/// Admin arbitration of a disputed transaction.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveEscrowRequest {
    /// Arbitration outcome.
    pub resolution: String,
    /// Optional notes recorded with the decision.
    pub admin_notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the escrow router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/escrow", post(create_transaction).get(list_transactions))
        .route("/v1/escrow/:id", get(get_transaction))
        .route("/v1/escrow/:id/status", patch(update_status))
        .route("/v1/escrow/:id/resolve", post(resolve_dispute))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_notes(notes: &Option<String>) -> Result<(), AppError> {
    match notes {
        Some(n) if n.chars().count() > MAX_NOTES_LEN => Err(AppError::Validation(format!(
            "notes must not exceed {MAX_NOTES_LEN} characters"
        ))),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/escrow — Open an escrow transaction.
#[utoipa::path(
    post,
    path = "/v1/escrow",
    request_body = CreateEscrowRequest,
    responses(
        (status = 201, description = "Transaction opened in pending status"),
        (status = 409, description = "Property already held or not available"),
        (status = 422, description = "Validation error"),
    ),
    tag = "escrow"
)]
pub(crate) async fn create_transaction(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(req): Json<CreateEscrowRequest>,
) -> Result<(StatusCode, Json<EscrowTransaction>), AppError> {
    let currency = match req.currency.as_deref() {
        Some(code) => code
            .parse::<Currency>()
            .map_err(|e| AppError::Validation(e.to_string()))?,
        None => Currency::default(),
    };
    let amount =
        Money::new(req.amount, currency).map_err(|e| AppError::Validation(e.to_string()))?;
    let payment_method: PaymentMethod = req
        .payment_method
        .parse()
        .map_err(|e: hvn_escrow::EscrowError| AppError::Validation(e.to_string()))?;

    let tx = state.escrow.create_transaction(CreateTransaction {
        property_id: req.property_id,
        amount,
        payment_method,
        expected_completion: req.expected_completion,
        buyer: actor,
    })?;

    Ok((StatusCode::CREATED, Json(tx)))
}

/// GET /v1/escrow — List transactions visible to the caller.
#[utoipa::path(
    get,
    path = "/v1/escrow",
    params(ListTransactionsQuery),
    responses(
        (status = 200, description = "Page of transactions, newest first"),
        (status = 422, description = "Unknown status or type filter"),
    ),
    tag = "escrow"
)]
pub(crate) async fn list_transactions(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponse>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<EscrowStatus>)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let filter = query
        .role
        .as_deref()
        .map(str::parse::<RoleFilter>)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let page = state.escrow.list_transactions(
        &actor,
        status,
        filter,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(20).min(MAX_PAGE_LIMIT),
    );

    Ok(Json(ListTransactionsResponse {
        transactions: page.items,
        pagination: page.pagination,
    }))
}

/// GET /v1/escrow/:id — Fetch one transaction.
#[utoipa::path(
    get,
    path = "/v1/escrow/{id}",
    params(("id" = String, Path, description = "Escrow transaction UUID")),
    responses(
        (status = 200, description = "Transaction details"),
        (status = 403, description = "Caller is neither a party nor an admin"),
        (status = 404, description = "Unknown transaction"),
    ),
    tag = "escrow"
)]
pub(crate) async fn get_transaction(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<EscrowId>,
) -> Result<Json<EscrowTransaction>, AppError> {
    let tx = state
        .escrow
        .transaction_by_id(&id)
        .ok_or_else(|| AppError::NotFound(format!("escrow transaction {id} not found")))?;
    if !actor.is_admin() && !tx.is_party(&actor.id) {
        return Err(AppError::Forbidden(
            "not authorized to view this transaction".to_string(),
        ));
    }
    Ok(Json(tx))
}

/// PATCH /v1/escrow/:id/status — Caller-driven status update.
#[utoipa::path(
    patch,
    operation_id = "update_escrow_status",
    path = "/v1/escrow/{id}/status",
    params(("id" = String, Path, description = "Escrow transaction UUID")),
    request_body = UpdateEscrowStatusRequest,
    responses(
        (status = 200, description = "Status applied, both parties notified"),
        (status = 404, description = "Unknown transaction"),
        (status = 422, description = "Unknown or unreachable status"),
    ),
    tag = "escrow"
)]
pub(crate) async fn update_status(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<EscrowId>,
    Json(req): Json<UpdateEscrowStatusRequest>,
) -> Result<Json<EscrowTransaction>, AppError> {
    check_notes(&req.notes)?;
    let status: EscrowStatus = req
        .status
        .parse()
        .map_err(|e: hvn_escrow::EscrowError| AppError::Validation(e.to_string()))?;

    let tx = state.escrow.update_status(&id, status, &actor, req.notes)?;
    Ok(Json(tx))
}

/// POST /v1/escrow/:id/resolve — Arbitrate a disputed transaction.
#[utoipa::path(
    post,
    path = "/v1/escrow/{id}/resolve",
    params(("id" = String, Path, description = "Escrow transaction UUID")),
    request_body = ResolveEscrowRequest,
    responses(
        (status = 200, description = "Dispute resolved, transaction settled"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown transaction"),
        (status = 409, description = "Transaction is not disputed"),
    ),
    tag = "escrow"
)]
pub(crate) async fn resolve_dispute(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<EscrowId>,
    Json(req): Json<ResolveEscrowRequest>,
) -> Result<Json<EscrowTransaction>, AppError> {
    check_notes(&req.admin_notes)?;
    let outcome: ResolutionOutcome = req
        .resolution
        .parse()
        .map_err(|e: hvn_escrow::EscrowError| AppError::Validation(e.to_string()))?;

    let tx = state
        .escrow
        .resolve_dispute(&id, outcome, req.admin_notes, &actor)?;
    Ok(Json(tx))
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

    use hvn_core::UserId;
    use hvn_escrow::{Property, PropertyStatus};
    use hvn_notify::CollectingGateway;

    fn test_state() -> (AppState, Arc<CollectingGateway>) {
        let gateway = Arc::new(CollectingGateway::new());
        (AppState::in_memory(gateway.clone()), gateway)
    }

    fn test_app(state: AppState) -> Router<()> {
        router().with_state(state)
    }

    fn seed_property(state: &AppState, owner: UserId) -> PropertyId {
        let id = PropertyId::new();
        state.directory.upsert(Property {
            id,
            title: "Detached house, Asokoro".to_string(),
            owner_id: Some(owner),
            status: PropertyStatus::ForSale,
        });
        id
    }

    fn authed(builder: axum::http::request::Builder, user: UserId, role: &str) -> axum::http::request::Builder {
        builder
            .header(USER_ID_HEADER, user.to_string())
            .header(USER_ROLE_HEADER, role)
            .header("content-type", "application/json")
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn create_body(property_id: PropertyId) -> String {
        serde_json::json!({
            "property_id": property_id,
            "amount": "5000000",
            "payment_method": "bank_transfer"
        })
        .to_string()
    }

    async fn create_via_api(
        state: &AppState,
        property_id: PropertyId,
        buyer: UserId,
    ) -> EscrowTransaction {
        let app = test_app(state.clone());
        let request = authed(Request::builder().method("POST").uri("/v1/escrow"), buyer, "buyer")
            .body(Body::from(create_body(property_id)))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn create_returns_pending_transaction() {
        let (state, _) = test_state();
        let seller = UserId::new();
        let property = seed_property(&state, seller);
        let buyer = UserId::new();

        let tx = create_via_api(&state, property, buyer).await;
        assert_eq!(tx.status, EscrowStatus::Pending);
        assert_eq!(tx.buyer_id, buyer);
        assert_eq!(tx.seller_id, seller);
    }

    #[tokio::test]
    async fn create_without_identity_is_401() {
        let (state, _) = test_state();
        let property = seed_property(&state, UserId::new());
        let app = test_app(state);

        let request = Request::builder()
            .method("POST")
            .uri("/v1/escrow")
            .header("content-type", "application/json")
            .body(Body::from(create_body(property)))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_with_bad_amount_is_422() {
        let (state, _) = test_state();
        let property = seed_property(&state, UserId::new());
        let app = test_app(state);

        let body = serde_json::json!({
            "property_id": property,
            "amount": "-5",
            "payment_method": "cash"
        });
        let request = authed(
            Request::builder().method("POST").uri("/v1/escrow"),
            UserId::new(),
            "buyer",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn second_transaction_for_property_is_409() {
        let (state, _) = test_state();
        let property = seed_property(&state, UserId::new());
        create_via_api(&state, property, UserId::new()).await;

        let app = test_app(state);
        let request = authed(
            Request::builder().method("POST").uri("/v1/escrow"),
            UserId::new(),
            "buyer",
        )
        .body(Body::from(create_body(property)))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn listing_excludes_other_parties() {
        let (state, _) = test_state();
        let buyer_a = UserId::new();
        let property_ab = seed_property(&state, UserId::new());
        let property_cd = seed_property(&state, UserId::new());
        create_via_api(&state, property_ab, buyer_a).await;
        create_via_api(&state, property_cd, UserId::new()).await;

        let app = test_app(state);
        let request = authed(Request::builder().method("GET").uri("/v1/escrow"), buyer_a, "buyer")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page: ListTransactionsResponse = body_json(response).await;
        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.transactions[0].buyer_id, buyer_a);
        assert_eq!(page.pagination.total_items, 1);
    }

    #[tokio::test]
    async fn unknown_status_filter_is_422() {
        let (state, _) = test_state();
        let app = test_app(state);
        let request = authed(
            Request::builder()
                .method("GET")
                .uri("/v1/escrow?status=sideways"),
            UserId::new(),
            "buyer",
        )
        .body(Body::empty())
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn get_is_party_or_admin_only() {
        let (state, _) = test_state();
        let buyer = UserId::new();
        let property = seed_property(&state, UserId::new());
        let tx = create_via_api(&state, property, buyer).await;

        // A stranger is rejected.
        let app = test_app(state.clone());
        let request = authed(
            Request::builder().method("GET").uri(format!("/v1/escrow/{}", tx.id)),
            UserId::new(),
            "buyer",
        )
        .body(Body::empty())
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // An admin is not.
        let app = test_app(state);
        let request = authed(
            Request::builder().method("GET").uri(format!("/v1/escrow/{}", tx.id)),
            UserId::new(),
            "admin",
        )
        .body(Body::empty())
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_unknown_transaction_is_404() {
        let (state, _) = test_state();
        let app = test_app(state);
        let request = authed(
            Request::builder()
                .method("GET")
                .uri(format!("/v1/escrow/{}", EscrowId::new())),
            UserId::new(),
            "admin",
        )
        .body(Body::empty())
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn status_update_round_trip() {
        let (state, gateway) = test_state();
        let buyer = UserId::new();
        let property = seed_property(&state, UserId::new());
        let tx = create_via_api(&state, property, buyer).await;

        let app = test_app(state);
        let body = serde_json::json!({ "status": "active" });
        let request = authed(
            Request::builder()
                .method("PATCH")
                .uri(format!("/v1/escrow/{}/status", tx.id)),
            buyer,
            "buyer",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let updated: EscrowTransaction = body_json(response).await;
        assert_eq!(updated.status, EscrowStatus::Active);

        // Both parties were notified of the change.
        let status_changes = gateway
            .sent()
            .iter()
            .filter(|n| n.kind == hvn_notify::NotificationKind::EscrowStatusChanged)
            .count();
        assert_eq!(status_changes, 2);
    }

    #[tokio::test]
    async fn refunded_is_not_a_caller_target() {
        let (state, _) = test_state();
        let buyer = UserId::new();
        let property = seed_property(&state, UserId::new());
        let tx = create_via_api(&state, property, buyer).await;

        let app = test_app(state);
        let body = serde_json::json!({ "status": "refunded" });
        let request = authed(
            Request::builder()
                .method("PATCH")
                .uri(format!("/v1/escrow/{}/status", tx.id)),
            buyer,
            "buyer",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn resolve_flow_via_api() {
        let (state, _) = test_state();
        let buyer = UserId::new();
        let property = seed_property(&state, UserId::new());
        let tx = create_via_api(&state, property, buyer).await;

        // Mark disputed.
        let app = test_app(state.clone());
        let request = authed(
            Request::builder()
                .method("PATCH")
                .uri(format!("/v1/escrow/{}/status", tx.id)),
            buyer,
            "buyer",
        )
        .body(Body::from(serde_json::json!({ "status": "disputed" }).to_string()))
        .unwrap();
        assert_eq!(app.oneshot(request).await.unwrap().status(), StatusCode::OK);

        // Non-admin cannot resolve.
        let app = test_app(state.clone());
        let body = serde_json::json!({ "resolution": "full_refund" });
        let request = authed(
            Request::builder()
                .method("POST")
                .uri(format!("/v1/escrow/{}/resolve", tx.id)),
            buyer,
            "buyer",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Admin resolves with a full refund.
        let app = test_app(state);
        let request = authed(
            Request::builder()
                .method("POST")
                .uri(format!("/v1/escrow/{}/resolve", tx.id)),
            UserId::new(),
            "admin",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let resolved: EscrowTransaction = body_json(response).await;
        assert_eq!(resolved.status, EscrowStatus::Refunded);
        assert!(resolved.resolution.is_some());
    }

    #[tokio::test]
    async fn resolve_non_disputed_is_409() {
        let (state, _) = test_state();
        let property = seed_property(&state, UserId::new());
        let tx = create_via_api(&state, property, UserId::new()).await;

        let app = test_app(state);
        let body = serde_json::json!({ "resolution": "seller_favor" });
        let request = authed(
            Request::builder()
                .method("POST")
                .uri(format!("/v1/escrow/{}/resolve", tx.id)),
            UserId::new(),
            "admin",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn router_builds_successfully() {
        let _router = router();
    }
}
