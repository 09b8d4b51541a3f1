//! # Actor Extraction
//!
//! The identity layer in front of this service authenticates callers and
//! forwards their identity as headers. [`CurrentActor`] turns those headers
//! into the canonical [`Actor`] in one place — the only spot in the system
//! that deals with raw identity representation. Handlers and domain code
//! below it never see anything but the normalized struct.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use hvn_core::{Actor, ActorRole, UserId};

use crate::error::AppError;

/// Header carrying the authenticated user id (UUID).
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";
/// Optional header carrying the user's display name.
pub const USER_NAME_HEADER: &str = "x-user-name";
/// Optional header carrying the user's email.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// The authenticated caller, extracted from identity headers.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };

        let id: UserId = header(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("missing identity context".to_string()))?
            .parse()
            .map_err(|_| AppError::Unauthorized("malformed user id".to_string()))?;
        let role: ActorRole = header(USER_ROLE_HEADER)
            .ok_or_else(|| AppError::Unauthorized("missing identity context".to_string()))?
            .parse()
            .map_err(|_| AppError::Unauthorized("unrecognized role".to_string()))?;

        let mut actor = Actor::new(id, role);
        actor.name = header(USER_NAME_HEADER);
        actor.email = header(USER_EMAIL_HEADER);

        Ok(CurrentActor(actor))
    }
}
