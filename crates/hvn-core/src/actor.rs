//! # Actor Model
//!
//! The canonical representation of an authenticated caller. The identity
//! layer upstream of the services may carry users as bare id strings or as
//! richer profile objects; the request boundary normalizes either shape into
//! an [`Actor`] exactly once. Domain code never branches on representation.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// The role a user holds on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Ordinary account with no marketplace-specific privileges.
    User,
    /// Account shopping for a property.
    Buyer,
    /// Account listing properties for sale.
    Vendor,
    /// Licensed agent acting on behalf of vendors.
    Agent,
    /// Platform operator with arbitration authority.
    Admin,
}

impl ActorRole {
    /// The canonical wire string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Buyer => "buyer",
            Self::Vendor => "vendor",
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }

    /// Whether this role carries platform-operator authority.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActorRole {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "buyer" => Ok(Self::Buyer),
            "vendor" => Ok(Self::Vendor),
            "agent" => Ok(Self::Agent),
            "admin" => Ok(Self::Admin),
            other => Err(crate::error::ValidationError::UnknownRole(
                other.to_string(),
            )),
        }
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The caller's user id.
    pub id: UserId,
    /// The caller's marketplace role.
    pub role: ActorRole,
    /// Display name, when the identity layer supplied one.
    pub name: Option<String>,
    /// Contact email, when the identity layer supplied one.
    pub email: Option<String>,
}

impl Actor {
    /// Create an actor with just an id and role.
    pub fn new(id: UserId, role: ActorRole) -> Self {
        Self {
            id,
            role,
            name: None,
            email: None,
        }
    }

    /// Whether this actor is a platform admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// A point-in-time snapshot of a party embedded in a persisted record.
///
/// Records outlive profile edits, so the parties on a dispute are stored as
/// snapshots rather than references. A snapshot built from a bare id has no
/// role or contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// The party's user id.
    pub id: UserId,
    /// Role at snapshot time, if known.
    pub role: Option<ActorRole>,
    /// Display name at snapshot time, if known.
    pub name: Option<String>,
    /// Email at snapshot time, if known.
    pub email: Option<String>,
}

impl ActorSnapshot {
    /// Snapshot a fully-resolved actor.
    pub fn of(actor: &Actor) -> Self {
        Self {
            id: actor.id,
            role: Some(actor.role),
            name: actor.name.clone(),
            email: actor.email.clone(),
        }
    }

    /// Snapshot a party known only by id.
    pub fn from_id(id: UserId) -> Self {
        Self {
            id,
            role: None,
            name: None,
            email: None,
        }
    }
}
