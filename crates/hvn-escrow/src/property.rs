//! # Property Catalog Seam
//!
//! The property catalog is another subsystem; escrow consumes it read-only
//! through [`PropertyDirectory`] to resolve the seller and check
//! availability at creation time. [`InMemoryPropertyDirectory`] backs tests
//! and development deployments.

use serde::{Deserialize, Serialize};

use dashmap::DashMap;
use hvn_core::{PropertyId, UserId};

/// Listing status of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyStatus {
    /// Listed and open to offers.
    Available,
    /// Actively marketed for sale.
    ForSale,
    /// Listing is live.
    Active,
    /// Purchase concluded.
    Sold,
    /// Listing pulled by the owner or an operator.
    Delisted,
}

impl PropertyStatus {
    /// The canonical wire string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::ForSale => "for-sale",
            Self::Active => "active",
            Self::Sold => "sold",
            Self::Delisted => "delisted",
        }
    }

    /// Whether a purchase may be opened against a property in this status.
    pub fn is_purchasable(&self) -> bool {
        matches!(self, Self::Available | Self::ForSale | Self::Active)
    }
}

impl std::fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A property listing, as seen from the escrow subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Unique property identifier.
    pub id: PropertyId,
    /// Listing title.
    pub title: String,
    /// The registered owner. Absent for listings mid-transfer.
    pub owner_id: Option<UserId>,
    /// Current listing status.
    pub status: PropertyStatus,
}

/// Read-only lookup into the property catalog.
pub trait PropertyDirectory: Send + Sync {
    /// Fetch a property by id.
    fn property_by_id(&self, id: &PropertyId) -> Option<Property>;
}

/// In-memory property directory for tests and development.
#[derive(Default)]
pub struct InMemoryPropertyDirectory {
    properties: DashMap<PropertyId, Property>,
}

impl InMemoryPropertyDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a property.
    pub fn upsert(&self, property: Property) {
        self.properties.insert(property.id, property);
    }
}

impl PropertyDirectory for InMemoryPropertyDirectory {
    fn property_by_id(&self, id: &PropertyId) -> Option<Property> {
        self.properties.get(id).map(|p| p.value().clone())
    }
}
