//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all identifiers in the Shipment Stack. These
//! prevent accidental identifier confusion — you cannot pass a
//! `DocumentId` where a `ShipmentId` is expected.
//!
//! Shipment and document identifiers are sequential integers assigned
//! by their owning collection (the shipment book and the document
//! registry respectively), starting at 1. Trade and principal
//! identifiers are random UUIDs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a shipment within its owning collection.
///
/// Assigned sequentially by the shipment book, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShipmentId(pub u64);

impl ShipmentId {
    /// The first identifier an owning collection hands out.
    pub const FIRST: ShipmentId = ShipmentId(1);

    /// The identifier following this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Access the raw sequence number.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Unique identifier for a registered document.
///
/// Assigned sequentially by the document registry, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl DocumentId {
    /// The first identifier a registry hands out.
    pub const FIRST: DocumentId = DocumentId(1);

    /// The identifier following this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Access the raw sequence number.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Unique identifier for a trade (the order a shipment belongs to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TradeId(pub Uuid);

impl TradeId {
    /// Generate a new random trade identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a principal (supplier or commissioner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    /// Generate a new random principal identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "shipment:{}", self.0)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "document:{}", self.0)
    }
}

impl std::fmt::Display for TradeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "trade:{}", self.0)
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "principal:{}", self.0)
    }
}
