//! # Managed Shipment
//!
//! The lightweight per-shipment record tracked by the manager: a few
//! logistics facts, one single-slot entry per mandatory document kind,
//! and the two terminal flags set by the commissioner.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mship_core::{DocumentId, ShipmentId, Timestamp};

/// The four document kinds every managed shipment must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Carrier's bill of lading.
    BillOfLading,
    /// Certificate of origin for customs clearance.
    CertificateOfOrigin,
    /// Certified net/gross weight record.
    WeightCertificate,
    /// Cargo insurance certificate.
    InsuranceCertificate,
}

impl DocumentKind {
    /// Every mandatory kind, in table order.
    pub const ALL: [DocumentKind; 4] = [
        Self::BillOfLading,
        Self::CertificateOfOrigin,
        Self::WeightCertificate,
        Self::InsuranceCertificate,
    ];

    /// The canonical snake_case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BillOfLading => "bill_of_lading",
            Self::CertificateOfOrigin => "certificate_of_origin",
            Self::WeightCertificate => "weight_certificate",
            Self::InsuranceCertificate => "insurance_certificate",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict state of a managed document slot.
///
/// Unlike the engine's two-state document status, the manager records
/// rejections: a rejected slot stays visible until the supplier
/// re-uploads, which resets it to `PENDING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    /// Uploaded, awaiting the commissioner's verdict.
    Pending,
    /// Approved; irreversible.
    Approved,
    /// Rejected; cleared by a re-upload.
    Rejected,
}

/// One occupied document slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DocumentSlot {
    /// Identifier assigned by the document registry.
    pub id: DocumentId,
    /// Verdict state.
    pub status: SlotStatus,
}

/// One shipment under management.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedShipment {
    /// Identifier within the manager's collection.
    pub id: ShipmentId,
    /// Departure date.
    pub date: Timestamp,
    /// Quantity in trade units.
    pub quantity: u32,
    /// Net weight in kilograms.
    pub weight: u64,
    /// One slot per mandatory document kind; absent until uploaded.
    pub documents: BTreeMap<DocumentKind, DocumentSlot>,
    /// Set once by `start_arbitration`. Terminal.
    pub arbitration_started: bool,
    /// Set once by `confirm_shipment`. Terminal.
    pub confirmed: bool,
}

impl ManagedShipment {
    /// Create a shipment with every slot empty and both flags clear.
    pub fn new(id: ShipmentId, date: Timestamp, quantity: u32, weight: u64) -> Self {
        Self {
            id,
            date,
            quantity,
            weight,
            documents: BTreeMap::new(),
            arbitration_started: false,
            confirmed: false,
        }
    }

    /// Whether every mandatory slot is filled and approved.
    pub fn fully_documented(&self) -> bool {
        DocumentKind::ALL.into_iter().all(|kind| {
            self.documents
                .get(&kind)
                .is_some_and(|slot| slot.status == SlotStatus::Approved)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipment() -> ManagedShipment {
        ManagedShipment::new(ShipmentId(1), Timestamp::now(), 320, 38_400)
    }

    fn fill(shipment: &mut ManagedShipment, status: SlotStatus) {
        for (n, kind) in DocumentKind::ALL.into_iter().enumerate() {
            shipment.documents.insert(
                kind,
                DocumentSlot {
                    id: DocumentId(n as u64 + 1),
                    status,
                },
            );
        }
    }

    #[test]
    fn fresh_shipment_is_undocumented() {
        let shipment = shipment();
        assert!(shipment.documents.is_empty());
        assert!(!shipment.fully_documented());
        assert!(!shipment.arbitration_started);
        assert!(!shipment.confirmed);
    }

    #[test]
    fn pending_slots_do_not_count() {
        let mut shipment = shipment();
        fill(&mut shipment, SlotStatus::Pending);
        assert!(!shipment.fully_documented());
    }

    #[test]
    fn all_approved_slots_fully_document() {
        let mut shipment = shipment();
        fill(&mut shipment, SlotStatus::Approved);
        assert!(shipment.fully_documented());
    }

    #[test]
    fn one_rejected_slot_blocks() {
        let mut shipment = shipment();
        fill(&mut shipment, SlotStatus::Approved);
        if let Some(slot) = shipment.documents.get_mut(&DocumentKind::WeightCertificate) {
            slot.status = SlotStatus::Rejected;
        }
        assert!(!shipment.fully_documented());
    }

    #[test]
    fn kind_labels_are_snake_case() {
        for kind in DocumentKind::ALL {
            assert!(kind
                .as_str()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
