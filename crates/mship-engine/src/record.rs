//! # Shipment Record
//!
//! The mutable per-shipment state: the two fixed principals, the
//! agreed amount, evaluation statuses, fund custody status, the
//! optional detail block, and the per-category document slots.
//!
//! The record stores **facts**, never the phase — the phase is derived
//! from these facts by [`compute_phase`](crate::engine::compute_phase)
//! on every read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mship_core::{Amount, DocumentId, PrincipalId, Timestamp};

use crate::phase::Phase;
use crate::rules::{required_documents, DocumentCategory};

/// Outcome of a one-shot evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationStatus {
    /// The window is still open.
    NotEvaluated,
    /// Approved; the gate is passed.
    Approved,
    /// Rejected; the gate is permanently closed.
    Rejected,
}

impl EvaluationStatus {
    /// Whether the one-shot window has been consumed.
    pub fn is_evaluated(&self) -> bool {
        !matches!(self, Self::NotEvaluated)
    }
}

/// The verdict a commissioner hands down in an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Accept the evaluated subject.
    Approved,
    /// Reject the evaluated subject.
    Rejected,
}

impl From<Verdict> for EvaluationStatus {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Approved => Self::Approved,
            Verdict::Rejected => Self::Rejected,
        }
    }
}

/// Custody status of the escrowed payment. Monotonic, forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundsStatus {
    /// Deposits may still be insufficient; nothing locked.
    NotLocked,
    /// The agreed amount is locked in escrow.
    Locked,
    /// The payment has been released to the supplier.
    Released,
}

/// Approval status of a single document entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    /// Uploaded, awaiting the commissioner's approval.
    Pending,
    /// Approved; irreversible.
    Approved,
}

/// One uploaded document in a category slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Identifier assigned by the document registry.
    pub id: DocumentId,
    /// The category slot this entry occupies.
    pub category: DocumentCategory,
    /// The principal that uploaded it.
    pub uploader: PrincipalId,
    /// Approval status.
    pub status: DocumentStatus,
}

/// The detail block fixed once during the `DETAILS` phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentDetails {
    /// Sequential shipment number within the trade.
    pub shipment_number: u32,
    /// Validity horizon of these terms.
    pub expiration_date: Timestamp,
    /// Price fixing date.
    pub fixing_date: Timestamp,
    /// Exchange against which the price is fixed.
    pub target_exchange: String,
    /// Differential over the exchange price, smallest units, signed.
    pub differential: i64,
    /// Agreed unit price.
    pub price: Amount,
    /// Quantity in trade units.
    pub quantity: u32,
    /// Number of containers.
    pub containers: u32,
    /// Net weight in kilograms.
    pub net_weight: u64,
    /// Gross weight in kilograms.
    pub gross_weight: u64,
}

/// The mutable state of one shipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// The principal shipping the goods.
    pub supplier: PrincipalId,
    /// The principal funding and approving the shipment.
    pub commissioner: PrincipalId,
    /// The escrow deposit that must accumulate before funds lock.
    pub agreed_amount: Amount,
    /// Detail block; `None` until `set_details` lands.
    pub details: Option<ShipmentDetails>,
    /// One-shot sample evaluation.
    pub sample_evaluation: EvaluationStatus,
    /// One-shot details evaluation.
    pub details_evaluation: EvaluationStatus,
    /// One-shot quality evaluation.
    pub quality_evaluation: EvaluationStatus,
    /// Fund custody status. Monotonic.
    pub funds_status: FundsStatus,
    /// Document slots keyed by category.
    pub documents: BTreeMap<DocumentCategory, Vec<DocumentEntry>>,
    /// When the shipment was registered.
    pub registered_at: Timestamp,
}

impl ShipmentRecord {
    /// Create a fresh record with every gate open.
    pub fn new(supplier: PrincipalId, commissioner: PrincipalId, agreed_amount: Amount) -> Self {
        Self {
            supplier,
            commissioner,
            agreed_amount,
            details: None,
            sample_evaluation: EvaluationStatus::NotEvaluated,
            details_evaluation: EvaluationStatus::NotEvaluated,
            quality_evaluation: EvaluationStatus::NotEvaluated,
            funds_status: FundsStatus::NotLocked,
            documents: BTreeMap::new(),
            registered_at: Timestamp::now(),
        }
    }

    /// Whether the detail block has been set.
    pub fn details_set(&self) -> bool {
        self.details.is_some()
    }

    /// The entries in a category slot, oldest first.
    pub fn documents_in(&self, category: DocumentCategory) -> &[DocumentEntry] {
        self.documents
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Find a document entry by id across all categories.
    pub fn find_document(&self, id: DocumentId) -> Option<&DocumentEntry> {
        self.documents
            .values()
            .flatten()
            .find(|entry| entry.id == id)
    }

    /// Find a document entry mutably by id across all categories.
    pub fn find_document_mut(&mut self, id: DocumentId) -> Option<&mut DocumentEntry> {
        self.documents
            .values_mut()
            .flatten()
            .find(|entry| entry.id == id)
    }

    /// Whether a category's slot is filled and fully approved.
    ///
    /// An empty slot is not approved. `assume_approved` counts one
    /// pending entry as approved — used to test whether an in-flight
    /// approval closes a gate before committing it.
    pub fn category_approved(
        &self,
        category: DocumentCategory,
        assume_approved: Option<DocumentId>,
    ) -> bool {
        let entries = self.documents_in(category);
        !entries.is_empty()
            && entries.iter().all(|entry| {
                entry.status == DocumentStatus::Approved || Some(entry.id) == assume_approved
            })
    }

    /// Whether every required category of `phase` is approved.
    pub fn required_approved(&self, phase: Phase) -> bool {
        required_documents(phase)
            .into_iter()
            .all(|category| self.category_approved(category, None))
    }
}
