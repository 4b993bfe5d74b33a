//! # Manager Error Types
//!
//! Mirrors the engine's error taxonomy at the manager's coarser grain:
//! status gates instead of phase gates, document kinds instead of
//! per-id entries.

use thiserror::Error;

use mship_core::{PrincipalId, ShipmentId};
use mship_ledger::{LedgerError, RegistryError};

use crate::shipment::DocumentKind;
use crate::status::ManagerStatus;

/// Errors arising from shipment manager operations.
#[derive(Error, Debug)]
pub enum ManagerError {
    /// The operation is not legal in the shipment's current status.
    #[error("{operation} is not legal in status {status}")]
    WrongStatus {
        /// The attempted operation.
        operation: String,
        /// The derived status at the time of the attempt.
        status: ManagerStatus,
    },

    /// The document slot already carries a verdict. A rejected slot is
    /// cleared by re-uploading; an approved slot never is.
    #[error("{kind} on {shipment} has already been evaluated")]
    AlreadyEvaluated {
        /// The shipment carrying the slot.
        shipment: ShipmentId,
        /// The evaluated document kind.
        kind: DocumentKind,
    },

    /// The approved slot cannot be overwritten or re-evaluated.
    #[error("{kind} on {shipment} is already approved")]
    AlreadyApproved {
        /// The shipment carrying the slot.
        shipment: ShipmentId,
        /// The approved document kind.
        kind: DocumentKind,
    },

    /// No shipment with this identifier is under management.
    #[error("{shipment} is not under management")]
    ShipmentNotFound {
        /// The missing shipment identifier.
        shipment: ShipmentId,
    },

    /// The mandatory slot has no uploaded document.
    #[error("{kind} on {shipment} has no uploaded document")]
    DocumentNotFound {
        /// The shipment missing the document.
        shipment: ShipmentId,
        /// The empty slot.
        kind: DocumentKind,
    },

    /// The caller is not the registered principal for the action, or
    /// its role proof failed verification.
    #[error("{principal} is not authorized for {operation}")]
    Unauthorized {
        /// The rejected caller.
        principal: PrincipalId,
        /// The attempted operation.
        operation: String,
    },

    /// Escrow ledger failure, propagated unchanged.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Document registry failure, propagated unchanged.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_status_display() {
        let err = ManagerError::WrongStatus {
            operation: "confirm_shipment".to_string(),
            status: ManagerStatus::Transportation,
        };
        let msg = format!("{err}");
        assert!(msg.contains("confirm_shipment"));
        assert!(msg.contains("TRANSPORTATION"));
    }

    #[test]
    fn slot_errors_name_the_kind() {
        let err = ManagerError::DocumentNotFound {
            shipment: ShipmentId(2),
            kind: DocumentKind::BillOfLading,
        };
        let msg = format!("{err}");
        assert!(msg.contains("bill_of_lading"));
        assert!(msg.contains("shipment:2"));
    }
}
