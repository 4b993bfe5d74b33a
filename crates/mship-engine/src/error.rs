//! # Engine Error Types
//!
//! Structured error hierarchy for the shipment engine. Every variant
//! carries diagnostic context: the operation that failed, the phase at
//! the time of failure, and the identifiers involved.
//!
//! All validation failures are detected before any mutation or
//! collaborator call — an error here means no state changed.
//! Collaborator failures propagate unchanged via the transparent
//! variants.

use thiserror::Error;

use mship_core::{DocumentId, PrincipalId, ShipmentId};
use mship_ledger::{LedgerError, RegistryError};

use crate::phase::Phase;

/// Errors arising from shipment engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The operation is not legal in the shipment's current phase.
    /// Recoverable: retry once the shipment reaches the right phase.
    #[error("{operation} is not legal in phase {phase}")]
    WrongPhase {
        /// The attempted operation.
        operation: String,
        /// The derived phase at the time of the attempt.
        phase: Phase,
    },

    /// A one-shot evaluation gate has already been consumed.
    /// Never retryable for the same target.
    #[error("{target} has already been evaluated")]
    AlreadyEvaluated {
        /// What was evaluated (e.g., "sample", "shipment details").
        target: String,
    },

    /// The document is already approved. Never retryable.
    #[error("{document} is already approved")]
    AlreadyApproved {
        /// The approved document.
        document: DocumentId,
    },

    /// No shipment with this identifier is registered.
    #[error("{shipment} is not registered")]
    ShipmentNotFound {
        /// The missing shipment identifier.
        shipment: ShipmentId,
    },

    /// No document with this identifier exists on the shipment.
    #[error("{document} does not exist on this shipment")]
    DocumentNotFound {
        /// The missing document identifier.
        document: DocumentId,
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

    /// A precondition input is missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Escrow ledger failure, propagated unchanged.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Document registry failure, propagated unchanged.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
