//! # mship-engine — Shipment Engine Core
//!
//! Coordinates a multi-party physical-goods shipment through a
//! sequence of irreversible verification gates — sample approval,
//! shipment-detail approval, document approval, fund custody, and
//! quality approval — before releasing escrowed payment to the
//! supplier.
//!
//! ## Modules
//!
//! - **Phase** (`phase.rs`): the 7 derived workflow stages,
//!   `SAMPLE(0)` through `DISPUTED(6)`.
//!
//! - **Rules** (`rules.rs`): the static phase rule table — per document
//!   category, its governing phase, required flag, and slot
//!   cardinality.
//!
//! - **Record** (`record.rs`): the mutable per-shipment facts from
//!   which the phase is derived.
//!
//! - **Engine** (`engine.rs`): [`compute_phase`] — the single pure
//!   derivation consumed by every gate — and the phase-gated mutating
//!   operations, including one-shot fund lock/release.
//!
//! - **Book** (`book.rs`): the registration collection handing out
//!   sequential shipment identifiers.
//!
//! ## Design
//!
//! The phase is never stored. Every operation derives it from the
//! accumulated facts (evaluations, fund custody, document approvals)
//! at the moment of the call, so there is no cached stage that can
//! drift from the record. Fund custody is monotonic: `NOT_LOCKED →
//! LOCKED → RELEASED`, with the lock and release escrow calls each
//! issued at most once per shipment.
//!
//! ## Crate Policy
//!
//! - Depends on `mship-core` and `mship-ledger` internally.
//! - Collaborator calls precede record mutation; a failure anywhere
//!   aborts the operation with no partial state.

pub mod book;
pub mod engine;
pub mod error;
pub mod phase;
pub mod record;
pub mod rules;

pub use book::ShipmentBook;
pub use engine::{compute_phase, ShipmentEngine};
pub use error::EngineError;
pub use phase::Phase;
pub use record::{
    DocumentEntry, DocumentStatus, EvaluationStatus, FundsStatus, ShipmentDetails, ShipmentRecord,
    Verdict,
};
pub use rules::{
    funds_gate_documents, required_documents, uploadable_documents, Cardinality, CategoryRule,
    DocumentCategory,
};
