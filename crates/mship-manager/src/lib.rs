//! # mship-manager — Simplified Multi-Shipment Workflow
//!
//! The coarse sibling of the shipment engine: an ordered collection of
//! lightweight shipments per order, sharing one order-level escrow and
//! one document registry. Each shipment's status is derived from
//! escrow deposit sufficiency and per-kind document approvals — plus
//! two explicit terminal flags the commissioner sets — and is never
//! stored.
//!
//! ## Modules
//!
//! - **Status** (`status.rs`): the 5 derived stages, `SHIPPING(0)`
//!   through `CONFIRMED(4)`.
//!
//! - **Shipment** (`shipment.rs`): the lightweight per-shipment record
//!   and its four mandatory single-slot document kinds.
//!
//! - **Manager** (`manager.rs`): [`compute_status`] and the
//!   status-gated operations, including the terminal confirm and
//!   arbitration actions.
//!
//! ## Crate Policy
//!
//! - Depends on `mship-core` and `mship-ledger` internally.
//! - Existence is validated before permission: an unknown shipment or
//!   empty slot surfaces `NotFound` before any role check.

pub mod error;
pub mod manager;
pub mod shipment;
pub mod status;

pub use error::ManagerError;
pub use manager::{compute_status, ShipmentManager};
pub use shipment::{DocumentKind, DocumentSlot, ManagedShipment, SlotStatus};
pub use status::ManagerStatus;
