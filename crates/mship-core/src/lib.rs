//! # mship-core — Foundational Types for the Shipment Stack
//!
//! The bedrock crate of the Momentum Shipment Stack. Defines the
//! type-system primitives shared by every other crate: identifier
//! newtypes, checked monetary amounts, party roles, and UTC-only
//! timestamps.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `ShipmentId`,
//!    `DocumentId`, `TradeId`, `PrincipalId` — no bare integers or
//!    strings for identifiers, so a document id cannot be passed where
//!    a shipment id is expected.
//!
//! 2. **Checked monetary arithmetic.** [`Amount`] operates in smallest
//!    currency units and only exposes checked operations. Overflow is
//!    an error, never a wrap.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] enforces UTC with Z suffix
//!    and seconds precision at construction.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mship-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod amount;
pub mod identity;
pub mod party;
pub mod temporal;

pub use amount::{Amount, AmountError};
pub use identity::{DocumentId, PrincipalId, ShipmentId, TradeId};
pub use party::{Role, RoleProof};
pub use temporal::{Timestamp, TimestampError};
