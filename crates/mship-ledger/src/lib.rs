//! # mship-ledger — Collaborator Contracts
//!
//! The three external collaborators the shipment engine consumes:
//!
//! - **Escrow Ledger** (`escrow.rs`): fund custody — deposits, the
//!   one-shot lock/release pair, and the custody state machine.
//!
//! - **Document Registry** (`documents.rs`): opaque storage and
//!   retrieval of per-trade documents.
//!
//! - **Access Verifier** (`access.rs`): role-proof verification backed
//!   by SHA-256 credential digests.
//!
//! Each collaborator is a trait; the engine is generic over them and
//! never reimplements their accounting. The in-memory implementations
//! here are the reference used by the service layer and the test
//! suites.
//!
//! ## Crate Policy
//!
//! - Depends only on `mship-core` internally.
//! - Collaborator failures are structured errors; callers abort their
//!   whole operation on any failure, committing no partial state.

pub mod access;
pub mod documents;
pub mod escrow;

pub use access::{AccessVerifier, AllowAllVerifier, StaticAccessVerifier};
pub use documents::{DocumentMeta, DocumentRegistry, InMemoryDocumentRegistry, RegistryError};
pub use escrow::{EscrowDeposit, EscrowLedger, EscrowState, InMemoryEscrow, LedgerError};
