//! # Party Roles and Proofs
//!
//! A shipment has exactly two fixed principals: the **supplier** (ships
//! the goods, uploads paperwork) and the **commissioner** (funds the
//! escrow, evaluates and approves). Every privileged mutation presents
//! a [`RoleProof`] that the access verifier checks against the claimed
//! [`Role`].

use serde::{Deserialize, Serialize};

use crate::identity::PrincipalId;

/// The role a principal plays in a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Ships the goods; uploads and updates documents, sets details.
    Supplier,
    /// Funds the escrow; evaluates sample, details, documents, quality.
    Commissioner,
}

impl Role {
    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supplier => "SUPPLIER",
            Self::Commissioner => "COMMISSIONER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A credential presented with a privileged mutation.
///
/// The access verifier recomputes the digest of `credential` and
/// compares it against the grant recorded for `(principal, role)`.
/// The raw credential bytes never persist beyond verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleProof {
    /// The principal claiming the role.
    pub principal: PrincipalId,
    /// Opaque credential bytes backing the claim.
    pub credential: Vec<u8>,
}

impl RoleProof {
    /// Build a proof for a principal from raw credential bytes.
    pub fn new(principal: PrincipalId, credential: impl Into<Vec<u8>>) -> Self {
        Self {
            principal,
            credential: credential.into(),
        }
    }
}
