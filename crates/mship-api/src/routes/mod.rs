//! # Route Modules
//!
//! One module per workflow: the engine-backed shipment endpoints and
//! the manager-backed order endpoints.

pub mod orders;
pub mod shipments;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mship_core::{PrincipalId, RoleProof};

/// The role credential presented with every privileged mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofBody {
    /// The principal claiming the role.
    pub principal: Uuid,
    /// Opaque credential string backing the claim.
    pub credential: String,
}

impl ProofBody {
    /// Build the domain-level role proof.
    pub fn proof(&self) -> RoleProof {
        RoleProof::new(
            PrincipalId::from_uuid(self.principal),
            self.credential.clone().into_bytes(),
        )
    }
}
