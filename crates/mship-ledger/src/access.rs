//! # Access Verifier
//!
//! Role-proof verification for privileged mutations. A grant binds
//! `(principal, role)` to the SHA-256 digest of a credential; a proof
//! passes when the digest of its presented credential matches the
//! recorded grant.
//!
//! ## Security Invariant
//!
//! The verifier stores only credential digests, never raw credential
//! bytes. Verification recomputes the digest of the presented
//! credential on every call — there is no session or caching layer
//! that could outlive a revoked grant.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use mship_core::{PrincipalId, Role, RoleProof};

/// The role verification contract consumed before privileged mutations.
pub trait AccessVerifier {
    /// Whether the proof establishes the claimed role for its principal.
    fn has_valid_role(&self, proof: &RoleProof, role: Role) -> bool;
}

/// A verifier backed by a static grant table.
#[derive(Debug, Clone, Default)]
pub struct StaticAccessVerifier {
    grants: BTreeMap<(PrincipalId, Role), [u8; 32]>,
}

impl StaticAccessVerifier {
    /// Create a verifier with no grants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a grant: `(principal, role)` backed by this credential.
    pub fn grant(&mut self, principal: PrincipalId, role: Role, credential: &[u8]) {
        self.grants
            .insert((principal, role), credential_digest(credential));
    }

    /// Remove a grant, if present.
    pub fn revoke(&mut self, principal: PrincipalId, role: Role) {
        self.grants.remove(&(principal, role));
    }
}

impl AccessVerifier for StaticAccessVerifier {
    fn has_valid_role(&self, proof: &RoleProof, role: Role) -> bool {
        self.grants
            .get(&(proof.principal, role))
            .is_some_and(|expected| *expected == credential_digest(&proof.credential))
    }
}

/// A verifier that accepts every proof. Test and bootstrap use only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllVerifier;

impl AccessVerifier for AllowAllVerifier {
    fn has_valid_role(&self, _proof: &RoleProof, _role: Role) -> bool {
        true
    }
}

/// SHA-256 digest of raw credential bytes.
fn credential_digest(credential: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(credential);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granted_credential_verifies() {
        let principal = PrincipalId::new();
        let mut verifier = StaticAccessVerifier::new();
        verifier.grant(principal, Role::Supplier, b"supplier-secret");

        let proof = RoleProof::new(principal, b"supplier-secret".to_vec());
        assert!(verifier.has_valid_role(&proof, Role::Supplier));
    }

    #[test]
    fn wrong_credential_rejected() {
        let principal = PrincipalId::new();
        let mut verifier = StaticAccessVerifier::new();
        verifier.grant(principal, Role::Supplier, b"supplier-secret");

        let proof = RoleProof::new(principal, b"guess".to_vec());
        assert!(!verifier.has_valid_role(&proof, Role::Supplier));
    }

    #[test]
    fn wrong_role_rejected() {
        let principal = PrincipalId::new();
        let mut verifier = StaticAccessVerifier::new();
        verifier.grant(principal, Role::Supplier, b"supplier-secret");

        let proof = RoleProof::new(principal, b"supplier-secret".to_vec());
        assert!(!verifier.has_valid_role(&proof, Role::Commissioner));
    }

    #[test]
    fn other_principal_rejected() {
        let principal = PrincipalId::new();
        let mut verifier = StaticAccessVerifier::new();
        verifier.grant(principal, Role::Commissioner, b"secret");

        let proof = RoleProof::new(PrincipalId::new(), b"secret".to_vec());
        assert!(!verifier.has_valid_role(&proof, Role::Commissioner));
    }

    #[test]
    fn revoked_grant_rejected() {
        let principal = PrincipalId::new();
        let mut verifier = StaticAccessVerifier::new();
        verifier.grant(principal, Role::Supplier, b"secret");
        verifier.revoke(principal, Role::Supplier);

        let proof = RoleProof::new(principal, b"secret".to_vec());
        assert!(!verifier.has_valid_role(&proof, Role::Supplier));
    }

    #[test]
    fn allow_all_accepts_everything() {
        let proof = RoleProof::new(PrincipalId::new(), Vec::new());
        assert!(AllowAllVerifier.has_valid_role(&proof, Role::Supplier));
        assert!(AllowAllVerifier.has_valid_role(&proof, Role::Commissioner));
    }
}
