//! # Shipment Engine
//!
//! Computes the current phase from the shipment record and gates every
//! mutating operation by the phase it computes. The phase is derived
//! on every call — never cached, never stored.
//!
//! ## Operation Shape
//!
//! Every mutating call runs: derive phase → validate (existence, then
//! authorization, then phase gate, then one-shot gates) → collaborator
//! calls → record mutation. A failure anywhere aborts the whole
//! operation with no partial state: the record is only mutated after
//! every collaborator call for that operation has succeeded.
//!
//! ## Fund Custody
//!
//! `deposit_funds` locks the escrow the moment the deposited total
//! reaches the agreed amount. The first operation that — counting its
//! own pending mutation — finds every funds-gate document approved
//! while funds are locked triggers exactly one `release_funds` call.
//! The `funds_status` check guards the escrow call; it is never issued
//! twice.

use tracing::{debug, info};

use mship_core::{Amount, DocumentId, PrincipalId, Role, RoleProof, TradeId};
use mship_ledger::{AccessVerifier, DocumentMeta, DocumentRegistry, EscrowLedger};

use crate::error::EngineError;
use crate::phase::Phase;
use crate::record::{
    DocumentEntry, DocumentStatus, EvaluationStatus, FundsStatus, ShipmentDetails, ShipmentRecord,
    Verdict,
};
use crate::rules::{funds_gate_documents, Cardinality, DocumentCategory};

/// Derive the current phase of a shipment from its record.
///
/// The single source of truth for phase computation, consumed by every
/// gate check. Pure: same record, same phase.
pub fn compute_phase(record: &ShipmentRecord) -> Phase {
    match record.quality_evaluation {
        EvaluationStatus::Rejected => return Phase::Disputed,
        EvaluationStatus::Approved => return Phase::Confirmed,
        EvaluationStatus::NotEvaluated => {}
    }
    match record.funds_status {
        FundsStatus::Released => Phase::Quality,
        FundsStatus::Locked => Phase::AwaitingDocs,
        FundsStatus::NotLocked => {
            if record.sample_evaluation != EvaluationStatus::Approved
                || !record.required_approved(Phase::Sample)
            {
                Phase::Sample
            } else if !record.details_set()
                || record.details_evaluation != EvaluationStatus::Approved
                || !record.required_approved(Phase::Details)
            {
                Phase::Details
            } else {
                Phase::Funding
            }
        }
    }
}

/// One shipment's engine: the record plus its injected collaborators.
///
/// The collaborators are fixed at construction and owned by the
/// engine — no ambient global state.
#[derive(Debug)]
pub struct ShipmentEngine<E, R, A> {
    trade: TradeId,
    record: ShipmentRecord,
    escrow: E,
    registry: R,
    access: A,
}

impl<E, R, A> ShipmentEngine<E, R, A>
where
    E: EscrowLedger,
    R: DocumentRegistry,
    A: AccessVerifier,
{
    /// Register a new shipment with its two fixed principals.
    pub fn new(
        trade: TradeId,
        supplier: PrincipalId,
        commissioner: PrincipalId,
        agreed_amount: Amount,
        escrow: E,
        registry: R,
        access: A,
    ) -> Self {
        Self {
            trade,
            record: ShipmentRecord::new(supplier, commissioner, agreed_amount),
            escrow,
            registry,
            access,
        }
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// The trade this shipment belongs to.
    pub fn trade(&self) -> TradeId {
        self.trade
    }

    /// The current derived phase.
    pub fn phase(&self) -> Phase {
        compute_phase(&self.record)
    }

    /// The shipment record.
    pub fn record(&self) -> &ShipmentRecord {
        &self.record
    }

    /// The escrow ledger view.
    pub fn escrow(&self) -> &E {
        &self.escrow
    }

    /// The identifiers of every document in a category slot.
    pub fn document_ids(&self, category: DocumentCategory) -> Vec<DocumentId> {
        self.record
            .documents_in(category)
            .iter()
            .map(|entry| entry.id)
            .collect()
    }

    /// Registry metadata for a document on this shipment.
    ///
    /// # Errors
    ///
    /// `DocumentNotFound` if the shipment carries no such entry.
    pub fn document_info(&self, id: DocumentId) -> Result<DocumentMeta, EngineError> {
        if self.record.find_document(id).is_none() {
            return Err(EngineError::DocumentNotFound { document: id });
        }
        Ok(self.registry.info(self.trade, id)?)
    }

    // ── Documents ──────────────────────────────────────────────────────

    /// Upload a document into a category slot.
    ///
    /// Supplier only. The category must be uploadable in the current
    /// phase. Single-slot categories overwrite; generic categories
    /// append.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `WrongPhase`, or a registry failure.
    pub fn add_document(
        &mut self,
        proof: &RoleProof,
        category: DocumentCategory,
        name: &str,
        url: &str,
    ) -> Result<DocumentId, EngineError> {
        self.authorize(proof, Role::Supplier, "add_document")?;
        let phase = self.phase();
        if !category.uploadable_in(phase) {
            return Err(EngineError::WrongPhase {
                operation: format!("add_document({category})"),
                phase,
            });
        }

        let id = self
            .registry
            .register(proof.principal, self.trade, name, category.as_str(), url)?;

        let entry = DocumentEntry {
            id,
            category,
            uploader: proof.principal,
            status: DocumentStatus::Pending,
        };
        let slot = self.record.documents.entry(category).or_default();
        match category.rule().cardinality {
            Cardinality::Single => {
                slot.clear();
                slot.push(entry);
            }
            Cardinality::Generic => slot.push(entry),
        }
        debug!(trade = %self.trade, %id, %category, "document added");
        Ok(id)
    }

    /// Replace the name and url of an uploaded, not-yet-approved
    /// document.
    ///
    /// # Errors
    ///
    /// `DocumentNotFound`, `Unauthorized`, `AlreadyApproved`,
    /// `WrongPhase`, or a registry failure.
    pub fn update_document(
        &mut self,
        proof: &RoleProof,
        id: DocumentId,
        name: &str,
        url: &str,
    ) -> Result<(), EngineError> {
        let Some(entry) = self.record.find_document(id) else {
            return Err(EngineError::DocumentNotFound { document: id });
        };
        let category = entry.category;
        let status = entry.status;

        self.authorize(proof, Role::Supplier, "update_document")?;
        if status == DocumentStatus::Approved {
            return Err(EngineError::AlreadyApproved { document: id });
        }
        let phase = self.phase();
        if !category.uploadable_in(phase) {
            return Err(EngineError::WrongPhase {
                operation: format!("update_document({category})"),
                phase,
            });
        }

        self.registry.update(proof.principal, self.trade, id, name, url)?;
        debug!(trade = %self.trade, %id, "document updated");
        Ok(())
    }

    /// Approve a document. Commissioner only; one-shot per document.
    ///
    /// Legal in any non-terminal phase. If this approval closes the
    /// funds gate while funds are locked, the escrowed payment is
    /// released as part of the same operation.
    ///
    /// # Errors
    ///
    /// `DocumentNotFound`, `Unauthorized`, `WrongPhase` (terminal
    /// dispute), `AlreadyApproved`, or an escrow failure.
    pub fn evaluate_document(
        &mut self,
        proof: &RoleProof,
        id: DocumentId,
    ) -> Result<(), EngineError> {
        let Some(entry) = self.record.find_document(id) else {
            return Err(EngineError::DocumentNotFound { document: id });
        };
        let status = entry.status;

        self.authorize(proof, Role::Commissioner, "evaluate_document")?;
        let phase = self.phase();
        if phase == Phase::Disputed {
            return Err(EngineError::WrongPhase {
                operation: "evaluate_document".to_string(),
                phase,
            });
        }
        if status == DocumentStatus::Approved {
            return Err(EngineError::AlreadyApproved { document: id });
        }

        // Escrow first: if this approval closes the funds gate, the
        // release call must succeed before any record mutation.
        self.release_if_gate_closes(Some(id))?;

        if let Some(entry) = self.record.find_document_mut(id) {
            entry.status = DocumentStatus::Approved;
        }
        debug!(trade = %self.trade, %id, "document approved");
        Ok(())
    }

    // ── Evaluations and details ────────────────────────────────────────

    /// Evaluate the pre-shipment sample. Commissioner only; `SAMPLE`
    /// phase only; one-shot.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `WrongPhase`, or `AlreadyEvaluated`.
    pub fn evaluate_sample(
        &mut self,
        proof: &RoleProof,
        verdict: Verdict,
    ) -> Result<(), EngineError> {
        self.authorize(proof, Role::Commissioner, "evaluate_sample")?;
        let phase = self.phase();
        if phase != Phase::Sample {
            return Err(EngineError::WrongPhase {
                operation: "evaluate_sample".to_string(),
                phase,
            });
        }
        if self.record.sample_evaluation.is_evaluated() {
            return Err(EngineError::AlreadyEvaluated {
                target: "sample".to_string(),
            });
        }
        self.record.sample_evaluation = verdict.into();
        info!(trade = %self.trade, ?verdict, "sample evaluated");
        Ok(())
    }

    /// Fix the shipment detail block. Supplier only; `DETAILS` phase
    /// only; exactly once.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `WrongPhase`, or `AlreadyEvaluated` if the
    /// details are already set.
    pub fn set_details(
        &mut self,
        proof: &RoleProof,
        details: ShipmentDetails,
    ) -> Result<(), EngineError> {
        self.authorize(proof, Role::Supplier, "set_details")?;
        let phase = self.phase();
        if phase != Phase::Details {
            return Err(EngineError::WrongPhase {
                operation: "set_details".to_string(),
                phase,
            });
        }
        if self.record.details_set() {
            return Err(EngineError::AlreadyEvaluated {
                target: "shipment details".to_string(),
            });
        }
        self.record.details = Some(details);
        debug!(trade = %self.trade, "shipment details set");
        Ok(())
    }

    /// Evaluate the shipment details. Commissioner only; `DETAILS`
    /// phase only; requires the details to be set; one-shot.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `WrongPhase`, `InvalidArgument` if no details
    /// are set, or `AlreadyEvaluated`.
    pub fn evaluate_details(
        &mut self,
        proof: &RoleProof,
        verdict: Verdict,
    ) -> Result<(), EngineError> {
        self.authorize(proof, Role::Commissioner, "evaluate_details")?;
        let phase = self.phase();
        if phase != Phase::Details {
            return Err(EngineError::WrongPhase {
                operation: "evaluate_details".to_string(),
                phase,
            });
        }
        if !self.record.details_set() {
            return Err(EngineError::InvalidArgument(
                "shipment details have not been set".to_string(),
            ));
        }
        if self.record.details_evaluation.is_evaluated() {
            return Err(EngineError::AlreadyEvaluated {
                target: "shipment details".to_string(),
            });
        }
        self.record.details_evaluation = verdict.into();
        info!(trade = %self.trade, ?verdict, "details evaluated");
        Ok(())
    }

    // ── Funds ──────────────────────────────────────────────────────────

    /// Deposit into the escrow. Commissioner only; `FUNDING` phase
    /// only.
    ///
    /// Locks the escrow the moment the deposited total reaches the
    /// agreed amount; otherwise the shipment stays in `FUNDING`.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `WrongPhase`, or an escrow failure (in which
    /// case no state changed).
    pub fn deposit_funds(&mut self, proof: &RoleProof, amount: Amount) -> Result<(), EngineError> {
        self.authorize(proof, Role::Commissioner, "deposit_funds")?;
        let phase = self.phase();
        if phase != Phase::Funding {
            return Err(EngineError::WrongPhase {
                operation: "deposit_funds".to_string(),
                phase,
            });
        }

        self.escrow.deposit(amount)?;
        let total = self.escrow.total_deposited();
        if total >= self.record.agreed_amount {
            self.escrow.lock_funds()?;
            self.record.funds_status = FundsStatus::Locked;
            info!(trade = %self.trade, %total, "escrow funds locked");
        } else {
            debug!(trade = %self.trade, %total, "deposit below agreed amount");
        }
        self.release_if_gate_closes(None)?;
        Ok(())
    }

    /// Evaluate the delivered quality. Commissioner only; `QUALITY`
    /// phase only; one-shot (enforced by the phase itself — approval
    /// moves to `CONFIRMED`, rejection to `DISPUTED`).
    ///
    /// # Errors
    ///
    /// `Unauthorized` or `WrongPhase`.
    pub fn evaluate_quality(
        &mut self,
        proof: &RoleProof,
        verdict: Verdict,
    ) -> Result<(), EngineError> {
        self.authorize(proof, Role::Commissioner, "evaluate_quality")?;
        let phase = self.phase();
        if phase != Phase::Quality {
            return Err(EngineError::WrongPhase {
                operation: "evaluate_quality".to_string(),
                phase,
            });
        }
        self.record.quality_evaluation = verdict.into();
        info!(trade = %self.trade, ?verdict, "quality evaluated");
        Ok(())
    }

    // ── Internal ───────────────────────────────────────────────────────

    /// Release the escrowed payment if the funds gate is closed.
    ///
    /// `assume_approved` counts one in-flight approval as committed so
    /// the escrow call can precede the record mutation. The
    /// `funds_status` guard ensures `release_funds` is issued at most
    /// once per shipment.
    fn release_if_gate_closes(
        &mut self,
        assume_approved: Option<DocumentId>,
    ) -> Result<(), EngineError> {
        if self.record.funds_status != FundsStatus::Locked {
            return Ok(());
        }
        let gate_closed = funds_gate_documents()
            .into_iter()
            .all(|category| self.record.category_approved(category, assume_approved));
        if !gate_closed {
            return Ok(());
        }
        self.escrow.release_funds()?;
        self.record.funds_status = FundsStatus::Released;
        info!(trade = %self.trade, "escrow funds released");
        Ok(())
    }

    /// Check the caller against the registered principal for `role`
    /// and verify its role proof.
    fn authorize(
        &self,
        proof: &RoleProof,
        role: Role,
        operation: &str,
    ) -> Result<(), EngineError> {
        let expected = match role {
            Role::Supplier => self.record.supplier,
            Role::Commissioner => self.record.commissioner,
        };
        if proof.principal != expected || !self.access.has_valid_role(proof, role) {
            return Err(EngineError::Unauthorized {
                principal: proof.principal,
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ShipmentRecord {
        ShipmentRecord::new(
            PrincipalId::new(),
            PrincipalId::new(),
            Amount::from_units(10),
        )
    }

    fn approve_required(record: &mut ShipmentRecord, phase: Phase, next_id: &mut u64) {
        for category in crate::rules::required_documents(phase) {
            *next_id += 1;
            record.documents.insert(
                category,
                vec![DocumentEntry {
                    id: DocumentId(*next_id),
                    category,
                    uploader: record.supplier,
                    status: DocumentStatus::Approved,
                }],
            );
        }
    }

    #[test]
    fn fresh_record_is_in_sample() {
        assert_eq!(compute_phase(&record()), Phase::Sample);
    }

    #[test]
    fn sample_approval_alone_does_not_advance() {
        let mut r = record();
        r.sample_evaluation = EvaluationStatus::Approved;
        // Required sample document still missing.
        assert_eq!(compute_phase(&r), Phase::Sample);
    }

    #[test]
    fn sample_gate_closure_advances_to_details() {
        let mut r = record();
        let mut id = 0;
        r.sample_evaluation = EvaluationStatus::Approved;
        approve_required(&mut r, Phase::Sample, &mut id);
        assert_eq!(compute_phase(&r), Phase::Details);
    }

    #[test]
    fn rejected_sample_stays_in_sample() {
        let mut r = record();
        let mut id = 0;
        approve_required(&mut r, Phase::Sample, &mut id);
        r.sample_evaluation = EvaluationStatus::Rejected;
        assert_eq!(compute_phase(&r), Phase::Sample);
    }

    #[test]
    fn details_gate_closure_advances_to_funding() {
        let mut r = record();
        let mut id = 0;
        r.sample_evaluation = EvaluationStatus::Approved;
        approve_required(&mut r, Phase::Sample, &mut id);
        r.details = Some(test_details());
        r.details_evaluation = EvaluationStatus::Approved;
        approve_required(&mut r, Phase::Details, &mut id);
        assert_eq!(compute_phase(&r), Phase::Funding);
    }

    #[test]
    fn locked_funds_mean_awaiting_docs() {
        let mut r = record();
        r.funds_status = FundsStatus::Locked;
        assert_eq!(compute_phase(&r), Phase::AwaitingDocs);
    }

    #[test]
    fn released_funds_mean_quality() {
        let mut r = record();
        r.funds_status = FundsStatus::Released;
        assert_eq!(compute_phase(&r), Phase::Quality);
    }

    #[test]
    fn quality_outcomes_are_terminal() {
        let mut r = record();
        r.funds_status = FundsStatus::Released;
        r.quality_evaluation = EvaluationStatus::Approved;
        assert_eq!(compute_phase(&r), Phase::Confirmed);
        r.quality_evaluation = EvaluationStatus::Rejected;
        assert_eq!(compute_phase(&r), Phase::Disputed);
    }

    fn test_details() -> ShipmentDetails {
        ShipmentDetails {
            shipment_number: 1,
            expiration_date: mship_core::Timestamp::now(),
            fixing_date: mship_core::Timestamp::now(),
            target_exchange: "LME".to_string(),
            differential: -250,
            price: Amount::from_units(10),
            quantity: 100,
            containers: 4,
            net_weight: 96_000,
            gross_weight: 99_500,
        }
    }
}
