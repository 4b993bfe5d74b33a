//! End-to-end shipment lifecycle: a shipment walks the verification
//! gates from registration to confirmation, with the rejection and
//! misuse paths checked at each gate.

use mship_core::{Amount, DocumentId, PrincipalId, Role, RoleProof, Timestamp, TradeId};
use mship_ledger::{
    EscrowLedger, EscrowState, InMemoryDocumentRegistry, InMemoryEscrow, StaticAccessVerifier,
};
use mship_engine::{
    DocumentCategory, DocumentStatus, EngineError, FundsStatus, Phase, ShipmentDetails,
    ShipmentEngine, Verdict,
};

type TestEngine = ShipmentEngine<InMemoryEscrow, InMemoryDocumentRegistry, StaticAccessVerifier>;

struct Harness {
    engine: TestEngine,
    supplier: RoleProof,
    commissioner: RoleProof,
}

fn harness(agreed: u64) -> Harness {
    let supplier = PrincipalId::new();
    let commissioner = PrincipalId::new();
    let mut access = StaticAccessVerifier::new();
    access.grant(supplier, Role::Supplier, b"supplier-credential");
    access.grant(commissioner, Role::Commissioner, b"commissioner-credential");

    let engine = ShipmentEngine::new(
        TradeId::new(),
        supplier,
        commissioner,
        Amount::from_units(agreed),
        InMemoryEscrow::new(),
        InMemoryDocumentRegistry::new(),
        access,
    );
    Harness {
        engine,
        supplier: RoleProof::new(supplier, b"supplier-credential".to_vec()),
        commissioner: RoleProof::new(commissioner, b"commissioner-credential".to_vec()),
    }
}

fn details() -> ShipmentDetails {
    ShipmentDetails {
        shipment_number: 1,
        expiration_date: Timestamp::parse("2027-01-01T00:00:00Z").unwrap(),
        fixing_date: Timestamp::parse("2026-11-15T00:00:00Z").unwrap(),
        target_exchange: "ICE".to_string(),
        differential: 1_200,
        price: Amount::from_units(10),
        quantity: 320,
        containers: 2,
        net_weight: 38_400,
        gross_weight: 40_100,
    }
}

impl Harness {
    fn upload_and_approve(&mut self, category: DocumentCategory) -> DocumentId {
        let id = self
            .engine
            .add_document(&self.supplier, category, category.as_str(), "ipfs://doc")
            .unwrap();
        self.engine.evaluate_document(&self.commissioner, id).unwrap();
        id
    }

    /// Drive the shipment from registration to the DETAILS phase.
    fn pass_sample_gate(&mut self) {
        self.upload_and_approve(DocumentCategory::SampleAnalysis);
        self.engine
            .evaluate_sample(&self.commissioner, Verdict::Approved)
            .unwrap();
    }

    /// Drive the shipment from DETAILS to the FUNDING phase.
    fn pass_details_gate(&mut self) {
        self.engine.set_details(&self.supplier, details()).unwrap();
        self.upload_and_approve(DocumentCategory::ProformaInvoice);
        self.engine
            .evaluate_details(&self.commissioner, Verdict::Approved)
            .unwrap();
    }

    /// Drive the shipment from FUNDING to AWAITING_DOCS (funds locked).
    fn pass_funding_gate(&mut self, agreed: u64) {
        self.upload_and_approve(DocumentCategory::InsuranceCertificate);
        self.engine
            .deposit_funds(&self.commissioner, Amount::from_units(agreed))
            .unwrap();
    }

    /// Drive the shipment from AWAITING_DOCS to QUALITY (funds released).
    fn pass_document_gate(&mut self) {
        self.upload_and_approve(DocumentCategory::BillOfLading);
        self.upload_and_approve(DocumentCategory::CertificateOfOrigin);
        self.upload_and_approve(DocumentCategory::WeightCertificate);
    }
}

// ── Scenario A: sample gate ───────────────────────────────────────────

#[test]
fn registration_starts_in_sample_and_sample_gate_advances() {
    let mut h = harness(10);
    assert_eq!(h.engine.phase(), Phase::Sample);
    assert_eq!(h.engine.phase().ordinal(), 0);

    h.pass_sample_gate();
    assert_eq!(h.engine.phase(), Phase::Details);
    assert_eq!(h.engine.phase().ordinal(), 1);
}

#[test]
fn sample_approval_without_document_stays_in_sample() {
    let mut h = harness(10);
    h.engine
        .evaluate_sample(&h.commissioner.clone(), Verdict::Approved)
        .unwrap();
    assert_eq!(h.engine.phase(), Phase::Sample);
}

// ── Scenario B: one-shot details evaluation ───────────────────────────

#[test]
fn rejected_details_evaluation_is_not_repeatable() {
    let mut h = harness(10);
    h.pass_sample_gate();

    h.engine.set_details(&h.supplier.clone(), details()).unwrap();
    h.engine
        .evaluate_details(&h.commissioner.clone(), Verdict::Rejected)
        .unwrap();

    // Still DETAILS, but the window is consumed.
    assert_eq!(h.engine.phase(), Phase::Details);
    let second = h
        .engine
        .evaluate_details(&h.commissioner.clone(), Verdict::Approved);
    assert!(matches!(second, Err(EngineError::AlreadyEvaluated { .. })));
}

#[test]
fn details_evaluation_requires_details_set() {
    let mut h = harness(10);
    h.pass_sample_gate();
    let result = h
        .engine
        .evaluate_details(&h.commissioner.clone(), Verdict::Approved);
    assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
}

#[test]
fn details_cannot_be_set_twice() {
    let mut h = harness(10);
    h.pass_sample_gate();
    h.engine.set_details(&h.supplier.clone(), details()).unwrap();
    let second = h.engine.set_details(&h.supplier.clone(), details());
    assert!(matches!(second, Err(EngineError::AlreadyEvaluated { .. })));
}

// ── Scenario C: funding gate ──────────────────────────────────────────

#[test]
fn insufficient_deposit_leaves_funds_unlocked() {
    let mut h = harness(10);
    h.pass_sample_gate();
    h.pass_details_gate();
    assert_eq!(h.engine.phase(), Phase::Funding);

    h.engine
        .deposit_funds(&h.commissioner.clone(), Amount::from_units(5))
        .unwrap();
    assert_eq!(h.engine.record().funds_status, FundsStatus::NotLocked);
    assert_eq!(h.engine.phase(), Phase::Funding);

    h.engine
        .deposit_funds(&h.commissioner.clone(), Amount::from_units(10))
        .unwrap();
    assert_eq!(h.engine.record().funds_status, FundsStatus::Locked);
    assert_eq!(h.engine.phase(), Phase::AwaitingDocs);
    assert_eq!(h.engine.escrow().state(), EscrowState::Locked);
    assert_eq!(h.engine.escrow().lock_calls(), 1);
}

#[test]
fn deposit_outside_funding_phase_fails() {
    let mut h = harness(10);
    let result = h
        .engine
        .deposit_funds(&h.commissioner.clone(), Amount::from_units(10));
    assert!(matches!(result, Err(EngineError::WrongPhase { .. })));
}

// ── Scenario D: one-shot release ──────────────────────────────────────

#[test]
fn closing_the_document_gate_releases_funds_exactly_once() {
    let mut h = harness(10);
    h.pass_sample_gate();
    h.pass_details_gate();
    h.pass_funding_gate(10);
    assert_eq!(h.engine.phase(), Phase::AwaitingDocs);

    h.pass_document_gate();
    assert_eq!(h.engine.record().funds_status, FundsStatus::Released);
    assert_eq!(h.engine.phase(), Phase::Quality);
    assert_eq!(h.engine.escrow().state(), EscrowState::Released);
    assert_eq!(h.engine.escrow().release_calls(), 1);
    assert_eq!(h.engine.escrow().lock_calls(), 1);
}

#[test]
fn funds_status_never_moves_backward() {
    let mut h = harness(10);
    let mut observed = vec![h.engine.record().funds_status];
    h.pass_sample_gate();
    observed.push(h.engine.record().funds_status);
    h.pass_details_gate();
    observed.push(h.engine.record().funds_status);
    h.pass_funding_gate(10);
    observed.push(h.engine.record().funds_status);
    h.pass_document_gate();
    observed.push(h.engine.record().funds_status);

    for pair in observed.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

// ── Phase monotonicity ────────────────────────────────────────────────

#[test]
fn approval_only_history_has_non_decreasing_phases() {
    let mut h = harness(10);
    let mut phases = vec![h.engine.phase()];
    h.pass_sample_gate();
    phases.push(h.engine.phase());
    h.pass_details_gate();
    phases.push(h.engine.phase());
    h.pass_funding_gate(10);
    phases.push(h.engine.phase());
    h.pass_document_gate();
    phases.push(h.engine.phase());
    h.engine
        .evaluate_quality(&h.commissioner.clone(), Verdict::Approved)
        .unwrap();
    phases.push(h.engine.phase());

    for pair in phases.windows(2) {
        assert!(pair[0].ordinal() <= pair[1].ordinal());
    }
    assert_eq!(
        phases.iter().map(Phase::ordinal).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4, 5]
    );
}

// ── One-shot gates ────────────────────────────────────────────────────

#[test]
fn sample_evaluation_is_one_shot() {
    let mut h = harness(10);
    h.engine
        .evaluate_sample(&h.commissioner.clone(), Verdict::Rejected)
        .unwrap();
    let second = h
        .engine
        .evaluate_sample(&h.commissioner.clone(), Verdict::Approved);
    assert!(matches!(second, Err(EngineError::AlreadyEvaluated { .. })));
}

#[test]
fn quality_re_evaluation_fails_with_wrong_phase() {
    let mut h = harness(10);
    h.pass_sample_gate();
    h.pass_details_gate();
    h.pass_funding_gate(10);
    h.pass_document_gate();

    h.engine
        .evaluate_quality(&h.commissioner.clone(), Verdict::Approved)
        .unwrap();
    assert_eq!(h.engine.phase(), Phase::Confirmed);
    let second = h
        .engine
        .evaluate_quality(&h.commissioner.clone(), Verdict::Rejected);
    assert!(matches!(second, Err(EngineError::WrongPhase { .. })));
}

#[test]
fn double_document_approval_always_fails() {
    let mut h = harness(10);
    let id = h
        .engine
        .add_document(
            &h.supplier.clone(),
            DocumentCategory::SampleAnalysis,
            "analysis",
            "ipfs://doc",
        )
        .unwrap();
    h.engine.evaluate_document(&h.commissioner.clone(), id).unwrap();

    // Unrelated operation in between.
    h.engine
        .evaluate_sample(&h.commissioner.clone(), Verdict::Approved)
        .unwrap();

    let second = h.engine.evaluate_document(&h.commissioner.clone(), id);
    assert!(matches!(second, Err(EngineError::AlreadyApproved { .. })));
}

// ── Disputed terminality ──────────────────────────────────────────────

#[test]
fn rejected_quality_disputes_and_freezes_the_shipment() {
    let mut h = harness(10);
    h.pass_sample_gate();
    h.pass_details_gate();
    h.pass_funding_gate(10);
    h.pass_document_gate();

    h.engine
        .evaluate_quality(&h.commissioner.clone(), Verdict::Rejected)
        .unwrap();
    assert_eq!(h.engine.phase(), Phase::Disputed);
    assert!(h.engine.phase().is_terminal());

    // Funds stay released; no operation is accepted any more.
    assert_eq!(h.engine.record().funds_status, FundsStatus::Released);
    let supplementary = h.engine.add_document(
        &h.supplier.clone(),
        DocumentCategory::Supplementary,
        "late-note",
        "ipfs://doc",
    );
    assert!(matches!(supplementary, Err(EngineError::WrongPhase { .. })));
}

// ── Documents: gating, overwrite, update ──────────────────────────────

#[test]
fn document_upload_outside_governing_phase_fails() {
    let mut h = harness(10);
    let result = h.engine.add_document(
        &h.supplier.clone(),
        DocumentCategory::BillOfLading,
        "bol",
        "ipfs://doc",
    );
    assert!(matches!(result, Err(EngineError::WrongPhase { .. })));
}

#[test]
fn single_slot_re_add_overwrites() {
    let mut h = harness(10);
    let first = h
        .engine
        .add_document(
            &h.supplier.clone(),
            DocumentCategory::SampleAnalysis,
            "v1",
            "ipfs://v1",
        )
        .unwrap();
    let second = h
        .engine
        .add_document(
            &h.supplier.clone(),
            DocumentCategory::SampleAnalysis,
            "v2",
            "ipfs://v2",
        )
        .unwrap();
    assert_ne!(first, second);
    assert_eq!(
        h.engine.document_ids(DocumentCategory::SampleAnalysis),
        vec![second]
    );
}

#[test]
fn generic_slot_re_add_appends() {
    let mut h = harness(10);
    let first = h
        .engine
        .add_document(
            &h.supplier.clone(),
            DocumentCategory::Supplementary,
            "note-1",
            "ipfs://n1",
        )
        .unwrap();
    let second = h
        .engine
        .add_document(
            &h.supplier.clone(),
            DocumentCategory::Supplementary,
            "note-2",
            "ipfs://n2",
        )
        .unwrap();
    assert_eq!(
        h.engine.document_ids(DocumentCategory::Supplementary),
        vec![first, second]
    );
}

#[test]
fn update_rewrites_registry_metadata() {
    let mut h = harness(10);
    let id = h
        .engine
        .add_document(
            &h.supplier.clone(),
            DocumentCategory::SampleAnalysis,
            "v1",
            "ipfs://v1",
        )
        .unwrap();
    h.engine
        .update_document(&h.supplier.clone(), id, "v2", "ipfs://v2")
        .unwrap();
    let meta = h.engine.document_info(id).unwrap();
    assert_eq!(meta.name, "v2");
    assert_eq!(meta.url, "ipfs://v2");
}

#[test]
fn update_of_approved_document_fails() {
    let mut h = harness(10);
    let id = h.upload_and_approve(DocumentCategory::SampleAnalysis);
    let result = h.engine.update_document(&h.supplier.clone(), id, "v2", "u");
    assert!(matches!(result, Err(EngineError::AlreadyApproved { .. })));
}

#[test]
fn unknown_document_is_not_found_before_permission() {
    let mut h = harness(10);
    // An outsider probing an unknown id sees NotFound, not Unauthorized.
    let outsider = RoleProof::new(PrincipalId::new(), b"nope".to_vec());
    let result = h.engine.evaluate_document(&outsider, DocumentId(99));
    assert!(matches!(result, Err(EngineError::DocumentNotFound { .. })));
}

// ── Authorization ─────────────────────────────────────────────────────

#[test]
fn supplier_cannot_evaluate_and_commissioner_cannot_upload() {
    let mut h = harness(10);
    let upload = h.engine.add_document(
        &h.commissioner.clone(),
        DocumentCategory::SampleAnalysis,
        "analysis",
        "ipfs://doc",
    );
    assert!(matches!(upload, Err(EngineError::Unauthorized { .. })));

    let evaluation = h.engine.evaluate_sample(&h.supplier.clone(), Verdict::Approved);
    assert!(matches!(evaluation, Err(EngineError::Unauthorized { .. })));
}

#[test]
fn stale_credential_is_rejected() {
    let mut h = harness(10);
    let forged = RoleProof::new(h.supplier.principal, b"wrong-credential".to_vec());
    let result = h.engine.add_document(
        &forged,
        DocumentCategory::SampleAnalysis,
        "analysis",
        "ipfs://doc",
    );
    assert!(matches!(result, Err(EngineError::Unauthorized { .. })));
}

// ── Confirmed phase accepts optional paperwork ────────────────────────

#[test]
fn confirmed_shipment_accepts_quality_certificate() {
    let mut h = harness(10);
    h.pass_sample_gate();
    h.pass_details_gate();
    h.pass_funding_gate(10);
    h.pass_document_gate();
    h.engine
        .evaluate_quality(&h.commissioner.clone(), Verdict::Approved)
        .unwrap();
    assert_eq!(h.engine.phase(), Phase::Confirmed);

    let id = h
        .engine
        .add_document(
            &h.supplier.clone(),
            DocumentCategory::QualityCertificate,
            "final-quality",
            "ipfs://qc",
        )
        .unwrap();
    assert_eq!(
        h.engine.record().documents_in(DocumentCategory::QualityCertificate)[0].status,
        DocumentStatus::Pending
    );
    h.engine.evaluate_document(&h.commissioner.clone(), id).unwrap();
    // Phase is unaffected by optional paperwork.
    assert_eq!(h.engine.phase(), Phase::Confirmed);
}
