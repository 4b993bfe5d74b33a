//! # Shipment Engine Routes
//!
//! HTTP surface over the shipment book: registration, phase and record
//! queries, document upload and approval, the one-shot evaluations,
//! and escrow deposits. The phase rule table lookups are exposed as
//! pure, stateless endpoints under `/v1/rules`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mship_core::{Amount, DocumentId, PrincipalId, Role, ShipmentId};
use mship_engine::{
    required_documents, uploadable_documents, DocumentCategory, Phase, ShipmentDetails,
    ShipmentRecord, Verdict,
};
use mship_ledger::{DocumentMeta, InMemoryDocumentRegistry, InMemoryEscrow, StaticAccessVerifier};

use crate::error::AppError;
use crate::routes::ProofBody;
use crate::state::AppState;

/// Build the shipment and rule-table routers.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/shipments", post(register))
        .route("/v1/shipments/:id", get(get_shipment))
        .route("/v1/shipments/:id/phase", get(get_phase))
        .route("/v1/shipments/:id/documents", post(add_document))
        .route("/v1/shipments/:id/documents/:doc", get(get_document_ids))
        .route("/v1/shipments/:id/documents/:doc/info", get(get_document_info))
        .route("/v1/shipments/:id/documents/:doc", put(update_document))
        .route(
            "/v1/shipments/:id/documents/:doc/approval",
            post(approve_document),
        )
        .route("/v1/shipments/:id/details", post(set_details))
        .route("/v1/shipments/:id/evaluations/sample", post(evaluate_sample))
        .route(
            "/v1/shipments/:id/evaluations/details",
            post(evaluate_details),
        )
        .route(
            "/v1/shipments/:id/evaluations/quality",
            post(evaluate_quality),
        )
        .route("/v1/shipments/:id/deposits", post(deposit_funds))
        .route("/v1/rules/uploadable/:phase", get(get_uploadable))
        .route("/v1/rules/required/:phase", get(get_required))
}

// ── Request/response bodies ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub supplier: Uuid,
    pub supplier_credential: String,
    pub commissioner: Uuid,
    pub commissioner_credential: String,
    pub agreed_amount: u64,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: ShipmentId,
}

#[derive(Debug, Serialize)]
pub struct ShipmentView {
    pub id: ShipmentId,
    pub trade: String,
    pub phase: Phase,
    pub record: ShipmentRecord,
}

#[derive(Debug, Serialize)]
pub struct PhaseResponse {
    pub phase: Phase,
    pub ordinal: u8,
}

#[derive(Debug, Deserialize)]
pub struct AddDocumentRequest {
    pub proof: ProofBody,
    pub category: DocumentCategory,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentCreatedResponse {
    pub id: DocumentId,
}

#[derive(Debug, Serialize)]
pub struct DocumentIdsResponse {
    pub ids: Vec<DocumentId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    pub proof: ProofBody,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SetDetailsRequest {
    pub proof: ProofBody,
    pub details: ShipmentDetails,
}

#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    pub proof: ProofBody,
    pub verdict: Verdict,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub proof: ProofBody,
    pub amount: u64,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<DocumentCategory>,
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let supplier = PrincipalId::from_uuid(body.supplier);
    let commissioner = PrincipalId::from_uuid(body.commissioner);

    let mut access = StaticAccessVerifier::new();
    access.grant(supplier, Role::Supplier, body.supplier_credential.as_bytes());
    access.grant(
        commissioner,
        Role::Commissioner,
        body.commissioner_credential.as_bytes(),
    );

    let id = state.book.write().register(
        supplier,
        commissioner,
        Amount::from_units(body.agreed_amount),
        InMemoryEscrow::new(),
        InMemoryDocumentRegistry::new(),
        access,
    );
    Ok((StatusCode::CREATED, Json(RegisterResponse { id })))
}

async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ShipmentView>, AppError> {
    let book = state.book.read();
    let engine = book.get(ShipmentId(id))?;
    Ok(Json(ShipmentView {
        id: ShipmentId(id),
        trade: engine.trade().to_string(),
        phase: engine.phase(),
        record: engine.record().clone(),
    }))
}

async fn get_phase(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PhaseResponse>, AppError> {
    let book = state.book.read();
    let phase = book.get(ShipmentId(id))?.phase();
    Ok(Json(PhaseResponse {
        phase,
        ordinal: phase.ordinal(),
    }))
}

async fn add_document(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<AddDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentCreatedResponse>), AppError> {
    let mut book = state.book.write();
    let document = book.get_mut(ShipmentId(id))?.add_document(
        &body.proof.proof(),
        body.category,
        &body.name,
        &body.url,
    )?;
    Ok((
        StatusCode::CREATED,
        Json(DocumentCreatedResponse { id: document }),
    ))
}

async fn get_document_ids(
    State(state): State<AppState>,
    Path((id, category)): Path<(u64, DocumentCategory)>,
) -> Result<Json<DocumentIdsResponse>, AppError> {
    let book = state.book.read();
    let ids = book.get(ShipmentId(id))?.document_ids(category);
    Ok(Json(DocumentIdsResponse { ids }))
}

async fn get_document_info(
    State(state): State<AppState>,
    Path((id, doc)): Path<(u64, u64)>,
) -> Result<Json<DocumentMeta>, AppError> {
    let book = state.book.read();
    let meta = book.get(ShipmentId(id))?.document_info(DocumentId(doc))?;
    Ok(Json(meta))
}

async fn update_document(
    State(state): State<AppState>,
    Path((id, doc)): Path<(u64, u64)>,
    Json(body): Json<UpdateDocumentRequest>,
) -> Result<StatusCode, AppError> {
    let mut book = state.book.write();
    book.get_mut(ShipmentId(id))?.update_document(
        &body.proof.proof(),
        DocumentId(doc),
        &body.name,
        &body.url,
    )?;
    Ok(StatusCode::NO_CONTENT)
}

async fn approve_document(
    State(state): State<AppState>,
    Path((id, doc)): Path<(u64, u64)>,
    Json(body): Json<ProofBody>,
) -> Result<StatusCode, AppError> {
    let mut book = state.book.write();
    book.get_mut(ShipmentId(id))?
        .evaluate_document(&body.proof(), DocumentId(doc))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<SetDetailsRequest>,
) -> Result<StatusCode, AppError> {
    let mut book = state.book.write();
    book.get_mut(ShipmentId(id))?
        .set_details(&body.proof.proof(), body.details)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn evaluate_sample(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<EvaluationRequest>,
) -> Result<StatusCode, AppError> {
    let mut book = state.book.write();
    book.get_mut(ShipmentId(id))?
        .evaluate_sample(&body.proof.proof(), body.verdict)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn evaluate_details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<EvaluationRequest>,
) -> Result<StatusCode, AppError> {
    let mut book = state.book.write();
    book.get_mut(ShipmentId(id))?
        .evaluate_details(&body.proof.proof(), body.verdict)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn evaluate_quality(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<EvaluationRequest>,
) -> Result<StatusCode, AppError> {
    let mut book = state.book.write();
    book.get_mut(ShipmentId(id))?
        .evaluate_quality(&body.proof.proof(), body.verdict)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn deposit_funds(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<DepositRequest>,
) -> Result<StatusCode, AppError> {
    let mut book = state.book.write();
    book.get_mut(ShipmentId(id))?
        .deposit_funds(&body.proof.proof(), Amount::from_units(body.amount))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_uploadable(Path(phase): Path<Phase>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: uploadable_documents(phase),
    })
}

async fn get_required(Path(phase): Path<Phase>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: required_documents(phase),
    })
}
