//! # Order Manager Routes
//!
//! HTTP surface over the per-order shipment managers: order creation,
//! shipment registration, order-level escrow deposits, mandatory
//! document slots, and the terminal confirm and arbitration actions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mship_core::{Amount, DocumentId, PrincipalId, Role, ShipmentId, Timestamp, TradeId};
use mship_ledger::{InMemoryDocumentRegistry, InMemoryEscrow, StaticAccessVerifier};
use mship_manager::{DocumentKind, ManagedShipment, ManagerStatus};

use crate::error::AppError;
use crate::routes::ProofBody;
use crate::state::{AppState, Manager};

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/orders", post(create_order))
        .route("/v1/orders/:trade/deposits", post(deposit_funds))
        .route("/v1/orders/:trade/shipments", post(add_shipment))
        .route("/v1/orders/:trade/shipments/:id", get(get_shipment))
        .route("/v1/orders/:trade/shipments/:id/status", get(get_status))
        .route(
            "/v1/orders/:trade/shipments/:id/documents",
            post(add_document),
        )
        .route(
            "/v1/orders/:trade/shipments/:id/documents/:kind/approval",
            post(approve_document),
        )
        .route(
            "/v1/orders/:trade/shipments/:id/documents/:kind/rejection",
            post(reject_document),
        )
        .route(
            "/v1/orders/:trade/shipments/:id/confirmation",
            post(confirm_shipment),
        )
        .route(
            "/v1/orders/:trade/shipments/:id/arbitration",
            post(start_arbitration),
        )
}

// ── Request/response bodies ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub supplier: Uuid,
    pub supplier_credential: String,
    pub commissioner: Uuid,
    pub commissioner_credential: String,
    pub order_amount: u64,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub trade: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AddShipmentRequest {
    pub proof: ProofBody,
    pub date: Timestamp,
    pub quantity: u32,
    pub weight: u64,
}

#[derive(Debug, Serialize)]
pub struct ShipmentCreatedResponse {
    pub id: ShipmentId,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: ManagerStatus,
    pub ordinal: u8,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub proof: ProofBody,
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct AddDocumentRequest {
    pub proof: ProofBody,
    pub kind: DocumentKind,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentCreatedResponse {
    pub id: DocumentId,
}

// ── Handlers ──────────────────────────────────────────────────────────

fn unknown_order(trade: Uuid) -> AppError {
    AppError::NotFound(format!("trade:{trade} is not registered"))
}

async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    let supplier = PrincipalId::from_uuid(body.supplier);
    let commissioner = PrincipalId::from_uuid(body.commissioner);

    let mut access = StaticAccessVerifier::new();
    access.grant(supplier, Role::Supplier, body.supplier_credential.as_bytes());
    access.grant(
        commissioner,
        Role::Commissioner,
        body.commissioner_credential.as_bytes(),
    );

    let trade = TradeId::new();
    let manager = Manager::new(
        trade,
        supplier,
        commissioner,
        Amount::from_units(body.order_amount),
        InMemoryEscrow::new(),
        InMemoryDocumentRegistry::new(),
        access,
    );
    state.orders.write().insert(*trade.as_uuid(), manager);
    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            trade: *trade.as_uuid(),
        }),
    ))
}

async fn deposit_funds(
    State(state): State<AppState>,
    Path(trade): Path<Uuid>,
    Json(body): Json<DepositRequest>,
) -> Result<StatusCode, AppError> {
    let mut orders = state.orders.write();
    let manager = orders.get_mut(&trade).ok_or_else(|| unknown_order(trade))?;
    manager.deposit_funds(&body.proof.proof(), Amount::from_units(body.amount))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_shipment(
    State(state): State<AppState>,
    Path(trade): Path<Uuid>,
    Json(body): Json<AddShipmentRequest>,
) -> Result<(StatusCode, Json<ShipmentCreatedResponse>), AppError> {
    let mut orders = state.orders.write();
    let manager = orders.get_mut(&trade).ok_or_else(|| unknown_order(trade))?;
    let id = manager.add_shipment(&body.proof.proof(), body.date, body.quantity, body.weight)?;
    Ok((StatusCode::CREATED, Json(ShipmentCreatedResponse { id })))
}

async fn get_shipment(
    State(state): State<AppState>,
    Path((trade, id)): Path<(Uuid, u64)>,
) -> Result<Json<ManagedShipment>, AppError> {
    let orders = state.orders.read();
    let manager = orders.get(&trade).ok_or_else(|| unknown_order(trade))?;
    Ok(Json(manager.shipment(ShipmentId(id))?.clone()))
}

async fn get_status(
    State(state): State<AppState>,
    Path((trade, id)): Path<(Uuid, u64)>,
) -> Result<Json<StatusResponse>, AppError> {
    let orders = state.orders.read();
    let manager = orders.get(&trade).ok_or_else(|| unknown_order(trade))?;
    let status = manager.status(ShipmentId(id))?;
    Ok(Json(StatusResponse {
        status,
        ordinal: status.ordinal(),
    }))
}

async fn add_document(
    State(state): State<AppState>,
    Path((trade, id)): Path<(Uuid, u64)>,
    Json(body): Json<AddDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentCreatedResponse>), AppError> {
    let mut orders = state.orders.write();
    let manager = orders.get_mut(&trade).ok_or_else(|| unknown_order(trade))?;
    let document = manager.add_document(
        &body.proof.proof(),
        ShipmentId(id),
        body.kind,
        &body.name,
        &body.url,
    )?;
    Ok((
        StatusCode::CREATED,
        Json(DocumentCreatedResponse { id: document }),
    ))
}

async fn approve_document(
    State(state): State<AppState>,
    Path((trade, id, kind)): Path<(Uuid, u64, DocumentKind)>,
    Json(body): Json<ProofBody>,
) -> Result<StatusCode, AppError> {
    let mut orders = state.orders.write();
    let manager = orders.get_mut(&trade).ok_or_else(|| unknown_order(trade))?;
    manager.approve_document(&body.proof(), ShipmentId(id), kind)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reject_document(
    State(state): State<AppState>,
    Path((trade, id, kind)): Path<(Uuid, u64, DocumentKind)>,
    Json(body): Json<ProofBody>,
) -> Result<StatusCode, AppError> {
    let mut orders = state.orders.write();
    let manager = orders.get_mut(&trade).ok_or_else(|| unknown_order(trade))?;
    manager.reject_document(&body.proof(), ShipmentId(id), kind)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn confirm_shipment(
    State(state): State<AppState>,
    Path((trade, id)): Path<(Uuid, u64)>,
    Json(body): Json<ProofBody>,
) -> Result<StatusCode, AppError> {
    let mut orders = state.orders.write();
    let manager = orders.get_mut(&trade).ok_or_else(|| unknown_order(trade))?;
    manager.confirm_shipment(&body.proof(), ShipmentId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn start_arbitration(
    State(state): State<AppState>,
    Path((trade, id)): Path<(Uuid, u64)>,
    Json(body): Json<ProofBody>,
) -> Result<StatusCode, AppError> {
    let mut orders = state.orders.write();
    let manager = orders.get_mut(&trade).ok_or_else(|| unknown_order(trade))?;
    manager.start_arbitration(&body.proof(), ShipmentId(id))?;
    Ok(StatusCode::NO_CONTENT)
}
