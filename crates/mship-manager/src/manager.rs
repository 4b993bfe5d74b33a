//! # Shipment Manager
//!
//! The coarse sibling of the shipment engine: many lightweight
//! shipments per trade sharing one order-level escrow and one document
//! registry. Status is derived from escrow custody and document
//! approvals on every read; the only stored stage information is the
//! two terminal flags the commissioner sets.
//!
//! Validation order matches the engine: existence first, then
//! authorization, then the status gate, then slot one-shot gates.

use tracing::{debug, info};

use mship_core::{Amount, DocumentId, PrincipalId, Role, RoleProof, ShipmentId, Timestamp, TradeId};
use mship_ledger::{AccessVerifier, DocumentRegistry, EscrowLedger, EscrowState};

use crate::error::ManagerError;
use crate::shipment::{DocumentKind, DocumentSlot, ManagedShipment, SlotStatus};
use crate::status::ManagerStatus;

use std::collections::BTreeMap;

/// Derive the status of one managed shipment.
///
/// Pure over its inputs: the shipment record, whether the order escrow
/// is funded, nothing else.
pub fn compute_status(shipment: &ManagedShipment, order_funded: bool) -> ManagerStatus {
    if shipment.confirmed {
        return ManagerStatus::Confirmed;
    }
    if shipment.arbitration_started {
        return ManagerStatus::Arbitration;
    }
    if !order_funded {
        ManagerStatus::Shipping
    } else if !shipment.fully_documented() {
        ManagerStatus::Transportation
    } else {
        ManagerStatus::Onboarded
    }
}

/// The multi-shipment workflow for one order.
#[derive(Debug)]
pub struct ShipmentManager<E, R, A> {
    trade: TradeId,
    supplier: PrincipalId,
    commissioner: PrincipalId,
    order_amount: Amount,
    shipments: BTreeMap<ShipmentId, ManagedShipment>,
    escrow: E,
    registry: R,
    access: A,
}

impl<E, R, A> ShipmentManager<E, R, A>
where
    E: EscrowLedger,
    R: DocumentRegistry,
    A: AccessVerifier,
{
    /// Create a manager for one order with its two fixed principals.
    pub fn new(
        trade: TradeId,
        supplier: PrincipalId,
        commissioner: PrincipalId,
        order_amount: Amount,
        escrow: E,
        registry: R,
        access: A,
    ) -> Self {
        Self {
            trade,
            supplier,
            commissioner,
            order_amount,
            shipments: BTreeMap::new(),
            escrow,
            registry,
            access,
        }
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// The trade this order belongs to.
    pub fn trade(&self) -> TradeId {
        self.trade
    }

    /// The order-level escrow view.
    pub fn escrow(&self) -> &E {
        &self.escrow
    }

    /// The derived status of a managed shipment.
    ///
    /// # Errors
    ///
    /// `ShipmentNotFound` for an unknown id.
    pub fn status(&self, id: ShipmentId) -> Result<ManagerStatus, ManagerError> {
        let shipment = self.get(id)?;
        Ok(compute_status(shipment, self.order_funded()))
    }

    /// Read access to a managed shipment.
    ///
    /// # Errors
    ///
    /// `ShipmentNotFound` for an unknown id.
    pub fn shipment(&self, id: ShipmentId) -> Result<&ManagedShipment, ManagerError> {
        self.get(id)
    }

    /// The managed shipment identifiers, ascending.
    pub fn ids(&self) -> Vec<ShipmentId> {
        self.shipments.keys().copied().collect()
    }

    /// Whether the order escrow is locked at or above the order amount.
    pub fn order_funded(&self) -> bool {
        self.escrow.state() == EscrowState::Locked
            && self.escrow.total_deposited() >= self.order_amount
    }

    // ── Shipments ──────────────────────────────────────────────────────

    /// Register a new shipment under the order. Supplier only.
    ///
    /// The first shipment gets id 1.
    ///
    /// # Errors
    ///
    /// `Unauthorized`.
    pub fn add_shipment(
        &mut self,
        proof: &RoleProof,
        date: Timestamp,
        quantity: u32,
        weight: u64,
    ) -> Result<ShipmentId, ManagerError> {
        self.authorize(proof, Role::Supplier, "add_shipment")?;
        let id = self
            .shipments
            .last_key_value()
            .map(|(id, _)| id.next())
            .unwrap_or(ShipmentId::FIRST);
        self.shipments
            .insert(id, ManagedShipment::new(id, date, quantity, weight));
        debug!(trade = %self.trade, %id, "shipment added");
        Ok(id)
    }

    // ── Funds ──────────────────────────────────────────────────────────

    /// Deposit into the order escrow. Commissioner only.
    ///
    /// Locks the escrow the moment the deposited total reaches the
    /// order amount.
    ///
    /// # Errors
    ///
    /// `Unauthorized` or an escrow failure (in which case no state
    /// changed).
    pub fn deposit_funds(&mut self, proof: &RoleProof, amount: Amount) -> Result<(), ManagerError> {
        self.authorize(proof, Role::Commissioner, "deposit_funds")?;
        self.escrow.deposit(amount)?;
        let total = self.escrow.total_deposited();
        if total >= self.order_amount {
            self.escrow.lock_funds()?;
            info!(trade = %self.trade, %total, "order escrow locked");
        } else {
            debug!(trade = %self.trade, %total, "deposit below order amount");
        }
        Ok(())
    }

    // ── Documents ──────────────────────────────────────────────────────

    /// Upload a document into a mandatory slot. Supplier only.
    ///
    /// Re-uploading overwrites a pending or rejected slot, resetting it
    /// to `PENDING`. An approved slot cannot be overwritten.
    ///
    /// # Errors
    ///
    /// `ShipmentNotFound`, `Unauthorized`, `WrongStatus` (terminal
    /// shipment), `AlreadyApproved`, or a registry failure.
    pub fn add_document(
        &mut self,
        proof: &RoleProof,
        id: ShipmentId,
        kind: DocumentKind,
        name: &str,
        url: &str,
    ) -> Result<DocumentId, ManagerError> {
        let shipment = self.get(id)?;
        let slot = shipment.documents.get(&kind).copied();

        self.authorize(proof, Role::Supplier, "add_document")?;
        self.gate_open(id, &format!("add_document({kind})"))?;
        if slot.is_some_and(|slot| slot.status == SlotStatus::Approved) {
            return Err(ManagerError::AlreadyApproved { shipment: id, kind });
        }

        let document = self
            .registry
            .register(proof.principal, self.trade, name, kind.as_str(), url)?;

        if let Some(shipment) = self.shipments.get_mut(&id) {
            shipment.documents.insert(
                kind,
                DocumentSlot {
                    id: document,
                    status: SlotStatus::Pending,
                },
            );
        }
        debug!(trade = %self.trade, shipment = %id, %kind, "document added");
        Ok(document)
    }

    /// Approve a mandatory slot. Commissioner only; one-shot.
    ///
    /// # Errors
    ///
    /// `ShipmentNotFound`, `DocumentNotFound`, `Unauthorized`,
    /// `WrongStatus`, `AlreadyApproved`, or `AlreadyEvaluated`.
    pub fn approve_document(
        &mut self,
        proof: &RoleProof,
        id: ShipmentId,
        kind: DocumentKind,
    ) -> Result<(), ManagerError> {
        self.evaluate_slot(proof, id, kind, SlotStatus::Approved)
    }

    /// Reject a mandatory slot. Commissioner only; one-shot until the
    /// supplier re-uploads.
    ///
    /// # Errors
    ///
    /// `ShipmentNotFound`, `DocumentNotFound`, `Unauthorized`,
    /// `WrongStatus`, `AlreadyApproved`, or `AlreadyEvaluated`.
    pub fn reject_document(
        &mut self,
        proof: &RoleProof,
        id: ShipmentId,
        kind: DocumentKind,
    ) -> Result<(), ManagerError> {
        self.evaluate_slot(proof, id, kind, SlotStatus::Rejected)
    }

    // ── Terminal actions ───────────────────────────────────────────────

    /// Confirm a shipment. Commissioner only; `ONBOARDED` only;
    /// terminal.
    ///
    /// # Errors
    ///
    /// `ShipmentNotFound`, `Unauthorized`, or `WrongStatus`.
    pub fn confirm_shipment(&mut self, proof: &RoleProof, id: ShipmentId) -> Result<(), ManagerError> {
        self.terminal_action(proof, id, "confirm_shipment")?;
        if let Some(shipment) = self.shipments.get_mut(&id) {
            shipment.confirmed = true;
        }
        info!(trade = %self.trade, shipment = %id, "shipment confirmed");
        Ok(())
    }

    /// Open arbitration on a shipment. Commissioner only; `ONBOARDED`
    /// only; terminal.
    ///
    /// # Errors
    ///
    /// `ShipmentNotFound`, `Unauthorized`, or `WrongStatus`.
    pub fn start_arbitration(&mut self, proof: &RoleProof, id: ShipmentId) -> Result<(), ManagerError> {
        self.terminal_action(proof, id, "start_arbitration")?;
        if let Some(shipment) = self.shipments.get_mut(&id) {
            shipment.arbitration_started = true;
        }
        info!(trade = %self.trade, shipment = %id, "arbitration started");
        Ok(())
    }

    // ── Internal ───────────────────────────────────────────────────────

    fn get(&self, id: ShipmentId) -> Result<&ManagedShipment, ManagerError> {
        self.shipments
            .get(&id)
            .ok_or(ManagerError::ShipmentNotFound { shipment: id })
    }

    /// Reject mutation of a shipment already in a terminal status.
    fn gate_open(&self, id: ShipmentId, operation: &str) -> Result<(), ManagerError> {
        let status = compute_status(self.get(id)?, self.order_funded());
        if status.is_terminal() {
            return Err(ManagerError::WrongStatus {
                operation: operation.to_string(),
                status,
            });
        }
        Ok(())
    }

    fn evaluate_slot(
        &mut self,
        proof: &RoleProof,
        id: ShipmentId,
        kind: DocumentKind,
        verdict: SlotStatus,
    ) -> Result<(), ManagerError> {
        let shipment = self.get(id)?;
        let Some(slot) = shipment.documents.get(&kind).copied() else {
            return Err(ManagerError::DocumentNotFound { shipment: id, kind });
        };

        let operation = match verdict {
            SlotStatus::Approved => "approve_document",
            _ => "reject_document",
        };
        self.authorize(proof, Role::Commissioner, operation)?;
        self.gate_open(id, operation)?;
        match slot.status {
            SlotStatus::Approved => {
                return Err(ManagerError::AlreadyApproved { shipment: id, kind })
            }
            SlotStatus::Rejected => {
                return Err(ManagerError::AlreadyEvaluated { shipment: id, kind })
            }
            SlotStatus::Pending => {}
        }

        if let Some(shipment) = self.shipments.get_mut(&id) {
            if let Some(slot) = shipment.documents.get_mut(&kind) {
                slot.status = verdict;
            }
        }
        debug!(trade = %self.trade, shipment = %id, %kind, ?verdict, "slot evaluated");
        Ok(())
    }

    fn terminal_action(
        &mut self,
        proof: &RoleProof,
        id: ShipmentId,
        operation: &str,
    ) -> Result<(), ManagerError> {
        let shipment = self.get(id)?;
        self.authorize(proof, Role::Commissioner, operation)?;
        let status = compute_status(shipment, self.order_funded());
        if status != ManagerStatus::Onboarded {
            return Err(ManagerError::WrongStatus {
                operation: operation.to_string(),
                status,
            });
        }
        Ok(())
    }

    /// Check the caller against the registered principal for `role`
    /// and verify its role proof.
    fn authorize(
        &self,
        proof: &RoleProof,
        role: Role,
        operation: &str,
    ) -> Result<(), ManagerError> {
        let expected = match role {
            Role::Supplier => self.supplier,
            Role::Commissioner => self.commissioner,
        };
        if proof.principal != expected || !self.access.has_valid_role(proof, role) {
            return Err(ManagerError::Unauthorized {
                principal: proof.principal,
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}
