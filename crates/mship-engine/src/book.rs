//! # Shipment Book
//!
//! The registration collection owning many shipment engines. Hands out
//! sequential [`ShipmentId`]s starting at 1 and never deletes a
//! shipment — terminal shipments simply stop accepting mutations.
//!
//! Shipments are independent units of concurrency: the book provides
//! per-shipment access, and no operation spans two shipments.

use std::collections::BTreeMap;

use mship_core::{Amount, PrincipalId, ShipmentId, TradeId};
use mship_ledger::{AccessVerifier, DocumentRegistry, EscrowLedger};

use crate::engine::ShipmentEngine;
use crate::error::EngineError;

/// An ordered collection of shipment engines.
#[derive(Debug, Default)]
pub struct ShipmentBook<E, R, A> {
    shipments: BTreeMap<ShipmentId, ShipmentEngine<E, R, A>>,
}

impl<E, R, A> ShipmentBook<E, R, A>
where
    E: EscrowLedger,
    R: DocumentRegistry,
    A: AccessVerifier,
{
    /// Create an empty book.
    pub fn new() -> Self {
        Self {
            shipments: BTreeMap::new(),
        }
    }

    /// Register a new shipment with its collaborators; returns its id.
    ///
    /// The first registration gets id 1.
    pub fn register(
        &mut self,
        supplier: PrincipalId,
        commissioner: PrincipalId,
        agreed_amount: Amount,
        escrow: E,
        registry: R,
        access: A,
    ) -> ShipmentId {
        let id = self
            .shipments
            .last_key_value()
            .map(|(id, _)| id.next())
            .unwrap_or(ShipmentId::FIRST);
        let engine = ShipmentEngine::new(
            TradeId::new(),
            supplier,
            commissioner,
            agreed_amount,
            escrow,
            registry,
            access,
        );
        self.shipments.insert(id, engine);
        id
    }

    /// Read access to a registered shipment.
    ///
    /// # Errors
    ///
    /// `ShipmentNotFound` for an unknown id.
    pub fn get(&self, id: ShipmentId) -> Result<&ShipmentEngine<E, R, A>, EngineError> {
        self.shipments
            .get(&id)
            .ok_or(EngineError::ShipmentNotFound { shipment: id })
    }

    /// Mutable access to a registered shipment.
    ///
    /// # Errors
    ///
    /// `ShipmentNotFound` for an unknown id.
    pub fn get_mut(&mut self, id: ShipmentId) -> Result<&mut ShipmentEngine<E, R, A>, EngineError> {
        self.shipments
            .get_mut(&id)
            .ok_or(EngineError::ShipmentNotFound { shipment: id })
    }

    /// The registered shipment identifiers, ascending.
    pub fn ids(&self) -> Vec<ShipmentId> {
        self.shipments.keys().copied().collect()
    }

    /// How many shipments are registered.
    pub fn len(&self) -> usize {
        self.shipments.len()
    }

    /// Whether no shipment is registered.
    pub fn is_empty(&self) -> bool {
        self.shipments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mship_ledger::{AllowAllVerifier, InMemoryDocumentRegistry, InMemoryEscrow};

    type TestBook = ShipmentBook<InMemoryEscrow, InMemoryDocumentRegistry, AllowAllVerifier>;

    fn register_one(book: &mut TestBook) -> ShipmentId {
        book.register(
            PrincipalId::new(),
            PrincipalId::new(),
            Amount::from_units(10),
            InMemoryEscrow::new(),
            InMemoryDocumentRegistry::new(),
            AllowAllVerifier,
        )
    }

    #[test]
    fn first_registration_gets_id_one() {
        let mut book = TestBook::new();
        assert!(book.is_empty());
        let id = register_one(&mut book);
        assert_eq!(id, ShipmentId::FIRST);
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn ids_are_sequential() {
        let mut book = TestBook::new();
        let first = register_one(&mut book);
        let second = register_one(&mut book);
        let third = register_one(&mut book);
        assert_eq!((first, second, third), (ShipmentId(1), ShipmentId(2), ShipmentId(3)));
        assert_eq!(book.ids(), vec![ShipmentId(1), ShipmentId(2), ShipmentId(3)]);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut book = TestBook::new();
        register_one(&mut book);
        assert!(matches!(
            book.get(ShipmentId(99)),
            Err(EngineError::ShipmentNotFound { .. })
        ));
        assert!(matches!(
            book.get_mut(ShipmentId(99)),
            Err(EngineError::ShipmentNotFound { .. })
        ));
    }

    #[test]
    fn registered_shipment_is_retrievable() {
        let mut book = TestBook::new();
        let id = register_one(&mut book);
        let engine = book.get(id).unwrap();
        assert_eq!(engine.phase(), crate::phase::Phase::Sample);
    }

    #[test]
    fn trades_are_distinct_per_shipment() {
        let mut book = TestBook::new();
        let first = register_one(&mut book);
        let second = register_one(&mut book);
        assert_ne!(
            book.get(first).unwrap().trade(),
            book.get(second).unwrap().trade()
        );
    }
}
