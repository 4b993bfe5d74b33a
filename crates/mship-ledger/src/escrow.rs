//! # Escrow Ledger
//!
//! Fund custody for a shipment: accepts deposits, reports totals, and
//! exposes the one-shot `lock_funds`/`release_funds` pair. The engine
//! consumes this contract; it never reimplements token accounting.
//!
//! ## Security Invariant
//!
//! Custody state only moves forward: `Active → Locked → Released` (or
//! into `Refunding`/`Closed` through order-level settlement outside
//! this contract). `lock_funds` and `release_funds` each succeed at
//! most once per ledger — a second call is rejected with
//! [`LedgerError::InvalidOperation`], never silently ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use mship_core::{Amount, AmountError, Timestamp};

/// Errors arising from escrow ledger operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The operation is not valid in the ledger's current state.
    #[error("escrow cannot perform {operation} in state {state}")]
    InvalidOperation {
        /// The attempted operation (e.g., "lock_funds").
        operation: String,
        /// The custody state at the time of the attempt.
        state: String,
    },

    /// Deposit accounting overflowed.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// The custody state of an escrow ledger.
///
/// State machine: `Active → Locked → Released`, with `Refunding` and
/// `Closed` reserved for order-level unwinding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscrowState {
    /// Accepting deposits; nothing locked yet.
    Active,
    /// The agreed amount is locked pending the document gate.
    Locked,
    /// Funds have been released to the beneficiary. Terminal.
    Released,
    /// Deposits are being returned to the depositor.
    Refunding,
    /// The ledger is closed. Terminal.
    Closed,
}

impl EscrowState {
    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Locked => "LOCKED",
            Self::Released => "RELEASED",
            Self::Refunding => "REFUNDING",
            Self::Closed => "CLOSED",
        }
    }

    /// Whether this state admits no further custody transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Closed)
    }
}

impl std::fmt::Display for EscrowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for EscrowState {
    fn default() -> Self {
        Self::Active
    }
}

/// A recorded deposit into the escrow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowDeposit {
    /// Amount deposited.
    pub amount: Amount,
    /// When the deposit landed.
    pub timestamp: Timestamp,
}

/// The fund custody contract consumed by the shipment engine.
pub trait EscrowLedger {
    /// Record a deposit.
    ///
    /// # Errors
    ///
    /// Fails if the ledger is not accepting deposits or the running
    /// total would overflow.
    fn deposit(&mut self, amount: Amount) -> Result<(), LedgerError>;

    /// The running total of all deposits.
    fn total_deposited(&self) -> Amount;

    /// The amount currently locked (zero unless `Locked` was reached).
    fn locked_amount(&self) -> Amount;

    /// Lock the deposited total. One-shot: legal only from `Active`.
    ///
    /// # Errors
    ///
    /// Fails with [`LedgerError::InvalidOperation`] in any other state.
    fn lock_funds(&mut self) -> Result<(), LedgerError>;

    /// Release the locked funds. One-shot: legal only from `Locked`.
    ///
    /// # Errors
    ///
    /// Fails with [`LedgerError::InvalidOperation`] in any other state.
    fn release_funds(&mut self) -> Result<(), LedgerError>;

    /// The current custody state.
    fn state(&self) -> EscrowState;
}

/// In-memory reference escrow ledger.
///
/// Tracks the deposit log and exposes call counters so the test suites
/// can assert that `lock_funds` and `release_funds` are each invoked
/// at most once per shipment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryEscrow {
    deposits: Vec<EscrowDeposit>,
    total: Amount,
    locked: Amount,
    state: EscrowState,
    lock_calls: u32,
    release_calls: u32,
}

impl InMemoryEscrow {
    /// Create an empty ledger in `Active` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The deposit log, oldest first.
    pub fn deposits(&self) -> &[EscrowDeposit] {
        &self.deposits
    }

    /// How many times `lock_funds` has been invoked successfully.
    pub fn lock_calls(&self) -> u32 {
        self.lock_calls
    }

    /// How many times `release_funds` has been invoked successfully.
    pub fn release_calls(&self) -> u32 {
        self.release_calls
    }
}

impl EscrowLedger for InMemoryEscrow {
    fn deposit(&mut self, amount: Amount) -> Result<(), LedgerError> {
        if self.state != EscrowState::Active {
            return Err(LedgerError::InvalidOperation {
                operation: "deposit".to_string(),
                state: self.state.as_str().to_string(),
            });
        }
        self.total = self.total.checked_add(amount)?;
        self.deposits.push(EscrowDeposit {
            amount,
            timestamp: Timestamp::now(),
        });
        Ok(())
    }

    fn total_deposited(&self) -> Amount {
        self.total
    }

    fn locked_amount(&self) -> Amount {
        self.locked
    }

    fn lock_funds(&mut self) -> Result<(), LedgerError> {
        if self.state != EscrowState::Active {
            return Err(LedgerError::InvalidOperation {
                operation: "lock_funds".to_string(),
                state: self.state.as_str().to_string(),
            });
        }
        self.locked = self.total;
        self.state = EscrowState::Locked;
        self.lock_calls += 1;
        Ok(())
    }

    fn release_funds(&mut self) -> Result<(), LedgerError> {
        if self.state != EscrowState::Locked {
            return Err(LedgerError::InvalidOperation {
                operation: "release_funds".to_string(),
                state: self.state.as_str().to_string(),
            });
        }
        self.state = EscrowState::Released;
        self.release_calls += 1;
        Ok(())
    }

    fn state(&self) -> EscrowState {
        self.state
    }
}
