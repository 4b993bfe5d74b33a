//! # Shipment Phase
//!
//! The implicit workflow stage of a shipment. A phase is **never
//! stored** — it is derived from the shipment record by
//! [`compute_phase`](crate::engine::compute_phase) on every read, so
//! there is no cached value to go stale.
//!
//! ## Phases (ordinals 0–6)
//!
//! ```text
//! SAMPLE(0) ──▶ DETAILS(1) ──▶ FUNDING(2) ──▶ AWAITING_DOCS(3) ──▶ QUALITY(4)
//!                                                                    │    │
//!                                                          approve───┘    └───reject
//!                                                            │                  │
//!                                                            ▼                  ▼
//!                                                       CONFIRMED(5)      DISPUTED(6)
//! ```
//!
//! `CONFIRMED` and `DISPUTED` are terminal. A rejected sample or
//! details evaluation does not open a new phase — the shipment stays
//! put, permanently, in its governing phase.

use serde::{Deserialize, Serialize};

/// The derived workflow stage of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Awaiting sample documents and the sample evaluation.
    Sample,
    /// Awaiting shipment details and their evaluation.
    Details,
    /// Awaiting a sufficient escrow deposit.
    Funding,
    /// Funds locked; awaiting the remaining funds-gate documents.
    AwaitingDocs,
    /// Funds released; awaiting the quality evaluation.
    Quality,
    /// Quality approved. Terminal.
    Confirmed,
    /// Quality rejected. Terminal.
    Disputed,
}

impl Phase {
    /// The ordinal position of this phase (0–6).
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Sample => 0,
            Self::Details => 1,
            Self::Funding => 2,
            Self::AwaitingDocs => 3,
            Self::Quality => 4,
            Self::Confirmed => 5,
            Self::Disputed => 6,
        }
    }

    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sample => "SAMPLE",
            Self::Details => "DETAILS",
            Self::Funding => "FUNDING",
            Self::AwaitingDocs => "AWAITING_DOCS",
            Self::Quality => "QUALITY",
            Self::Confirmed => "CONFIRMED",
            Self::Disputed => "DISPUTED",
        }
    }

    /// Whether this phase admits no further mutation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Disputed)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
