//! # Manager Status
//!
//! The coarse stage ladder of a managed shipment, `SHIPPING(0)`
//! through `CONFIRMED(4)`. Like the engine's phase, the status is
//! derived on every read — from order-level escrow custody, document
//! approvals, and the two terminal flags — and never stored.

use serde::{Deserialize, Serialize};

/// The derived stage of a managed shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManagerStatus {
    /// Order escrow not yet locked, or locked below the order amount.
    Shipping,
    /// Order funded, but not every mandatory document is approved.
    Transportation,
    /// Funded and fully documented; awaiting the commissioner's word.
    Onboarded,
    /// The commissioner opened arbitration. Terminal.
    Arbitration,
    /// The commissioner confirmed the shipment. Terminal.
    Confirmed,
}

impl ManagerStatus {
    /// The status ordinal, `0` through `4`.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Shipping => 0,
            Self::Transportation => 1,
            Self::Onboarded => 2,
            Self::Arbitration => 3,
            Self::Confirmed => 4,
        }
    }

    /// The canonical SCREAMING_SNAKE_CASE name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shipping => "SHIPPING",
            Self::Transportation => "TRANSPORTATION",
            Self::Onboarded => "ONBOARDED",
            Self::Arbitration => "ARBITRATION",
            Self::Confirmed => "CONFIRMED",
        }
    }

    /// Whether no further mutation is accepted in this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Arbitration | Self::Confirmed)
    }
}

impl std::fmt::Display for ManagerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_ascend() {
        let all = [
            ManagerStatus::Shipping,
            ManagerStatus::Transportation,
            ManagerStatus::Onboarded,
            ManagerStatus::Arbitration,
            ManagerStatus::Confirmed,
        ];
        for (expected, status) in all.iter().enumerate() {
            assert_eq!(status.ordinal() as usize, expected);
        }
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn only_arbitration_and_confirmed_are_terminal() {
        assert!(!ManagerStatus::Shipping.is_terminal());
        assert!(!ManagerStatus::Transportation.is_terminal());
        assert!(!ManagerStatus::Onboarded.is_terminal());
        assert!(ManagerStatus::Arbitration.is_terminal());
        assert!(ManagerStatus::Confirmed.is_terminal());
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&ManagerStatus::Onboarded).unwrap();
        assert_eq!(json, "\"ONBOARDED\"");
    }
}
