use std::fmt;

use arp_schemas::{CatalogItem, ClientId, Contract, ContractId, ItemId, LotId, OpportunityId};
use serde::Serialize;

/// Allocation class of a client relative to one contract.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationClass {
    /// Client is listed in the contract's participant set.
    Participant,
    /// Client is not a participant ("carona").
    Piggyback,
}

impl AllocationClass {
    pub fn for_client(contract: &Contract, client_id: ClientId) -> Self {
        if contract.is_participant(client_id) {
            AllocationClass::Participant
        } else {
            AllocationClass::Piggyback
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationClass::Participant => "PARTICIPANT",
            AllocationClass::Piggyback => "PIGGYBACK",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PARTICIPANT" | "PARTICIPANTE" => Some(AllocationClass::Participant),
            "PIGGYBACK" | "CARONA" => Some(AllocationClass::Piggyback),
            _ => None,
        }
    }
}

/// Quota that applies to one item under one class.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ItemQuota {
    /// Shared pool for the class.
    pub base: f64,
    /// Per-opportunity ceiling (piggyback only).
    pub per_opportunity_cap: Option<f64>,
}

/// Per-item balance row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BalanceRow {
    pub item: CatalogItem,
    pub base: f64,
    pub consumed: f64,
    pub remaining: f64,
}

/// Aggregate over every row of a lot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct BalanceSummary {
    pub base: f64,
    pub consumed: f64,
    pub remaining: f64,
}

/// Output of [`crate::compute_balance`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BalanceReport {
    pub contract_id: ContractId,
    pub lot_id: LotId,
    pub class: AllocationClass,
    /// Sorted by dotted item number.
    pub rows: Vec<BalanceRow>,
    pub summary: BalanceSummary,
}

impl BalanceReport {
    pub fn row(&self, item_id: ItemId) -> Option<&BalanceRow> {
        self.rows.iter().find(|r| r.item.id == item_id)
    }
}

/// Structural errors that prevent a balance from being computed at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BalanceError {
    /// The lot does not belong to the contract it was paired with.
    LotNotInContract { lot_id: LotId, contract_id: ContractId },
    /// The opportunity belongs to a different contract.
    OpportunityNotInContract {
        opportunity_id: OpportunityId,
        contract_id: ContractId,
    },
}

impl fmt::Display for BalanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LotNotInContract {
                lot_id,
                contract_id,
            } => write!(f, "lot {lot_id} does not belong to contract {contract_id}"),
            Self::OpportunityNotInContract {
                opportunity_id,
                contract_id,
            } => write!(
                f,
                "opportunity {opportunity_id} does not belong to contract {contract_id}"
            ),
        }
    }
}

impl std::error::Error for BalanceError {}

/// Why a proposed quantity was rejected. Quantities are never clamped.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalanceViolation {
    /// Not finite, or below the minimum line quantity of 1.
    BadQuantity { quantity: f64 },
    /// The item is not part of the contract.
    UnknownItem { item_id: ItemId },
    /// Piggyback single-opportunity cap exceeded.
    ExceedsPerOpportunityCap { quantity: f64, cap: f64 },
    /// Shared remaining balance of the class exceeded.
    ExceedsRemaining { quantity: f64, remaining: f64 },
}

impl fmt::Display for BalanceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadQuantity { quantity } => {
                write!(f, "quantity {quantity} is invalid (must be >= 1)")
            }
            Self::UnknownItem { item_id } => {
                write!(f, "item {item_id} is not part of this contract")
            }
            Self::ExceedsPerOpportunityCap { quantity, cap } => write!(
                f,
                "quantity {quantity} exceeds the per-opportunity piggyback cap of {cap}"
            ),
            Self::ExceedsRemaining {
                quantity,
                remaining,
            } => write!(
                f,
                "quantity {quantity} exceeds the remaining balance of {remaining}"
            ),
        }
    }
}

/// Verdict for one proposed quantity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuantityCheck {
    pub ok: bool,
    /// Every rule the quantity broke, cap before balance.
    pub violations: Vec<BalanceViolation>,
    /// Remaining balance the check was made against (after rounding).
    pub remaining: f64,
}

impl QuantityCheck {
    pub fn accepted(remaining: f64) -> Self {
        Self {
            ok: true,
            violations: Vec::new(),
            remaining,
        }
    }

    pub fn rejected(violations: Vec<BalanceViolation>, remaining: f64) -> Self {
        Self {
            ok: false,
            violations,
            remaining,
        }
    }

    /// Human-readable reason, `None` when accepted.
    pub fn reason(&self) -> Option<String> {
        if self.violations.is_empty() {
            return None;
        }
        Some(
            self.violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
