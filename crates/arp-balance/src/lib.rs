//! arp-balance
//!
//! Balance / quota ledger for catalog items inside a contract:
//! - Opportunity line aggregation (WON only, per allocation class)
//! - Per-item base quota, consumption and remaining balance for one lot
//! - Proposed-quantity validation (participant pool vs piggyback pool + cap)
//! - Commit gate for a whole opportunity
//!
//! Deterministic, pure logic. No IO, no caching: every call recomputes from
//! the snapshot it is given, because consumption is a whole-history aggregate.

mod aggregator;
mod engine;
mod gate;
mod types;

pub use aggregator::{committed_by_item, committed_quantity, counts_toward};
pub use engine::{compute_balance, item_quota, validate_proposed_quantity};
pub use gate::{check_opportunity, CommitGate, LineVerdict};
pub use types::*;

/// Participant base = 1 × registered ceiling.
pub const PARTICIPANT_BASE_MULTIPLIER: f64 = 1.0;

/// Piggyback clients collectively may consume up to 2 × the ceiling,
/// separate from the participant pool.
pub const PIGGYBACK_BASE_MULTIPLIER: f64 = 2.0;

/// No single piggyback opportunity may request more than half the ceiling.
pub const PIGGYBACK_CAP_FRACTION: f64 = 0.5;
