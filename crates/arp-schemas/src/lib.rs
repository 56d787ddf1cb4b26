//! arp-schemas
//!
//! Data model for price-registration agreements (ARPs):
//! - Contracts own lots, lots own catalog items, items own equipment
//! - Opportunities reference contract/lot/item/client by id, never own them
//! - Pricing is a sum type (one-off vs monthly), chosen by the lot supply type
//!
//! Pure data + invariants. No IO, no clock reads (callers pass `today`).

mod contract;
mod deal;
mod error;
mod ids;
mod item;
mod party;

pub mod numbering;

pub use contract::{Contract, ContractStatus, Lot, SupplyType};
pub use deal::{Kit, KitItem, Opportunity, OpportunityLine, OpportunityStatus};
pub use error::ModelError;
pub use ids::{ClientId, ContractId, ItemId, KitId, LotId, OpportunityId};
pub use item::{CatalogItem, Equipment, MonthlyKind, Pricing};
pub use numbering::{cmp_item_numbers, sort_by_item_number};
pub use party::{normalize_tax_id, Client, Sphere};

/// Tolerance applied to every quantity comparison against a cap or balance.
pub const EPSILON: f64 = 1e-9;

/// Round to 2 decimal places, half away from zero (currency display semantics).
///
/// `f64::round` already rounds half away from zero; non-finite input is
/// returned unchanged.
pub fn round2(v: f64) -> f64 {
    if !v.is_finite() {
        return v;
    }
    (v * 100.0).round() / 100.0
}
