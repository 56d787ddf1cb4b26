use arp_schemas::{
    round2, sort_by_item_number, CatalogItem, Contract, Lot, Opportunity, OpportunityId, EPSILON,
};

use crate::aggregator::{committed_by_item, committed_quantity};
use crate::{
    AllocationClass, BalanceError, BalanceReport, BalanceRow, BalanceSummary, BalanceViolation,
    ItemQuota, QuantityCheck, PARTICIPANT_BASE_MULTIPLIER, PIGGYBACK_BASE_MULTIPLIER,
    PIGGYBACK_CAP_FRACTION,
};

/// Base pool and per-opportunity cap for one item under one class.
pub fn item_quota(item: &CatalogItem, class: AllocationClass) -> ItemQuota {
    match class {
        AllocationClass::Participant => ItemQuota {
            base: round2(item.total * PARTICIPANT_BASE_MULTIPLIER),
            per_opportunity_cap: None,
        },
        AllocationClass::Piggyback => ItemQuota {
            base: round2(item.total * PIGGYBACK_BASE_MULTIPLIER),
            per_opportunity_cap: Some(round2(item.total * PIGGYBACK_CAP_FRACTION)),
        },
    }
}

/// Per-item balance rows and the lot summary for one (contract, lot, class).
///
/// `exclude` removes one opportunity's own lines from consumption (used while
/// that opportunity is being edited).
pub fn compute_balance(
    contract: &Contract,
    lot: &Lot,
    class: AllocationClass,
    opportunities: &[Opportunity],
    exclude: Option<OpportunityId>,
) -> Result<BalanceReport, BalanceError> {
    if lot.contract_id != contract.id || contract.lot(lot.id).is_none() {
        return Err(BalanceError::LotNotInContract {
            lot_id: lot.id,
            contract_id: contract.id,
        });
    }

    let consumed_by_item = committed_by_item(opportunities, contract, lot.id, class, exclude);

    let mut items = lot.items.clone();
    sort_by_item_number(&mut items);

    let mut summary = BalanceSummary::default();
    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let base = item_quota(&item, class).base;
        let consumed = consumed_by_item.get(&item.id).copied().unwrap_or(0.0);
        let remaining = round2(base - consumed);

        summary.base += base;
        summary.consumed += consumed;
        summary.remaining += remaining;

        rows.push(BalanceRow {
            item,
            base,
            consumed,
            remaining,
        });
    }

    Ok(BalanceReport {
        contract_id: contract.id,
        lot_id: lot.id,
        class,
        rows,
        summary: BalanceSummary {
            base: round2(summary.base),
            consumed: round2(summary.consumed),
            remaining: round2(summary.remaining),
        },
    })
}

/// Validate one proposed quantity for `item` against what is currently left.
///
/// - PARTICIPANT: rejected when `quantity > remaining + ε`
/// - PIGGYBACK: rejected when `quantity > cap + ε` OR `quantity > remaining + ε`
///
/// Both piggyback violations are reported when both apply.
pub fn validate_proposed_quantity(
    contract: &Contract,
    item: &CatalogItem,
    class: AllocationClass,
    quantity: f64,
    opportunities: &[Opportunity],
    exclude: Option<OpportunityId>,
) -> QuantityCheck {
    if contract.find_item(item.id).is_none() {
        return QuantityCheck::rejected(vec![BalanceViolation::UnknownItem { item_id: item.id }], 0.0);
    }

    let quota = item_quota(item, class);
    let consumed = committed_quantity(opportunities, contract, item.lot_id, item.id, class, exclude);
    let remaining = round2(quota.base - consumed);

    if !quantity.is_finite() || quantity < 1.0 {
        return QuantityCheck::rejected(vec![BalanceViolation::BadQuantity { quantity }], remaining);
    }

    let mut violations = Vec::new();
    if let Some(cap) = quota.per_opportunity_cap {
        if quantity > cap + EPSILON {
            violations.push(BalanceViolation::ExceedsPerOpportunityCap { quantity, cap });
        }
    }
    if quantity > remaining + EPSILON {
        violations.push(BalanceViolation::ExceedsRemaining {
            quantity,
            remaining,
        });
    }

    if violations.is_empty() {
        QuantityCheck::accepted(remaining)
    } else {
        QuantityCheck::rejected(violations, remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arp_schemas::{ClientId, LotId, Pricing, SupplyType};

    fn item(total: f64) -> CatalogItem {
        CatalogItem::new(
            LotId::generate(),
            "1",
            "Notebook",
            "UNIDADE",
            total,
            Pricing::OneOff { unit_price: 10.0 },
        )
    }

    #[test]
    fn participant_quota_is_one_ceiling_without_cap() {
        let q = item_quota(&item(100.0), AllocationClass::Participant);
        assert_eq!(q.base, 100.0);
        assert_eq!(q.per_opportunity_cap, None);
    }

    #[test]
    fn piggyback_quota_is_double_with_half_cap() {
        let q = item_quota(&item(100.0), AllocationClass::Piggyback);
        assert_eq!(q.base, 200.0);
        assert_eq!(q.per_opportunity_cap, Some(50.0));
    }

    #[test]
    fn odd_ceiling_keeps_fractional_cap() {
        let q = item_quota(&item(101.0), AllocationClass::Piggyback);
        assert_eq!(q.base, 202.0);
        assert_eq!(q.per_opportunity_cap, Some(50.5));
    }

    #[test]
    fn lot_from_another_contract_is_refused() {
        let contract = Contract::new("ARP", ClientId::generate());
        let lot = Lot::new(contract.id, "Lote 1", SupplyType::Supply);
        let err = compute_balance(&contract, &lot, AllocationClass::Participant, &[], None)
            .unwrap_err();
        assert!(matches!(err, BalanceError::LotNotInContract { .. }));
    }
}
