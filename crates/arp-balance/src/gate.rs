//! Commit gate for a whole opportunity.
//!
//! Every line of the opportunity is checked against the balance left by all
//! *other* WON opportunities (the opportunity under edit is excluded from
//! consumption). Lines on the same (lot, item) are checked together, since
//! the piggyback cap applies per opportunity, not per line.
//!
//! Commit may not proceed unless [`CommitGate::Permitted`] is returned. The
//! gate never adjusts quantities.

use std::collections::BTreeMap;

use arp_schemas::{Contract, ItemId, LotId, Opportunity};

use crate::{validate_proposed_quantity, AllocationClass, BalanceError, BalanceViolation, QuantityCheck};

/// Verdict for one line of the opportunity.
#[derive(Clone, Debug, PartialEq)]
pub struct LineVerdict {
    /// Index into `Opportunity.lines`.
    pub index: usize,
    pub lot_id: LotId,
    pub item_id: ItemId,
    /// Total requested by this opportunity for the line's (lot, item).
    pub requested: f64,
    pub check: QuantityCheck,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CommitGate {
    Permitted { lines: Vec<LineVerdict> },
    /// At least one line is in violation. `lines` carries every verdict.
    Blocked { lines: Vec<LineVerdict> },
}

impl CommitGate {
    pub fn is_permitted(&self) -> bool {
        matches!(self, CommitGate::Permitted { .. })
    }

    pub fn lines(&self) -> &[LineVerdict] {
        match self {
            CommitGate::Permitted { lines } | CommitGate::Blocked { lines } => lines,
        }
    }

    /// Only the lines in violation.
    pub fn violations(&self) -> impl Iterator<Item = &LineVerdict> {
        self.lines().iter().filter(|l| !l.check.ok)
    }
}

/// Check every line of `opportunity` before it is committed.
pub fn check_opportunity(
    contract: &Contract,
    opportunity: &Opportunity,
    all_opportunities: &[Opportunity],
) -> Result<CommitGate, BalanceError> {
    if opportunity.contract_id != contract.id {
        return Err(BalanceError::OpportunityNotInContract {
            opportunity_id: opportunity.id,
            contract_id: contract.id,
        });
    }

    let class = AllocationClass::for_client(contract, opportunity.client_id);

    // One check per (lot, item); every line on it shares the verdict.
    let mut checks: BTreeMap<(LotId, ItemId), (f64, QuantityCheck)> = BTreeMap::new();
    let mut lines = Vec::with_capacity(opportunity.lines.len());
    let mut blocked = false;

    for (index, line) in opportunity.lines.iter().enumerate() {
        let (requested, mut check) = checks
            .entry((line.lot_id, line.item_id))
            .or_insert_with(|| {
                let requested = opportunity.quantity_for(line.lot_id, line.item_id);
                let check = match contract
                    .lot(line.lot_id)
                    .and_then(|lot| lot.item(line.item_id))
                {
                    Some(item) => validate_proposed_quantity(
                        contract,
                        item,
                        class,
                        requested,
                        all_opportunities,
                        Some(opportunity.id),
                    ),
                    None => QuantityCheck::rejected(
                        vec![BalanceViolation::UnknownItem {
                            item_id: line.item_id,
                        }],
                        0.0,
                    ),
                };
                (requested, check)
            })
            .clone();

        if line.validate().is_err() {
            check.ok = false;
            check.violations.push(BalanceViolation::BadQuantity {
                quantity: line.quantity,
            });
        }
        blocked |= !check.ok;
        lines.push(LineVerdict {
            index,
            lot_id: line.lot_id,
            item_id: line.item_id,
            requested,
            check,
        });
    }

    Ok(if blocked {
        CommitGate::Blocked { lines }
    } else {
        CommitGate::Permitted { lines }
    })
}
