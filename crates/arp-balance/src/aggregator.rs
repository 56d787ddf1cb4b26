//! Opportunity line aggregation.
//!
//! Sums quantities already committed to catalog items across a set of
//! opportunities. Direct lines and kit-expanded lines share one shape and are
//! summed together. Filters, in order:
//!
//! 1. opportunity belongs to the contract
//! 2. status is WON (OPEN and LOST never consume)
//! 3. client class (participant set membership) equals the requested class
//! 4. opportunity is not the excluded in-progress one

use std::collections::BTreeMap;

use arp_schemas::{round2, Contract, ItemId, LotId, Opportunity, OpportunityId};

use crate::AllocationClass;

/// Whether `opp` consumes balance of `contract` under `class`.
pub fn counts_toward(
    opp: &Opportunity,
    contract: &Contract,
    class: AllocationClass,
    exclude: Option<OpportunityId>,
) -> bool {
    opp.contract_id == contract.id
        && opp.is_won()
        && AllocationClass::for_client(contract, opp.client_id) == class
        && exclude != Some(opp.id)
}

/// Committed quantity for one (lot, item) under one class.
pub fn committed_quantity(
    opportunities: &[Opportunity],
    contract: &Contract,
    lot_id: LotId,
    item_id: ItemId,
    class: AllocationClass,
    exclude: Option<OpportunityId>,
) -> f64 {
    let sum: f64 = opportunities
        .iter()
        .filter(|o| counts_toward(o, contract, class, exclude))
        .map(|o| o.quantity_for(lot_id, item_id))
        .sum();
    round2(sum)
}

/// Committed quantity for every item of one lot under one class, in a single
/// pass over the opportunities. Items with no consumption are absent.
pub fn committed_by_item(
    opportunities: &[Opportunity],
    contract: &Contract,
    lot_id: LotId,
    class: AllocationClass,
    exclude: Option<OpportunityId>,
) -> BTreeMap<ItemId, f64> {
    let mut out: BTreeMap<ItemId, f64> = BTreeMap::new();
    for opp in opportunities
        .iter()
        .filter(|o| counts_toward(o, contract, class, exclude))
    {
        for line in opp.lines.iter().filter(|l| l.lot_id == lot_id) {
            *out.entry(line.item_id).or_insert(0.0) += line.quantity;
        }
    }
    for v in out.values_mut() {
        *v = round2(*v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use arp_schemas::{ClientId, KitId, OpportunityLine, OpportunityStatus};

    struct Fixture {
        contract: Contract,
        participant: ClientId,
        outsider: ClientId,
        lot: LotId,
        item: ItemId,
    }

    fn fixture() -> Fixture {
        let participant = ClientId::generate();
        let mut contract = Contract::new("ARP", ClientId::generate());
        contract.participants.insert(participant);
        Fixture {
            contract,
            participant,
            outsider: ClientId::generate(),
            lot: LotId::generate(),
            item: ItemId::generate(),
        }
    }

    fn opp(fx: &Fixture, client: ClientId, status: OpportunityStatus, qty: f64) -> Opportunity {
        let mut o = Opportunity::new(1, fx.contract.id, client);
        o.status = status;
        o.lines.push(OpportunityLine::direct(fx.lot, fx.item, qty));
        o
    }

    #[test]
    fn only_won_opportunities_count() {
        let fx = fixture();
        let opps = vec![
            opp(&fx, fx.participant, OpportunityStatus::Won, 10.0),
            opp(&fx, fx.participant, OpportunityStatus::Open, 20.0),
            opp(&fx, fx.participant, OpportunityStatus::Lost, 30.0),
        ];
        let q = committed_quantity(
            &opps,
            &fx.contract,
            fx.lot,
            fx.item,
            AllocationClass::Participant,
            None,
        );
        assert_eq!(q, 10.0);
    }

    #[test]
    fn classes_are_partitioned_by_participant_set() {
        let fx = fixture();
        let opps = vec![
            opp(&fx, fx.participant, OpportunityStatus::Won, 10.0),
            opp(&fx, fx.outsider, OpportunityStatus::Won, 7.0),
        ];
        let part = committed_quantity(
            &opps,
            &fx.contract,
            fx.lot,
            fx.item,
            AllocationClass::Participant,
            None,
        );
        let pig = committed_quantity(
            &opps,
            &fx.contract,
            fx.lot,
            fx.item,
            AllocationClass::Piggyback,
            None,
        );
        assert_eq!(part, 10.0);
        assert_eq!(pig, 7.0);
    }

    #[test]
    fn excluded_opportunity_does_not_count_against_itself() {
        let fx = fixture();
        let editing = opp(&fx, fx.participant, OpportunityStatus::Won, 40.0);
        let other = opp(&fx, fx.participant, OpportunityStatus::Won, 5.0);
        let exclude = Some(editing.id);
        let opps = vec![editing, other];
        let q = committed_quantity(
            &opps,
            &fx.contract,
            fx.lot,
            fx.item,
            AllocationClass::Participant,
            exclude,
        );
        assert_eq!(q, 5.0);
    }

    #[test]
    fn kit_lines_are_summed_with_direct_lines() {
        let fx = fixture();
        let mut o = opp(&fx, fx.participant, OpportunityStatus::Won, 3.0);
        o.lines
            .push(OpportunityLine::from_kit(KitId::generate(), fx.lot, fx.item, 4.0));
        let by_item = committed_by_item(
            &[o],
            &fx.contract,
            fx.lot,
            AllocationClass::Participant,
            None,
        );
        assert_eq!(by_item.get(&fx.item), Some(&7.0));
    }

    #[test]
    fn other_contracts_are_ignored() {
        let fx = fixture();
        let mut o = opp(&fx, fx.participant, OpportunityStatus::Won, 3.0);
        o.contract_id = Contract::new("other", ClientId::generate()).id;
        let q = committed_quantity(
            &[o],
            &fx.contract,
            fx.lot,
            fx.item,
            AllocationClass::Participant,
            None,
        );
        assert_eq!(q, 0.0);
    }
}
