use arp_balance::*;
use arp_schemas::*;

fn contract_with_items(totals: &[(&str, f64)]) -> (Contract, LotId, Vec<CatalogItem>) {
    let mut contract = Contract::new("ARP 11/2026", ClientId::generate());
    let mut lot = Lot::new(contract.id, "Lote 1", SupplyType::Supply);
    let items: Vec<CatalogItem> = totals
        .iter()
        .map(|(n, t)| {
            CatalogItem::new(
                lot.id,
                *n,
                format!("Item {n}"),
                "UNIDADE",
                *t,
                Pricing::OneOff { unit_price: 10.0 },
            )
        })
        .collect();
    lot.items = items.clone();
    let lot_id = lot.id;
    contract.lots.push(lot);
    (contract, lot_id, items)
}

#[test]
fn scenario_any_line_in_violation_blocks_commit() {
    let (contract, lot_id, items) = contract_with_items(&[("1", 100.0), ("2", 10.0)]);
    let outsider = ClientId::generate();

    let mut draft = Opportunity::new(2, contract.id, outsider);
    draft
        .lines
        .push(OpportunityLine::direct(lot_id, items[0].id, 30.0));
    draft
        .lines
        .push(OpportunityLine::direct(lot_id, items[1].id, 6.0)); // cap is 5

    let gate = check_opportunity(&contract, &draft, &[draft.clone()]).unwrap();
    assert!(!gate.is_permitted());
    let bad: Vec<_> = gate.violations().collect();
    assert_eq!(bad.len(), 1);
    assert_eq!(bad[0].index, 1);
    assert_eq!(bad[0].requested, 6.0);
    // never clamped
    assert_eq!(draft.lines[1].quantity, 6.0);
}

#[test]
fn kit_and_direct_lines_on_same_item_are_checked_together() {
    let (contract, lot_id, items) = contract_with_items(&[("1", 100.0)]);
    let outsider = ClientId::generate();

    let mut draft = Opportunity::new(3, contract.id, outsider);
    draft
        .lines
        .push(OpportunityLine::direct(lot_id, items[0].id, 30.0));
    draft.lines.push(OpportunityLine::from_kit(
        KitId::generate(),
        lot_id,
        items[0].id,
        25.0,
    ));

    let gate = check_opportunity(&contract, &draft, &[]).unwrap();
    assert!(!gate.is_permitted());
    assert!(gate.lines().iter().all(|l| l.requested == 55.0));
}

#[test]
fn won_opportunity_being_edited_does_not_block_itself() {
    let (contract, lot_id, items) = contract_with_items(&[("1", 100.0)]);
    let participant = ClientId::generate();
    let mut contract = contract;
    contract.participants.insert(participant);

    let mut deal = Opportunity::new(4, contract.id, participant);
    deal.status = OpportunityStatus::Won;
    deal.lines
        .push(OpportunityLine::direct(lot_id, items[0].id, 100.0));

    let gate = check_opportunity(&contract, &deal, &[deal.clone()]).unwrap();
    assert!(gate.is_permitted());
}

#[test]
fn unknown_item_and_foreign_contract_are_reported() {
    let (contract, lot_id, _items) = contract_with_items(&[("1", 100.0)]);
    let mut draft = Opportunity::new(5, contract.id, ClientId::generate());
    draft
        .lines
        .push(OpportunityLine::direct(lot_id, ItemId::generate(), 1.0));
    let gate = check_opportunity(&contract, &draft, &[]).unwrap();
    assert!(matches!(
        gate.lines()[0].check.violations.as_slice(),
        [BalanceViolation::UnknownItem { .. }]
    ));

    let foreign = Opportunity::new(6, ContractId::generate(), ClientId::generate());
    assert!(matches!(
        check_opportunity(&contract, &foreign, &[]),
        Err(BalanceError::OpportunityNotInContract { .. })
    ));
}

#[test]
fn rows_are_sorted_by_dotted_item_number() {
    let (contract, lot_id, _items) =
        contract_with_items(&[("1.10", 1.0), ("1.9", 1.0), ("2", 1.0), ("1.1", 1.0)]);
    let lot = contract.lot(lot_id).unwrap();
    let report =
        compute_balance(&contract, lot, AllocationClass::Participant, &[], None).unwrap();
    let numbers: Vec<&str> = report.rows.iter().map(|r| r.item.number.as_str()).collect();
    assert_eq!(numbers, vec!["1.1", "1.9", "1.10", "2"]);
    assert_eq!(report.summary.base, 4.0);
}
