use arp_balance::*;
use arp_schemas::*;

fn setup() -> (Contract, CatalogItem, ClientId, ClientId) {
    let participant = ClientId::generate();
    let outsider = ClientId::generate();
    let mut contract = Contract::new("ARP 07/2026", ClientId::generate());
    contract.participants.insert(participant);

    let mut lot = Lot::new(contract.id, "Lote 2", SupplyType::Supply);
    let item = CatalogItem::new(
        lot.id,
        "2.1",
        "Impressora",
        "UNIDADE",
        100.0,
        Pricing::OneOff { unit_price: 1200.0 },
    );
    lot.items.push(item.clone());
    contract.lots.push(lot);
    (contract, item, participant, outsider)
}

fn won(contract: &Contract, item: &CatalogItem, client: ClientId, qty: f64) -> Opportunity {
    let mut o = Opportunity::new(1, contract.id, client);
    o.status = OpportunityStatus::Won;
    o.lines
        .push(OpportunityLine::direct(item.lot_id, item.id, qty));
    o
}

#[test]
fn scenario_cap_blocks_even_when_shared_pool_allows() {
    let (contract, item, _participant, outsider) = setup();
    let opps = vec![won(&contract, &item, outsider, 45.0)];
    let lot = contract.lot(item.lot_id).unwrap();

    let report =
        compute_balance(&contract, lot, AllocationClass::Piggyback, &opps, None).unwrap();
    let row = report.row(item.id).unwrap();
    assert_eq!(row.base, 200.0);
    assert_eq!(row.consumed, 45.0);
    assert_eq!(row.remaining, 155.0);

    let check = validate_proposed_quantity(
        &contract,
        &item,
        AllocationClass::Piggyback,
        51.0,
        &opps,
        None,
    );
    assert!(!check.ok);
    assert_eq!(
        check.violations,
        vec![BalanceViolation::ExceedsPerOpportunityCap {
            quantity: 51.0,
            cap: 50.0
        }]
    );

    let at_cap = validate_proposed_quantity(
        &contract,
        &item,
        AllocationClass::Piggyback,
        50.0,
        &opps,
        None,
    );
    assert!(at_cap.ok);
}

#[test]
fn piggyback_enforces_min_of_cap_and_remaining() {
    let (contract, item, _participant, outsider) = setup();
    // 4 × 45 = 180 consumed; 20 left in the shared pool.
    let opps: Vec<Opportunity> = (0..4)
        .map(|_| won(&contract, &item, outsider, 45.0))
        .collect();

    let over_remaining = validate_proposed_quantity(
        &contract,
        &item,
        AllocationClass::Piggyback,
        21.0,
        &opps,
        None,
    );
    assert!(!over_remaining.ok);
    assert_eq!(over_remaining.remaining, 20.0);
    assert!(matches!(
        over_remaining.violations.as_slice(),
        [BalanceViolation::ExceedsRemaining { .. }]
    ));

    let both = validate_proposed_quantity(
        &contract,
        &item,
        AllocationClass::Piggyback,
        60.0,
        &opps,
        None,
    );
    assert_eq!(both.violations.len(), 2);

    let fits = validate_proposed_quantity(
        &contract,
        &item,
        AllocationClass::Piggyback,
        20.0,
        &opps,
        None,
    );
    assert!(fits.ok);
}

#[test]
fn participant_consumption_does_not_touch_piggyback_pool() {
    let (contract, item, participant, _outsider) = setup();
    let opps = vec![won(&contract, &item, participant, 100.0)];
    let lot = contract.lot(item.lot_id).unwrap();

    let pig = compute_balance(&contract, lot, AllocationClass::Piggyback, &opps, None).unwrap();
    assert_eq!(pig.rows[0].remaining, 200.0);

    let part =
        compute_balance(&contract, lot, AllocationClass::Participant, &opps, None).unwrap();
    assert_eq!(part.rows[0].remaining, 0.0);
}

#[test]
fn participant_has_no_per_opportunity_cap() {
    let (contract, item, _participant, _outsider) = setup();
    let check = validate_proposed_quantity(
        &contract,
        &item,
        AllocationClass::Participant,
        100.0,
        &[],
        None,
    );
    assert!(check.ok);
}

#[test]
fn class_follows_participant_set() {
    let (contract, _item, participant, outsider) = setup();
    assert_eq!(
        AllocationClass::for_client(&contract, participant),
        AllocationClass::Participant
    );
    assert_eq!(
        AllocationClass::for_client(&contract, outsider),
        AllocationClass::Piggyback
    );
}
