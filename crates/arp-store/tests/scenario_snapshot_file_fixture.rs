use arp_balance::{compute_balance, AllocationClass};
use arp_schemas::*;
use arp_store::*;
use serde_json::json;

const OWNER: &str = "00000000-0000-4000-8000-000000000001";
const CARONA: &str = "00000000-0000-4000-8000-000000000002";
const CONTRACT: &str = "00000000-0000-4000-8000-000000000010";
const LOT: &str = "00000000-0000-4000-8000-000000000020";
const ITEM: &str = "00000000-0000-4000-8000-000000000030";

fn fixture() -> serde_json::Value {
    json!({
        "clients": [
            { "id": OWNER, "name": "Estado", "tax_id": "11222333000144", "city": "Natal", "sphere": "STATE" },
            { "id": CARONA, "name": "Município", "tax_id": "22333444000155", "city": "Caicó", "sphere": "MUNICIPAL" }
        ],
        "contracts": [{
            "id": CONTRACT,
            "title": "ARP 02/2026",
            "owner_client_id": OWNER,
            "expires_on": "2027-03-31",
            "participants": [OWNER],
            "lots": [{
                "id": LOT,
                "contract_id": CONTRACT,
                "name": "Manutenção",
                "supply_type": "MAINTENANCE",
                "items": [{
                    "id": ITEM,
                    "lot_id": LOT,
                    "number": "1",
                    "name": "Manutenção preventiva",
                    "description": "",
                    "official_description": "",
                    "unit": "MES",
                    "total": 12.0,
                    "pricing": "MONTHLY",
                    "monthly_price": 900.0,
                    "sub_kind": "SERVICE"
                }]
            }]
        }],
        "opportunities": [{
            "id": "00000000-0000-4000-8000-000000000040",
            "code": 1,
            "contract_id": CONTRACT,
            "client_id": CARONA,
            "status": "WON",
            "lines": [{ "lot_id": LOT, "item_id": ITEM, "quantity": 6.0 }]
        }]
    })
}

#[test]
fn hand_written_snapshot_file_loads_and_balances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arp.json");
    std::fs::write(&path, serde_json::to_string_pretty(&fixture()).unwrap()).unwrap();

    let snap = JsonFileStore::new(&path).load().unwrap();
    assert!(snap.kits.is_empty());

    let contract_id: ContractId = CONTRACT.parse().unwrap();
    let lot_id: LotId = LOT.parse().unwrap();
    let contract = snap.contract(contract_id).unwrap();
    let lot = contract.lot(lot_id).unwrap();
    assert_eq!(lot.items[0].line_value(), 10_800.0);
    assert!(lot.items[0].equipment_cost() == 0.0);

    let report = compute_balance(contract, lot, AllocationClass::Piggyback, &snap.opportunities, None).unwrap();
    assert_eq!(report.summary.base, 24.0);
    assert_eq!(report.summary.consumed, 6.0);
    assert_eq!(report.summary.remaining, 18.0);

    let participants =
        compute_balance(contract, lot, AllocationClass::Participant, &snap.opportunities, None).unwrap();
    assert_eq!(participants.summary.consumed, 0.0);
}

#[test]
fn deleting_referenced_client_from_fixture_is_refused() {
    let snap: Snapshot = serde_json::from_value(fixture()).unwrap();
    let carona: ClientId = CARONA.parse().unwrap();
    assert!(matches!(
        delete_client(&snap, carona),
        Err(IntegrityError::ClientReferenced { contracts: 0, opportunities: 1, .. })
    ));
}
