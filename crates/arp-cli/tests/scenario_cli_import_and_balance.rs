use arp_schemas::*;
use arp_store::*;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

struct World {
    dir: tempfile::TempDir,
    snapshot: String,
    contract_id: ContractId,
    lot_id: LotId,
    item_id: ItemId,
    participant: ClientId,
}

fn world() -> World {
    let owner = Client::new("Governo do Estado", "11222333000144", "Natal", Sphere::State).unwrap();
    let participant = Client::new("Prefeitura", "22333444000155", "Parnamirim", Sphere::Municipal).unwrap();
    let (owner_id, participant_id) = (owner.id, participant.id);
    let snap = add_client(&Snapshot::default(), owner).unwrap();
    let snap = add_client(&snap, participant).unwrap();

    let mut contract = Contract::new("ARP 05/2026", owner_id);
    contract.participants.insert(participant_id);
    let mut lot = Lot::new(contract.id, "Lote 1", SupplyType::Supply);
    let item = CatalogItem::new(lot.id, "1", "Notebook", "UNIDADE", 100.0, Pricing::OneOff { unit_price: 4500.0 });
    let (lot_id, item_id) = (lot.id, item.id);
    lot.items.push(item);
    contract.lots.push(lot);
    let contract_id = contract.id;
    let snap = add_contract(&snap, contract).unwrap();

    let (snap, opp) = add_opportunity(
        &snap,
        contract_id,
        participant_id,
        vec![OpportunityLine::direct(lot_id, item_id, 40.0)],
    )
    .unwrap();
    let snap = set_opportunity_status(&snap, opp, OpportunityStatus::Won).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arp.json");
    JsonFileStore::new(&path).replace(snap).unwrap();

    World {
        snapshot: path.to_string_lossy().to_string(),
        dir,
        contract_id,
        lot_id,
        item_id,
        participant: participant_id,
    }
}

fn arp(w: &World) -> Command {
    let mut cmd = Command::cargo_bin("arp").unwrap();
    cmd.env_remove("ARP_CONFIG")
        .env("RUST_LOG", "warn")
        .arg("--snapshot")
        .arg(&w.snapshot);
    cmd
}

fn import_target(w: &World, file: &std::path::Path) -> Vec<String> {
    vec![
        "import".to_string(),
        "--contract".to_string(),
        w.contract_id.to_string(),
        "--lot".to_string(),
        w.lot_id.to_string(),
        "--file".to_string(),
        file.to_string_lossy().to_string(),
    ]
}

#[test]
fn balance_reports_remaining_for_participant() {
    let w = world();
    arp(&w)
        .arg("balance")
        .args(["--contract".to_string(), w.contract_id.to_string()])
        .args(["--lot".to_string(), w.lot_id.to_string()])
        .args(["--client".to_string(), w.participant.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("class=PARTICIPANT"))
        .stdout(predicate::str::contains("item=1 base=100 consumed=40 remaining=60"));
}

#[test]
fn validate_qty_rejects_over_remaining_and_accepts_exact() {
    let w = world();
    let base = [
        "validate-qty".to_string(),
        "--contract".to_string(),
        w.contract_id.to_string(),
        "--item".to_string(),
        w.item_id.to_string(),
        "--class".to_string(),
        "PARTICIPANT".to_string(),
    ];

    arp(&w)
        .args(&base)
        .args(["--qty", "61"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("ok=false"))
        .stderr(predicate::str::contains("QUANTITY_REJECTED"));

    arp(&w)
        .args(&base)
        .args(["--qty", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok=true"));
}

#[test]
fn import_requires_admin_unless_dry_run() {
    let w = world();
    let file = w.dir.path().join("itens.csv");
    std::fs::write(&file, "Item;Especificacao;Unid;Total;ValorUnitario\n2;Mouse;UNID;10;35,90\n").unwrap();
    let target = import_target(&w, &file);

    arp(&w)
        .args(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("admin required"));

    arp(&w)
        .args(&target)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("inserted=1 updated=0 ignored=0"))
        .stdout(predicate::str::contains("applied=false"));

    arp(&w)
        .args(&target)
        .args(["--role", "ADMIN"])
        .assert()
        .success()
        .stdout(predicate::str::contains("applied=true"));

    let snap = JsonFileStore::new(&w.snapshot).load().unwrap();
    let lot = snap.contract(w.contract_id).unwrap().lot(w.lot_id).unwrap();
    let numbers: Vec<&str> = lot.items.iter().map(|i| i.number.as_str()).collect();
    assert_eq!(numbers, vec!["1", "2"]);
    // The consumed item kept its identity, so its WON line survived.
    assert_eq!(snap.opportunities[0].lines.len(), 1);
}

#[test]
fn strict_import_blocks_and_writes_error_report() {
    let w = world();
    let file = w.dir.path().join("itens.csv");
    std::fs::write(
        &file,
        "Item;Especificacao;Unid;Total;ValorUnitario\n2;Mouse;UNID;10;35,90\n3;Teclado;UNID;zero;50\n",
    )
    .unwrap();
    let report = w.dir.path().join("erros.csv");

    arp(&w)
        .args(import_target(&w, &file))
        .args(["--role", "admin", "--strict"])
        .arg("--error-report")
        .arg(&report)
        .assert()
        .failure()
        .stderr(predicate::str::contains("strict mode"));

    let csv = std::fs::read_to_string(&report).unwrap();
    assert_eq!(csv, "Linha;Campo;Motivo\n3;Total;número inválido: 'zero'\n");

    let snap = JsonFileStore::new(&w.snapshot).load().unwrap();
    assert_eq!(snap.contract(w.contract_id).unwrap().lot(w.lot_id).unwrap().items.len(), 1);
}

#[test]
fn config_policy_applies_and_flag_overrides_it() {
    let w = world();
    let file = w.dir.path().join("itens.csv");
    std::fs::write(&file, "Item;Especificacao;Unid;Total;ValorUnitario\n1;Notebook i5;UNID;120;4200\n").unwrap();
    let cfg = w.dir.path().join("arp.yaml");
    std::fs::write(&cfg, "import:\n  policy: INSERT_ONLY\n").unwrap();

    let run = |extra: &[&str]| {
        let mut cmd = arp(&w);
        cmd.arg("--config")
            .arg(&cfg)
            .args(import_target(&w, &file))
            .arg("--dry-run")
            .args(extra);
        cmd.assert()
    };

    run(&[])
        .success()
        .stdout(predicate::str::contains("policy=INSERT_ONLY"))
        .stdout(predicate::str::contains("inserted=0 updated=0 ignored=1"));

    run(&["--policy", "upsert"])
        .success()
        .stdout(predicate::str::contains("inserted=0 updated=1 ignored=0"));
}

#[test]
fn template_and_config_hash_print_to_stdout() {
    let w = world();
    arp(&w)
        .arg("template")
        .assert()
        .success()
        .stdout("Item;Especificacao;Unid;Total;ValorUnitario\n");

    let cfg = w.dir.path().join("base.yaml");
    std::fs::write(&cfg, "store:\n  path: arp.json\n").unwrap();
    arp(&w)
        .arg("config-hash")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("config_hash="))
        .stdout(predicate::str::contains(r#"{"store":{"path":"arp.json"}}"#));
}
