//! Read-only balance queries plus the WON transition, which is gated on them.

use anyhow::{bail, Result};
use arp_balance::{check_opportunity, compute_balance, validate_proposed_quantity, AllocationClass};
use arp_schemas::{ClientId, ContractId, ItemId, LotId, OpportunityId, OpportunityStatus};
use arp_store::{set_opportunity_status, SnapshotStore};
use chrono::Local;

use super::{find_contract, find_lot, fmt_num, parse_id};

/// `--class` wins; otherwise the class is resolved from `--client`.
fn resolve_class(
    contract: &arp_schemas::Contract,
    class: Option<&str>,
    client: Option<&str>,
) -> Result<AllocationClass> {
    match (class, client) {
        (Some(raw), _) => match AllocationClass::parse(raw) {
            Some(c) => Ok(c),
            None => bail!("invalid --class '{raw}'. expected one of: PARTICIPANT | PIGGYBACK"),
        },
        (None, Some(raw)) => {
            let client_id: ClientId = parse_id(raw, "client")?;
            Ok(AllocationClass::for_client(contract, client_id))
        }
        (None, None) => bail!("one of --class or --client is required"),
    }
}

pub fn run_balance(
    store: &dyn SnapshotStore,
    contract: &str,
    lot: &str,
    class: Option<&str>,
    client: Option<&str>,
) -> Result<()> {
    let snap = store.load()?;
    let contract_id: ContractId = parse_id(contract, "contract")?;
    let lot_id: LotId = parse_id(lot, "lot")?;
    let contract = find_contract(&snap, contract_id)?;
    let lot = find_lot(contract, lot_id)?;
    let class = resolve_class(contract, class, client)?;

    let opportunities = snap.opportunities_for(contract_id);
    let report = compute_balance(contract, lot, class, &opportunities, None)?;

    println!("contract_id={}", contract.id);
    println!("contract_status={}", contract.status(Local::now().date_naive()).as_str());
    println!("lot_id={} supply_type={}", lot.id, lot.supply_type.as_str());
    println!("class={}", class.as_str());
    for row in &report.rows {
        println!(
            "item={} base={} consumed={} remaining={}",
            row.item.number,
            fmt_num(row.base),
            fmt_num(row.consumed),
            fmt_num(row.remaining)
        );
    }
    println!(
        "summary base={} consumed={} remaining={}",
        fmt_num(report.summary.base),
        fmt_num(report.summary.consumed),
        fmt_num(report.summary.remaining)
    );
    Ok(())
}

pub struct ValidateQtyArgs<'a> {
    pub contract: &'a str,
    pub item: &'a str,
    pub qty: f64,
    pub class: Option<&'a str>,
    pub client: Option<&'a str>,
    pub exclude: Option<&'a str>,
}

pub fn run_validate_qty(store: &dyn SnapshotStore, args: ValidateQtyArgs<'_>) -> Result<()> {
    let snap = store.load()?;
    let contract_id: ContractId = parse_id(args.contract, "contract")?;
    let item_id: ItemId = parse_id(args.item, "item")?;
    let exclude: Option<OpportunityId> = args
        .exclude
        .map(|raw| parse_id(raw, "opportunity"))
        .transpose()?;
    let contract = find_contract(&snap, contract_id)?;
    let class = resolve_class(contract, args.class, args.client)?;

    let Some((_, item)) = contract.find_item(item_id) else {
        bail!("item {item_id} not found in contract {contract_id}");
    };

    let opportunities = snap.opportunities_for(contract_id);
    let check = validate_proposed_quantity(contract, item, class, args.qty, &opportunities, exclude);

    println!("item={} class={} quantity={}", item.number, class.as_str(), fmt_num(args.qty));
    println!("remaining={}", fmt_num(check.remaining));
    println!("ok={}", check.ok);
    if let Some(reason) = check.reason() {
        println!("reason={reason}");
        bail!("QUANTITY_REJECTED: {reason}");
    }
    Ok(())
}

pub fn run_check_opportunity(store: &dyn SnapshotStore, opportunity: &str) -> Result<()> {
    let snap = store.load()?;
    let opportunity_id: OpportunityId = parse_id(opportunity, "opportunity")?;
    let Some(opp) = snap.opportunity(opportunity_id) else {
        bail!("opportunity {opportunity_id} not found in snapshot");
    };
    let contract = find_contract(&snap, opp.contract_id)?;

    let gate = check_opportunity(contract, opp, &snap.opportunities)?;
    println!("opportunity={} code={}", opp.id, opp.code);
    for verdict in gate.lines() {
        let number = contract
            .find_item(verdict.item_id)
            .map(|(_, i)| i.number.as_str())
            .unwrap_or("?");
        match verdict.check.reason() {
            None => println!(
                "line={} item={} requested={} ok=true",
                verdict.index,
                number,
                fmt_num(verdict.requested)
            ),
            Some(reason) => println!(
                "line={} item={} requested={} ok=false reason={}",
                verdict.index,
                number,
                fmt_num(verdict.requested),
                reason
            ),
        }
    }
    println!("can_commit={}", gate.is_permitted());
    Ok(())
}

pub fn run_set_status(store: &mut dyn SnapshotStore, opportunity: &str, status: &str) -> Result<()> {
    let opportunity_id: OpportunityId = parse_id(opportunity, "opportunity")?;
    let Some(status) = OpportunityStatus::parse(status) else {
        bail!("invalid --status '{status}'. expected one of: OPEN | WON | LOST");
    };

    let snap = store.load()?;
    let next = set_opportunity_status(&snap, opportunity_id, status)?;
    store.replace(next)?;
    println!("opportunity={opportunity_id} status={}", status.as_str());
    Ok(())
}
