use std::fs;

use anyhow::{Context, Result};
use arp_config::{ImportSettings, LoadedConfig};
use arp_import::{apply, decode_all, error_report_csv, template_csv, ApplyBlocked, MergePolicy, RowError};
use arp_schemas::{ContractId, LotId};
use arp_store::{replace_lot_items, require_admin, Role, SnapshotStore};
use tracing::info;

use super::{find_contract, find_lot, parse_id};

pub struct ImportArgs<'a> {
    pub contract: &'a str,
    pub lot: &'a str,
    pub file: &'a str,
    pub role: Role,
    pub policy: Option<&'a str>,
    pub strict: bool,
    pub dry_run: bool,
    pub error_report: Option<&'a str>,
}

fn write_error_report(path: Option<&str>, errors: &[RowError]) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let csv = error_report_csv(errors)?;
    fs::write(path, csv).with_context(|| format!("write error report failed: {path}"))?;
    println!("error_report={path}");
    Ok(())
}

pub fn run_import(
    store: &mut dyn SnapshotStore,
    config: &LoadedConfig,
    args: ImportArgs<'_>,
) -> Result<()> {
    if !args.dry_run {
        require_admin(args.role, "apply an import")?;
    }

    let mut settings = ImportSettings::from_config_json(&config.config_json)?;
    if let Some(raw) = args.policy {
        settings.policy = MergePolicy::parse(raw).with_context(|| {
            format!("invalid --policy '{raw}'. expected one of: UPSERT | INSERT_ONLY | REPLACE_ALL")
        })?;
    }
    settings.strict |= args.strict;
    let options = settings.to_options();

    let contract_id: ContractId = parse_id(args.contract, "contract")?;
    let lot_id: LotId = parse_id(args.lot, "lot")?;
    let text = fs::read_to_string(args.file)
        .with_context(|| format!("read import file failed: {}", args.file))?;

    let snap = store.load()?;
    let contract = find_contract(&snap, contract_id)?;
    let lot = find_lot(contract, lot_id)?;

    info!(
        config_hash = %config.config_hash,
        policy = options.policy.as_str(),
        strict = options.strict,
        dry_run = args.dry_run,
        "import started"
    );

    let report = decode_all(&text, lot.supply_type, options.chunk_size)
        .map_err(ApplyBlocked::from)?;
    println!("policy={}", options.policy.as_str());
    println!(
        "rows_read={} accepted={} rejected={} errors={}",
        report.rows_read,
        report.accepted.len(),
        report.rows_rejected,
        report.errors.len()
    );
    if !report.is_clean() {
        write_error_report(args.error_report, &report.errors)?;
    }

    let outcome = apply(&report, &lot.items, lot, options.policy, options.strict)?;
    let c = outcome.counters;
    println!("inserted={} updated={} ignored={}", c.inserted, c.updated, c.ignored);

    if args.dry_run {
        println!("applied=false");
        return Ok(());
    }

    let next = replace_lot_items(&snap, contract_id, lot_id, outcome.items)?;
    store.replace(next)?;
    println!("applied=true");
    Ok(())
}

pub fn run_template(out: Option<&str>) -> Result<()> {
    let csv = template_csv()?;
    match out {
        Some(path) => {
            fs::write(path, csv).with_context(|| format!("write template failed: {path}"))?;
            println!("template={path}");
        }
        None => print!("{csv}"),
    }
    Ok(())
}
