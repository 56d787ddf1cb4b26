//! Command handlers for the `arp` binary.
//!
//! Shared plumbing (config loading, snapshot lookup, id parsing) lives here;
//! each submodule owns one command family.

pub mod balance;
pub mod import;

use anyhow::{bail, Context, Result};
use arp_config::{
    load_layered_yaml, report_unused_keys, ConfigMode, LoadedConfig, StoreSettings, UnusedKeyPolicy,
};
use arp_schemas::{Contract, ContractId, Lot, LotId};
use arp_store::{JsonFileStore, Snapshot};
use std::str::FromStr;
use tracing::warn;

/// Snapshot file used when neither `--snapshot` nor `/store/path` is set.
pub const DEFAULT_SNAPSHOT_PATH: &str = "arp.json";

/// Load the layered config (possibly no layers) and warn on keys `mode`
/// does not read.
pub fn load_config(paths: &[String], mode: ConfigMode) -> Result<LoadedConfig> {
    let loaded = if paths.is_empty() {
        LoadedConfig::empty()?
    } else {
        let refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
        load_layered_yaml(&refs)?
    };

    let report = report_unused_keys(mode, &loaded.config_json, UnusedKeyPolicy::Warn)?;
    for leaf in &report.unused_leaf_pointers {
        warn!(mode = mode.as_str(), key = %leaf, "unused config key");
    }
    Ok(loaded)
}

/// `--snapshot` wins, then `/store/path`, then [`DEFAULT_SNAPSHOT_PATH`].
pub fn open_store(flag: Option<&str>, config: &LoadedConfig) -> Result<JsonFileStore> {
    let path = match flag {
        Some(p) => p.to_string(),
        None => StoreSettings::from_config_json(&config.config_json)?
            .path
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_PATH.to_string()),
    };
    Ok(JsonFileStore::new(path))
}

pub fn parse_id<T>(raw: &str, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(raw).with_context(|| format!("invalid {what} id '{raw}'"))
}

pub fn find_contract(snap: &Snapshot, id: ContractId) -> Result<&Contract> {
    match snap.contract(id) {
        Some(c) => Ok(c),
        None => bail!("contract {id} not found in snapshot"),
    }
}

pub fn find_lot(contract: &Contract, id: LotId) -> Result<&Lot> {
    match contract.lot(id) {
        Some(l) => Ok(l),
        None => bail!("lot {id} not found in contract {}", contract.id),
    }
}

/// Format a quantity or amount without trailing noise ("60", "50.5").
pub fn fmt_num(v: f64) -> String {
    format!("{}", arp_schemas::round2(v))
}
