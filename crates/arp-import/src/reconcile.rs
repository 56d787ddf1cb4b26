//! Merge decoded rows into a lot's catalog.
//!
//! Pure: takes the existing item list by reference and returns the next one.
//! Matching is by trimmed item number. Rows are processed in input order,
//! so a number repeated inside one batch matches the item an earlier row
//! created (UPSERT updates it, INSERT_ONLY ignores the repeat).

use std::collections::HashMap;
use std::fmt;

use arp_schemas::{sort_by_item_number, CatalogItem, LotId, Pricing, SupplyType};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::row::CandidateRow;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergePolicy {
    /// Update matching items in place, insert the rest.
    #[default]
    Upsert,
    /// Insert unmatched rows, ignore matches.
    InsertOnly,
    /// Discard the lot's items; every row becomes a new item.
    ReplaceAll,
}

impl MergePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePolicy::Upsert => "UPSERT",
            MergePolicy::InsertOnly => "INSERT_ONLY",
            MergePolicy::ReplaceAll => "REPLACE_ALL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "UPSERT" => Some(MergePolicy::Upsert),
            "INSERT_ONLY" => Some(MergePolicy::InsertOnly),
            "REPLACE_ALL" => Some(MergePolicy::ReplaceAll),
            _ => None,
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeCounters {
    pub inserted: usize,
    pub updated: usize,
    pub ignored: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MergeOutcome {
    /// Next full item list for the lot, sorted by item number.
    pub items: Vec<CatalogItem>,
    pub counters: MergeCounters,
}

fn new_item(row: &CandidateRow, lot_id: LotId, supply_type: SupplyType) -> CatalogItem {
    let mut item = CatalogItem::new(
        lot_id,
        row.number.clone(),
        row.name.clone(),
        row.unit.clone(),
        row.total,
        Pricing::for_supply_type(supply_type, row.price),
    );
    item.description = row.specification.clone();
    item.official_description = row.specification.clone();
    item
}

fn overwrite(item: &mut CatalogItem, row: &CandidateRow) {
    item.name = row.name.clone();
    item.description = row.specification.clone();
    item.official_description = row.specification.clone();
    item.unit = row.unit.clone();
    item.total = row.total;
    item.pricing.set_price(row.price);
}

/// Merge `rows` into `existing` under `policy`.
pub fn reconcile_items(
    rows: &[CandidateRow],
    existing: &[CatalogItem],
    lot_id: LotId,
    supply_type: SupplyType,
    policy: MergePolicy,
) -> MergeOutcome {
    let mut counters = MergeCounters::default();

    let mut items: Vec<CatalogItem> = match policy {
        MergePolicy::ReplaceAll => Vec::with_capacity(rows.len()),
        _ => existing.to_vec(),
    };

    if policy == MergePolicy::ReplaceAll {
        for row in rows {
            items.push(new_item(row, lot_id, supply_type));
            counters.inserted += 1;
        }
    } else {
        // First occurrence of a number wins, as in header mapping.
        let mut by_number: HashMap<String, usize> = HashMap::with_capacity(items.len());
        for (i, it) in items.iter().enumerate() {
            by_number.entry(it.number.trim().to_string()).or_insert(i);
        }

        for row in rows {
            let key = row.number.trim();
            match (by_number.get(key).copied(), policy) {
                (Some(idx), MergePolicy::Upsert) => {
                    overwrite(&mut items[idx], row);
                    counters.updated += 1;
                }
                (Some(_), _) => counters.ignored += 1,
                (None, _) => {
                    by_number.insert(key.to_string(), items.len());
                    items.push(new_item(row, lot_id, supply_type));
                    counters.inserted += 1;
                }
            }
        }
    }

    sort_by_item_number(&mut items);

    info!(
        lot_id = %lot_id,
        policy = policy.as_str(),
        inserted = counters.inserted,
        updated = counters.updated,
        ignored = counters.ignored,
        "import merge computed"
    );

    MergeOutcome { items, counters }
}
