//! All-or-nothing apply gate.
//!
//! Every blocking condition is checked before the reconciler runs, so a
//! blocked import returns the existing catalog untouched.

use arp_schemas::{CatalogItem, Lot};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApplyBlocked;
use crate::job::{decode_all, DecodeReport, DEFAULT_CHUNK_SIZE};
use crate::reconcile::{reconcile_items, MergeOutcome, MergePolicy};

/// Caller-tunable import behaviour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    pub chunk_size: usize,
    /// Promote any row error into a batch-blocking condition.
    pub strict: bool,
    pub policy: MergePolicy,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            strict: false,
            policy: MergePolicy::Upsert,
        }
    }
}

/// Decode report plus the merge it produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImportResult {
    pub report: DecodeReport,
    pub outcome: MergeOutcome,
}

/// Gate a finished decode and, when permitted, merge it into `existing`.
pub fn apply(
    report: &DecodeReport,
    existing: &[CatalogItem],
    lot: &Lot,
    policy: MergePolicy,
    strict: bool,
) -> Result<MergeOutcome, ApplyBlocked> {
    if strict && !report.errors.is_empty() {
        warn!(
            lot_id = %lot.id,
            errors = report.errors.len(),
            "import blocked: row errors in strict mode"
        );
        return Err(ApplyBlocked::RowErrors {
            count: report.errors.len(),
        });
    }
    if report.accepted.is_empty() {
        warn!(lot_id = %lot.id, "import blocked: no valid rows");
        return Err(ApplyBlocked::NoAcceptedRows);
    }

    Ok(reconcile_items(
        &report.accepted,
        existing,
        lot.id,
        lot.supply_type,
        policy,
    ))
}

/// Decode `text` against `lot` and merge it into the lot's current items.
///
/// The lot itself is not modified; callers persist `outcome.items`.
pub fn import_text(
    text: &str,
    lot: &Lot,
    options: &ImportOptions,
) -> Result<ImportResult, ApplyBlocked> {
    let report = decode_all(text, lot.supply_type, options.chunk_size).map_err(|e| {
        warn!(lot_id = %lot.id, error = %e, "import blocked at header");
        ApplyBlocked::from(e)
    })?;

    info!(
        lot_id = %lot.id,
        rows_read = report.rows_read,
        accepted = report.accepted.len(),
        rejected = report.rows_rejected,
        "import decoded"
    );

    let outcome = apply(&report, &lot.items, lot, options.policy, options.strict)?;
    Ok(ImportResult { report, outcome })
}
