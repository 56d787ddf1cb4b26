//! arp-import
//!
//! Bulk catalog import for a contract lot: delimited text in, validated rows
//! and a merged item list out.
//!
//! Pipeline: delimiter detection and header mapping ([`header`]), chunked
//! row decoding with progress ([`DecodeJob`]), then a gated merge under one
//! of three policies ([`apply`], [`reconcile_items`]). Nothing here touches
//! storage; the caller persists the returned items.

mod apply;
mod delimited;
mod error;
pub mod header;
mod job;
mod numeric;
mod reconcile;
mod report;
mod row;
mod text;

pub use apply::{apply, import_text, ImportOptions, ImportResult};
pub use delimited::{detect_delimiter, split_line};
pub use error::{ApplyBlocked, HeaderError};
pub use header::{map_header, map_header_line, ColumnMap, LogicalColumn};
pub use job::{decode_all, decode_with_progress, DecodeJob, DecodeReport, Progress, DEFAULT_CHUNK_SIZE};
pub use numeric::parse_locale_number;
pub use reconcile::{reconcile_items, MergeCounters, MergeOutcome, MergePolicy};
pub use report::{error_report_csv, template_csv};
pub use row::{decode_row, CandidateRow, RowError};
pub use text::{commercial_name, header_key, normalize_unit, strip_accents, CANONICAL_UNIT};
