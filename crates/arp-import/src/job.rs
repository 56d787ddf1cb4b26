//! Chunked decode job.
//!
//! Decoding a file with tens of thousands of rows is split into chunks of
//! `chunk_size` lines. Each [`DecodeJob::step`] processes one chunk, strictly
//! in input order, and returns a [`Progress`] checkpoint; the caller yields
//! to its host between steps. Abandoning a job (not calling `step` again)
//! leaves nothing mutated: accepted rows and errors live inside the job.

use arp_schemas::SupplyType;
use serde::Serialize;
use tracing::{debug, warn};

use crate::delimited::{detect_delimiter, split_line};
use crate::error::HeaderError;
use crate::header::{map_header_line, ColumnMap};
use crate::row::{decode_row, CandidateRow, RowError};

/// Default number of lines per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Checkpoint after one chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
    /// 0..=100.
    pub percent: u8,
    pub done: bool,
}

/// Everything a finished decode produced.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DecodeReport {
    pub accepted: Vec<CandidateRow>,
    pub errors: Vec<RowError>,
    /// Non-blank data lines seen.
    pub rows_read: usize,
    /// Lines that contributed at least one error.
    pub rows_rejected: usize,
}

impl DecodeReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct DecodeJob<'a> {
    /// (1-based source line, text) for every data line.
    lines: Vec<(usize, &'a str)>,
    next: usize,
    delimiter: char,
    map: ColumnMap,
    supply_type: SupplyType,
    chunk_size: usize,
    report: DecodeReport,
}

impl<'a> DecodeJob<'a> {
    /// Detect the delimiter, map the header and queue the data lines.
    ///
    /// Header-level failures are returned here, before any row is decoded.
    pub fn start(
        text: &'a str,
        supply_type: SupplyType,
        chunk_size: usize,
    ) -> Result<Self, HeaderError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.lines().enumerate();

        let header = match lines.next() {
            Some((_, h)) if !h.trim().is_empty() => h,
            _ => return Err(HeaderError::Empty),
        };
        let delimiter = detect_delimiter(header);
        let map = map_header_line(header, delimiter).map_err(|e| {
            warn!(error = %e, "import header rejected");
            e
        })?;

        let data: Vec<(usize, &str)> = lines
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| (i + 1, l))
            .collect();
        if data.is_empty() {
            return Err(HeaderError::NoDataRows);
        }

        debug!(
            rows = data.len(),
            delimiter = %delimiter,
            supply_type = supply_type.as_str(),
            "import decode started"
        );

        Ok(Self {
            lines: data,
            next: 0,
            delimiter,
            map,
            supply_type,
            chunk_size: chunk_size.max(1),
            report: DecodeReport::default(),
        })
    }

    pub fn column_map(&self) -> &ColumnMap {
        &self.map
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.lines.len()
    }

    pub fn progress(&self) -> Progress {
        let total = self.lines.len();
        let processed = self.next.min(total);
        Progress {
            processed,
            total,
            percent: ((processed * 100) / total.max(1)) as u8,
            done: processed >= total,
        }
    }

    /// Decode the next chunk. A no-op once done.
    pub fn step(&mut self) -> Progress {
        let end = self.next.saturating_add(self.chunk_size).min(self.lines.len());
        for &(line_no, text) in &self.lines[self.next..end] {
            let fields = split_line(text, self.delimiter);
            self.report.rows_read += 1;
            match decode_row(&fields, line_no, &self.map, self.supply_type) {
                Ok(row) => self.report.accepted.push(row),
                Err(mut errs) => {
                    self.report.rows_rejected += 1;
                    self.report.errors.append(&mut errs);
                }
            }
        }
        self.next = end;

        let p = self.progress();
        debug!(
            processed = p.processed,
            total = p.total,
            percent = p.percent,
            "import chunk decoded"
        );
        p
    }

    /// Consume the job. Call after [`DecodeJob::is_done`]; an unfinished job
    /// returns only what was decoded so far.
    pub fn finish(self) -> DecodeReport {
        self.report
    }
}

/// Drive a [`DecodeJob`] to completion, invoking `on_progress` after each chunk.
pub fn decode_with_progress<F>(
    text: &str,
    supply_type: SupplyType,
    chunk_size: usize,
    mut on_progress: F,
) -> Result<DecodeReport, HeaderError>
where
    F: FnMut(Progress),
{
    let mut job = DecodeJob::start(text, supply_type, chunk_size)?;
    while !job.is_done() {
        on_progress(job.step());
    }
    Ok(job.finish())
}

/// Decode an entire file.
pub fn decode_all(
    text: &str,
    supply_type: SupplyType,
    chunk_size: usize,
) -> Result<DecodeReport, HeaderError> {
    decode_with_progress(text, supply_type, chunk_size, |_| {})
}
