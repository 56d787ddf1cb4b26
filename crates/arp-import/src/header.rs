//! Header mapping: raw header cells → logical columns.
//!
//! Each cell is normalised with [`crate::text::header_key`] and compared,
//! underscores removed, against a fixed synonym table. The five required
//! columns must all resolve; the monthly price column is optional. When a
//! column appears more than once, the first occurrence wins.

use serde::Serialize;

use crate::delimited::split_line;
use crate::error::HeaderError;
use crate::text::header_key;

/// Logical column of the import layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LogicalColumn {
    ItemNumber,
    Specification,
    Unit,
    Total,
    UnitPrice,
    MonthlyPrice,
}

impl LogicalColumn {
    pub const REQUIRED: [LogicalColumn; 5] = [
        LogicalColumn::ItemNumber,
        LogicalColumn::Specification,
        LogicalColumn::Unit,
        LogicalColumn::Total,
        LogicalColumn::UnitPrice,
    ];

    /// Canonical header label (as written in the template and error report).
    pub fn label(&self) -> &'static str {
        match self {
            LogicalColumn::ItemNumber => "Item",
            LogicalColumn::Specification => "Especificacao",
            LogicalColumn::Unit => "Unid",
            LogicalColumn::Total => "Total",
            LogicalColumn::UnitPrice => "ValorUnitario",
            LogicalColumn::MonthlyPrice => "ValorMensal",
        }
    }

    /// Compact (underscore-free) synonyms.
    fn synonyms(&self) -> &'static [&'static str] {
        match self {
            LogicalColumn::ItemNumber => &["ITEM"],
            LogicalColumn::Specification => &["ESPECIFICACAO"],
            LogicalColumn::Unit => &["UNID", "UNIDADE", "UND"],
            LogicalColumn::Total => &["TOTAL"],
            LogicalColumn::UnitPrice => &["VALORUNITARIO", "RSUNIT", "RUNIT"],
            LogicalColumn::MonthlyPrice => &[
                "VALORMENSAL",
                "VALORUNITARIOMENSAL",
                "RSMENSAL",
                "RMENSAL",
                "RSUNITMENSAL",
                "RUNITMENSAL",
            ],
        }
    }

    const ALL: [LogicalColumn; 6] = [
        LogicalColumn::ItemNumber,
        LogicalColumn::Specification,
        LogicalColumn::Unit,
        LogicalColumn::Total,
        LogicalColumn::UnitPrice,
        LogicalColumn::MonthlyPrice,
    ];

    /// Resolve one normalised header key.
    pub fn resolve(key: &str) -> Option<LogicalColumn> {
        let compact = key.replace('_', "");
        Self::ALL
            .into_iter()
            .find(|col| col.synonyms().contains(&compact.as_str()))
    }
}

/// Field index of every resolved logical column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub item_number: usize,
    pub specification: usize,
    pub unit: usize,
    pub total: usize,
    pub unit_price: usize,
    pub monthly_price: Option<usize>,
}

impl ColumnMap {
    pub fn index_of(&self, col: LogicalColumn) -> Option<usize> {
        match col {
            LogicalColumn::ItemNumber => Some(self.item_number),
            LogicalColumn::Specification => Some(self.specification),
            LogicalColumn::Unit => Some(self.unit),
            LogicalColumn::Total => Some(self.total),
            LogicalColumn::UnitPrice => Some(self.unit_price),
            LogicalColumn::MonthlyPrice => self.monthly_price,
        }
    }
}

/// Map a raw header line. Reports every unresolved required column.
pub fn map_header_line(header_line: &str, delimiter: char) -> Result<ColumnMap, HeaderError> {
    let cells = split_line(header_line, delimiter);
    let mut found: [Option<usize>; 6] = [None; 6];
    for (idx, cell) in cells.iter().enumerate() {
        if let Some(col) = LogicalColumn::resolve(&header_key(cell)) {
            let slot = &mut found[col as usize];
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
    }

    let missing: Vec<LogicalColumn> = LogicalColumn::REQUIRED
        .into_iter()
        .filter(|c| found[*c as usize].is_none())
        .collect();

    match found {
        [Some(item_number), Some(specification), Some(unit), Some(total), Some(unit_price), monthly_price] => {
            Ok(ColumnMap {
                item_number,
                specification,
                unit,
                total,
                unit_price,
                monthly_price,
            })
        }
        _ => Err(HeaderError::MissingColumns(missing)),
    }
}

/// Map a raw header line, `None` when any required column is unresolved.
pub fn map_header(header_line: &str, delimiter: char) -> Option<ColumnMap> {
    map_header_line(header_line, delimiter).ok()
}
