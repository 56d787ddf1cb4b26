//! Row decoding: one data line → candidate record or field-level errors.
//!
//! Rules are independent; every failing field contributes its own
//! [`RowError`]. A row with any error is excluded from the accepted set.

use arp_schemas::SupplyType;
use serde::Serialize;

use crate::header::{ColumnMap, LogicalColumn};
use crate::numeric::parse_locale_number;
use crate::text::{collapse_whitespace, commercial_name, normalize_unit};

/// A validated, normalised import row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CandidateRow {
    /// 1-based source line (header is line 1).
    pub line: usize,
    pub number: String,
    pub specification: String,
    /// Derived from `specification`.
    pub name: String,
    pub unit: String,
    pub total: f64,
    /// One-off unit price, or the monthly price for MAINTENANCE/LOAN imports.
    pub price: f64,
}

/// One failed field on one line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub line: usize,
    pub field: LogicalColumn,
    pub reason: String,
}

impl RowError {
    fn new(line: usize, field: LogicalColumn, reason: impl Into<String>) -> Self {
        Self {
            line,
            field,
            reason: reason.into(),
        }
    }
}

fn cell<'a>(fields: &'a [String], idx: Option<usize>) -> &'a str {
    idx.and_then(|i| fields.get(i))
        .map(|s| s.trim())
        .unwrap_or("")
}

/// Decode the already-split `fields` of source line `line`.
pub fn decode_row(
    fields: &[String],
    line: usize,
    map: &ColumnMap,
    supply_type: SupplyType,
) -> Result<CandidateRow, Vec<RowError>> {
    let mut errors = Vec::new();

    let number = cell(fields, Some(map.item_number));
    if number.is_empty() {
        errors.push(RowError::new(line, LogicalColumn::ItemNumber, "campo obrigatório vazio"));
    }

    let specification = collapse_whitespace(cell(fields, Some(map.specification)));
    if specification.is_empty() {
        errors.push(RowError::new(
            line,
            LogicalColumn::Specification,
            "campo obrigatório vazio",
        ));
    }

    let unit = normalize_unit(cell(fields, Some(map.unit)));
    if unit.is_empty() {
        errors.push(RowError::new(line, LogicalColumn::Unit, "campo obrigatório vazio"));
    }

    let total_raw = cell(fields, Some(map.total));
    let total = parse_locale_number(total_raw);
    if !total.is_finite() {
        errors.push(RowError::new(
            line,
            LogicalColumn::Total,
            format!("número inválido: '{total_raw}'"),
        ));
    } else if total <= 0.0 {
        errors.push(RowError::new(line, LogicalColumn::Total, "deve ser maior que zero"));
    }

    // Monthly lots read the monthly column when present and filled.
    let monthly_raw = cell(fields, map.monthly_price);
    let (price_col, price_raw) = if supply_type.is_monthly() && !monthly_raw.is_empty() {
        (LogicalColumn::MonthlyPrice, monthly_raw)
    } else {
        (LogicalColumn::UnitPrice, cell(fields, Some(map.unit_price)))
    };
    let price = parse_locale_number(price_raw);
    if !price.is_finite() {
        errors.push(RowError::new(
            line,
            price_col,
            format!("número inválido: '{price_raw}'"),
        ));
    } else if supply_type.requires_positive_price() && price <= 0.0 {
        errors.push(RowError::new(
            line,
            price_col,
            "valor mensal deve ser maior que zero",
        ));
    } else if price < 0.0 {
        errors.push(RowError::new(line, price_col, "não pode ser negativo"));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CandidateRow {
        line,
        number: number.to_string(),
        name: commercial_name(&specification),
        specification,
        unit,
        total,
        price,
    })
}
