//! Downloadable CSV artifacts: the import template and the error report.

use anyhow::{Context, Result};

use crate::header::LogicalColumn;
use crate::row::RowError;

fn writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new())
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr.into_inner().context("flush csv buffer")?;
    String::from_utf8(bytes).context("csv output is not utf-8")
}

/// Template with the five required headers and no data rows.
pub fn template_csv() -> Result<String> {
    let mut wtr = writer();
    wtr.write_record(LogicalColumn::REQUIRED.iter().map(LogicalColumn::label))
        .context("write template header")?;
    into_string(wtr)
}

/// `Linha;Campo;Motivo`, one record per field-level error.
pub fn error_report_csv(errors: &[RowError]) -> Result<String> {
    let mut wtr = writer();
    wtr.write_record(["Linha", "Campo", "Motivo"])
        .context("write error report header")?;
    for e in errors {
        wtr.write_record([e.line.to_string().as_str(), e.field.label(), e.reason.as_str()])
            .with_context(|| format!("write error report line {}", e.line))?;
    }
    into_string(wtr)
}
