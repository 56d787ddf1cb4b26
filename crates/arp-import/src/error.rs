use std::fmt;

use crate::header::LogicalColumn;

/// Header-level failure. Fatal to the whole import, surfaced once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderError {
    /// The input has no header line at all.
    Empty,
    /// Required columns that did not resolve against the synonym table.
    MissingColumns(Vec<LogicalColumn>),
    /// A header but not a single non-blank data line.
    NoDataRows,
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::Empty => write!(f, "import file is empty"),
            HeaderError::MissingColumns(cols) => {
                let labels: Vec<&str> = cols.iter().map(LogicalColumn::label).collect();
                write!(f, "missing required column(s): {}", labels.join(", "))
            }
            HeaderError::NoDataRows => write!(f, "import file has no data rows"),
        }
    }
}

impl std::error::Error for HeaderError {}

/// Why a batch was not applied. Nothing is merged when this is returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplyBlocked {
    Header(HeaderError),
    /// Strict mode: any row error blocks the batch.
    RowErrors { count: usize },
    /// Every row failed validation; applying would only delete or no-op.
    NoAcceptedRows,
}

impl fmt::Display for ApplyBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyBlocked::Header(e) => write!(f, "import blocked: {e}"),
            ApplyBlocked::RowErrors { count } => write!(
                f,
                "import blocked: {count} row error(s) present in strict mode"
            ),
            ApplyBlocked::NoAcceptedRows => write!(f, "import blocked: no valid rows"),
        }
    }
}

impl std::error::Error for ApplyBlocked {}

impl From<HeaderError> for ApplyBlocked {
    fn from(e: HeaderError) -> Self {
        ApplyBlocked::Header(e)
    }
}
