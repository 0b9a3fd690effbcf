use serde::Serialize;

use super::model::Table;

// ---------------------------------------------------------------------------
// Column classification: numeric vs. everything else
// ---------------------------------------------------------------------------

/// Column names split by semantic type, both in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub other: Vec<String>,
}

impl ColumnClassification {
    pub fn is_numeric(&self, name: &str) -> bool {
        self.numeric.iter().any(|n| n == name)
    }
}

/// Split the table's columns into numeric and non-numeric names.
///
/// Ingestion already decided each column's type (numeric iff every present
/// cell is a finite number), so this is a single ordered pass.
pub fn classify(table: &Table) -> ColumnClassification {
    let (numeric, other): (Vec<_>, Vec<_>) = table
        .iter()
        .map(|(name, col)| (name.to_string(), col.is_numeric()))
        .partition(|(_, numeric)| *numeric);

    ColumnClassification {
        numeric: numeric.into_iter().map(|(n, _)| n).collect(),
        other: other.into_iter().map(|(n, _)| n).collect(),
    }
}
