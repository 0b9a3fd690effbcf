use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column – one named series of the table
// ---------------------------------------------------------------------------

/// A column of uniform semantic type. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// The numeric values, or `None` for a text column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Numeric(v) => Some(v),
            Column::Text(_) => None,
        }
    }

    pub fn missing(&self) -> usize {
        match self {
            Column::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            Column::Text(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// Render a single cell for display. Missing cells render empty.
    pub fn display(&self, row: usize) -> String {
        match self {
            Column::Numeric(v) => match v.get(row).copied().flatten() {
                Some(x) => CellDisplay(x).to_string(),
                None => String::new(),
            },
            Column::Text(v) => v.get(row).cloned().flatten().unwrap_or_default(),
        }
    }
}

/// Formats integral floats without a trailing fraction.
struct CellDisplay(f64);

impl fmt::Display for CellDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.fract() == 0.0 && v.abs() < 1e15 {
            write!(f, "{v:.0}")
        } else {
            write!(f, "{v}")
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Row / column / missing-cell counts reported after a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub rows: usize,
    pub cols: usize,
    pub missing: usize,
}

impl fmt::Display for TableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rows: {} | Columns: {} | Missing values: {}",
            self.rows, self.cols, self.missing
        )
    }
}

/// An ordered set of uniquely named, equal-length columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

/// Reasons [`Table::new`] rejects its input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("{names} column names for {columns} columns")]
    Arity { names: usize, columns: usize },
    #[error("duplicate column name '{0}'")]
    DuplicateName(String),
    #[error("column '{name}' has {len} rows, expected {rows}")]
    RaggedColumn { name: String, len: usize, rows: usize },
}

impl Table {
    /// Build a table, checking the name / length invariants.
    pub fn new(names: Vec<String>, columns: Vec<Column>) -> Result<Self, TableError> {
        if names.len() != columns.len() {
            return Err(TableError::Arity {
                names: names.len(),
                columns: columns.len(),
            });
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(TableError::DuplicateName(name.clone()));
            }
        }

        let rows = columns.first().map(Column::len).unwrap_or(0);
        for (name, col) in names.iter().zip(&columns) {
            if col.len() != rows {
                return Err(TableError::RaggedColumn {
                    name: name.clone(),
                    len: col.len(),
                    rows,
                });
            }
        }

        Ok(Table {
            names,
            columns,
            rows,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in file order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// `(name, column)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(&self.columns)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    /// Values of a numeric column; `None` when absent or textual.
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        self.column(name).and_then(Column::as_numeric)
    }

    pub fn info(&self) -> TableInfo {
        TableInfo {
            rows: self.rows,
            cols: self.columns.len(),
            missing: self.columns.iter().map(Column::missing).sum(),
        }
    }

    /// The first `n` rows rendered as strings, one `Vec` per row.
    pub fn preview(&self, n: usize) -> Vec<Vec<String>> {
        (0..self.rows.min(n))
            .map(|row| self.columns.iter().map(|c| c.display(row)).collect())
            .collect()
    }
}
