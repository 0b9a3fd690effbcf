use thiserror::Error;

/// Convenience alias for results carrying a [`LabError`].
pub type Result<T, E = LabError> = std::result::Result<T, E>;

/// Every failure an operation of the lab can report.
///
/// Display strings are shown to the user verbatim, so they name the cause.
#[derive(Debug, Error)]
pub enum LabError {
    #[error("Unsupported file type: {filename}. Please upload a CSV file.")]
    UnsupportedFormat { filename: String },

    #[error("Error reading {filename}: {cause}")]
    Parse {
        filename: String,
        #[source]
        cause: ParseCause,
    },

    #[error("Upload a dataset first.")]
    NoData,

    #[error("Select feature column(s) and target column.")]
    SelectionIncomplete,

    #[error("Column '{column}' does not exist in the dataset.")]
    UnknownColumn { column: String },

    #[error("Column '{column}' must be numeric.")]
    NonNumericColumn { column: String },

    #[error("Need at least 2 complete rows to train, found {rows}.")]
    InsufficientRows { rows: usize },

    #[error("Regression system could not be solved (matrix not positive definite).")]
    SingularSystem,

    #[error("Train a model first.")]
    NotTrained,

    #[error("Expected {expected} feature values, got {got}.")]
    InputCountMismatch { expected: usize, got: usize },

    #[error("Enter a value for feature '{feature}'.")]
    MissingFeatureValue { feature: String },

    #[error("Matrix {operand} is empty.")]
    EmptyMatrix { operand: String },

    #[error("Matrix {operand}: invalid format ({reason}). Use comma-separated numeric values per row.")]
    MalformedMatrix { operand: String, reason: String },

    #[error("Shape mismatch for {op}: {left_rows}x{left_cols} vs {right_rows}x{right_cols}.")]
    ShapeMismatch {
        op: &'static str,
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    #[error("Determinant requires a square matrix, got {rows}x{cols}.")]
    NotSquare { rows: usize, cols: usize },

    #[error("Unknown operation '{name}'.")]
    UnknownOperation { name: String },
}

/// Underlying cause of a [`LabError::Parse`].
#[derive(Debug, Error)]
pub enum ParseCause {
    #[error("could not parse file contents (expected a data URL payload)")]
    Payload,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("no columns to parse from file")]
    NoColumns,
}

impl LabError {
    pub(crate) fn parse(filename: &str, cause: impl Into<ParseCause>) -> Self {
        LabError::Parse {
            filename: filename.to_string(),
            cause: cause.into(),
        }
    }

    pub(crate) fn shape_mismatch(
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    ) -> Self {
        LabError::ShapeMismatch {
            op,
            left_rows: left.0,
            left_cols: left.1,
            right_rows: right.0,
            right_cols: right.1,
        }
    }
}
