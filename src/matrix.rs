//! Free-text matrix arithmetic.
//!
//! Matrices are written one row per line with comma-separated numbers:
//!
//! ```text
//! 1,2,3
//! 4,5,6.5
//! ```

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;

use crate::error::{LabError, Result};

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a matrix, naming it `operand` in any error.
pub fn parse_matrix(text: &str, operand: &str) -> Result<Array2<f64>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(LabError::EmptyMatrix {
            operand: operand.to_string(),
        });
    }

    let malformed = |reason: String| LabError::MalformedMatrix {
        operand: operand.to_string(),
        reason,
    };

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let row = line
            .split(',')
            .map(str::trim)
            .filter(|tok| !tok.is_empty())
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|_| malformed(format!("'{tok}' on row {} is not a number", line_no + 1)))
            })
            .collect::<Result<Vec<f64>>>()?;

        if row.is_empty() {
            return Err(malformed(format!("row {} is empty", line_no + 1)));
        }
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(malformed(format!(
                    "row {} has {} values, expected {}",
                    line_no + 1,
                    row.len(),
                    first.len()
                )));
            }
        }
        rows.push(row);
    }

    let (n_rows, n_cols) = (rows.len(), rows[0].len());
    Array2::from_shape_vec((n_rows, n_cols), rows.concat())
        .map_err(|e| malformed(e.to_string()))
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub fn add(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    same_shape("addition", a, b)?;
    Ok(a + b)
}

pub fn sub(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    same_shape("subtraction", a, b)?;
    Ok(a - b)
}

pub fn mul(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    if a.ncols() != b.nrows() {
        return Err(LabError::shape_mismatch("multiplication", a.dim(), b.dim()));
    }
    Ok(a.dot(b))
}

pub fn transpose(m: &Array2<f64>) -> Array2<f64> {
    m.t().to_owned()
}

/// Determinant by Gaussian elimination with partial pivoting.
pub fn determinant(m: &Array2<f64>) -> Result<f64> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(LabError::NotSquare { rows, cols });
    }

    let n = rows;
    let mut a = m.clone();
    let mut det = 1.0;

    for k in 0..n {
        let pivot = (k..n)
            .max_by(|&i, &j| a[[i, k]].abs().total_cmp(&a[[j, k]].abs()))
            .unwrap_or(k);
        if a[[pivot, k]] == 0.0 {
            return Ok(0.0);
        }
        if pivot != k {
            for j in 0..n {
                a.swap([k, j], [pivot, j]);
            }
            det = -det;
        }

        let p = a[[k, k]];
        det *= p;
        for i in (k + 1)..n {
            let factor = a[[i, k]] / p;
            for j in k..n {
                a[[i, j]] -= factor * a[[k, j]];
            }
        }
    }
    Ok(det)
}

fn same_shape(op: &'static str, a: &Array2<f64>, b: &Array2<f64>) -> Result<()> {
    if a.dim() != b.dim() {
        return Err(LabError::shape_mismatch(op, a.dim(), b.dim()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Named operations over text operands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixOp {
    Add,
    Sub,
    Mul,
    TransposeA,
    TransposeB,
    DeterminantA,
    DeterminantB,
}

impl MatrixOp {
    pub const ALL: [MatrixOp; 7] = [
        MatrixOp::Add,
        MatrixOp::Sub,
        MatrixOp::Mul,
        MatrixOp::TransposeA,
        MatrixOp::TransposeB,
        MatrixOp::DeterminantA,
        MatrixOp::DeterminantB,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MatrixOp::Add => "add",
            MatrixOp::Sub => "sub",
            MatrixOp::Mul => "mul",
            MatrixOp::TransposeA => "tA",
            MatrixOp::TransposeB => "tB",
            MatrixOp::DeterminantA => "detA",
            MatrixOp::DeterminantB => "detB",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatrixOp::Add => "A + B",
            MatrixOp::Sub => "A - B",
            MatrixOp::Mul => "A × B",
            MatrixOp::TransposeA => "Transpose A",
            MatrixOp::TransposeB => "Transpose B",
            MatrixOp::DeterminantA => "Determinant |A|",
            MatrixOp::DeterminantB => "Determinant |B|",
        }
    }

    fn needs_b(self) -> bool {
        !matches!(self, MatrixOp::TransposeA | MatrixOp::DeterminantA)
    }

    fn needs_a(self) -> bool {
        !matches!(self, MatrixOp::TransposeB | MatrixOp::DeterminantB)
    }
}

impl FromStr for MatrixOp {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self> {
        MatrixOp::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| LabError::UnknownOperation {
                name: s.to_string(),
            })
    }
}

/// A computed result: a matrix or a scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixOutput {
    Matrix(Array2<f64>),
    Scalar(f64),
}

impl fmt::Display for MatrixOutput {
    /// Matrices render as comma-separated rows joined by newlines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixOutput::Scalar(v) => write!(f, "{v}"),
            MatrixOutput::Matrix(m) => {
                for (i, row) in m.rows().into_iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    for (j, v) in row.iter().enumerate() {
                        if j > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{v}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Parse the operands `op` needs and apply it.
pub fn compute(op: MatrixOp, a_text: &str, b_text: Option<&str>) -> Result<MatrixOutput> {
    let a = if op.needs_a() {
        Some(parse_matrix(a_text, "A")?)
    } else {
        None
    };
    let b = if op.needs_b() {
        Some(parse_matrix(b_text.unwrap_or_default(), "B")?)
    } else {
        None
    };
    log::debug!(
        "matrix {}: A {:?}, B {:?}",
        op.name(),
        a.as_ref().map(Array2::dim),
        b.as_ref().map(Array2::dim)
    );

    let output = match (op, a, b) {
        (MatrixOp::Add, Some(a), Some(b)) => MatrixOutput::Matrix(add(&a, &b)?),
        (MatrixOp::Sub, Some(a), Some(b)) => MatrixOutput::Matrix(sub(&a, &b)?),
        (MatrixOp::Mul, Some(a), Some(b)) => MatrixOutput::Matrix(mul(&a, &b)?),
        (MatrixOp::TransposeA, Some(a), _) => MatrixOutput::Matrix(transpose(&a)),
        (MatrixOp::TransposeB, _, Some(b)) => MatrixOutput::Matrix(transpose(&b)),
        (MatrixOp::DeterminantA, Some(a), _) => MatrixOutput::Scalar(determinant(&a)?),
        (MatrixOp::DeterminantB, _, Some(b)) => MatrixOutput::Scalar(determinant(&b)?),
        // needs_a / needs_b guarantee the operands above.
        (op, _, _) => {
            return Err(LabError::UnknownOperation {
                name: op.name().to_string(),
            })
        }
    };
    Ok(output)
}

/// [`compute`] with the operation given by name.
pub fn compute_named(op: &str, a_text: &str, b_text: Option<&str>) -> Result<MatrixOutput> {
    compute(op.parse()?, a_text, b_text)
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn adds_two_matrices_as_text() {
        let out = compute_named("add", "1,2\n3,4", Some("5,6\n7,8")).unwrap();
        assert_eq!(out.to_string(), "6,8\n10,12");
    }

    #[test]
    fn parses_floats_spaces_and_crlf() {
        let m = parse_matrix(" 1, 2,3\r\n4,5 ,6.5 \n", "A").unwrap();
        assert_eq!(m, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.5]]);
    }

    #[test]
    fn blank_input_is_empty_matrix() {
        assert!(matches!(
            parse_matrix("  \n ", "A"),
            Err(LabError::EmptyMatrix { operand }) if operand == "A"
        ));
    }

    #[test]
    fn bad_tokens_and_ragged_rows_are_malformed() {
        assert!(matches!(
            parse_matrix("1,x", "A"),
            Err(LabError::MalformedMatrix { .. })
        ));
        assert!(matches!(
            parse_matrix("1,2\n3", "A"),
            Err(LabError::MalformedMatrix { .. })
        ));
        assert!(matches!(
            parse_matrix("1,2\n,\n3,4", "A"),
            Err(LabError::MalformedMatrix { .. })
        ));
    }

    #[test]
    fn multiplies_and_transposes() {
        let a = array![[1.0, 2.0, 3.0]];
        let b = array![[1.0], [1.0], [1.0]];
        assert_eq!(mul(&a, &b).unwrap(), array![[6.0]]);
        assert_eq!(transpose(&a), array![[1.0], [2.0], [3.0]]);
        assert!(matches!(mul(&a, &a), Err(LabError::ShapeMismatch { .. })));
    }

    #[test]
    fn determinant_values() {
        let d = determinant(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert!((d + 2.0).abs() < 1e-12);
        assert_eq!(determinant(&array![[7.0]]).unwrap(), 7.0);
        assert_eq!(determinant(&array![[1.0, 2.0], [2.0, 4.0]]).unwrap(), 0.0);
        let d = determinant(&array![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 3.0]]).unwrap();
        assert!((d + 3.0).abs() < 1e-12);
        assert!(matches!(
            determinant(&array![[1.0, 2.0]]),
            Err(LabError::NotSquare { rows: 1, cols: 2 })
        ));
    }

    #[test]
    fn single_operand_ops_ignore_the_other_matrix() {
        let out = compute(MatrixOp::TransposeA, "1,2", None).unwrap();
        assert_eq!(out.to_string(), "1\n2");
        let out = compute(MatrixOp::DeterminantB, "garbage", Some("2,0\n0,3")).unwrap();
        assert_eq!(out, MatrixOutput::Scalar(6.0));
    }

    #[test]
    fn missing_b_is_reported_against_b() {
        assert!(matches!(
            compute(MatrixOp::Add, "1", None),
            Err(LabError::EmptyMatrix { operand }) if operand == "B"
        ));
    }

    #[test]
    fn unknown_operation_name() {
        assert!(matches!(
            compute_named("pow", "1", None),
            Err(LabError::UnknownOperation { .. })
        ));
        for op in MatrixOp::ALL {
            assert_eq!(op.name().parse::<MatrixOp>().unwrap(), op);
        }
    }

    fn matrix(rows: usize, cols: usize) -> impl Strategy<Value = Array2<f64>> {
        prop::collection::vec(-100.0f64..100.0, rows * cols)
            .prop_map(move |v| Array2::from_shape_vec((rows, cols), v).unwrap())
    }

    fn shaped() -> impl Strategy<Value = (Array2<f64>, Array2<f64>)> {
        (1usize..5, 1usize..5, 1usize..5, 1usize..5)
            .prop_flat_map(|(r1, c1, r2, c2)| (matrix(r1, c1), matrix(r2, c2)))
    }

    proptest! {
        #[test]
        fn add_sub_accept_exactly_equal_shapes((a, b) in shaped()) {
            let ok = a.dim() == b.dim();
            prop_assert_eq!(add(&a, &b).is_ok(), ok);
            prop_assert_eq!(sub(&a, &b).is_ok(), ok);
            if !ok {
                let is_shape_mismatch = matches!(add(&a, &b), Err(LabError::ShapeMismatch { .. }));
                prop_assert!(is_shape_mismatch);
            }
        }

        #[test]
        fn mul_accepts_exactly_conformable_shapes((a, b) in shaped()) {
            let result = mul(&a, &b);
            prop_assert_eq!(result.is_ok(), a.ncols() == b.nrows());
            if let Ok(m) = result {
                prop_assert_eq!(m.dim(), (a.nrows(), b.ncols()));
            }
        }

        #[test]
        fn determinant_accepts_exactly_square((a, _) in shaped()) {
            let (r, c) = a.dim();
            match determinant(&a) {
                Ok(d) => prop_assert!(r == c && d.is_finite()),
                Err(e) => {
                    let not_square = matches!(e, LabError::NotSquare { .. });
                    prop_assert!(r != c && not_square);
                }
            }
        }

        #[test]
        fn transpose_twice_is_identity((a, _) in shaped()) {
            prop_assert_eq!(transpose(&transpose(&a)), a);
        }
    }
}
