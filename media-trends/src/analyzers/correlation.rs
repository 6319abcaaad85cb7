//! Pearson correlation between numeric columns.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::table::RecordTable;

/// Sums of products around the column means for one pair of columns.
#[derive(Debug, Clone, Copy, Default)]
struct PairState {
    n: u64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

impl PairState {
    fn from_columns(x: &[f64], y: &[f64]) -> Self {
        let n = x.len().min(y.len());
        if n == 0 {
            return Self::default();
        }
        let mean_x = x[..n].iter().sum::<f64>() / n as f64;
        let mean_y = y[..n].iter().sum::<f64>() / n as f64;
        x.iter().zip(y).fold(
            Self {
                n: n as u64,
                ..Self::default()
            },
            |mut s, (x, y)| {
                let dx = x - mean_x;
                let dy = y - mean_y;
                s.sxx += dx * dx;
                s.syy += dy * dy;
                s.sxy += dx * dy;
                s
            },
        )
    }

    /// `None` with fewer than two pairs or without variance on either side.
    fn pearson(&self) -> Option<f64> {
        if self.n < 2 || self.sxx <= 0.0 || self.syy <= 0.0 {
            return None;
        }
        Some((self.sxy / (self.sxx.sqrt() * self.syy.sqrt())).clamp(-1.0, 1.0))
    }
}

/// Square matrix of pairwise coefficients, rows and columns in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub table: String,
    pub columns: Vec<String>,
    pub coefficients: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient between two columns of the matrix.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.coefficients[i][j]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Pearson correlation matrix of `columns`.
///
/// A column with no variance gets `None` in its row and column, including
/// the diagonal.
#[instrument(skip(table, columns), fields(table = table.name()))]
pub fn correlation_matrix<S: AsRef<str>>(
    table: &RecordTable,
    columns: &[S],
) -> Result<CorrelationMatrix> {
    let values = columns
        .iter()
        .map(|c| table.numeric_values(c.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let constant: Vec<bool> = values.iter().map(|v| is_constant(v)).collect();
    let mut coefficients = vec![vec![None; values.len()]; values.len()];
    for i in 0..values.len() {
        for j in i..values.len() {
            if constant[i] || constant[j] {
                continue;
            }
            let r = PairState::from_columns(&values[i], &values[j]).pearson();
            // Self-correlation is exactly one whenever it is defined.
            let r = if i == j { r.map(|_| 1.0) } else { r };
            coefficients[i][j] = r;
            coefficients[j][i] = r;
        }
    }

    debug!(columns = values.len(), rows = table.num_rows(), "computed correlation matrix");
    Ok(CorrelationMatrix {
        table: table.name().to_string(),
        columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        coefficients,
    })
}

// Checked on the values themselves: the mean of repeated non-integral values
// can differ from them by a rounding step.
fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
