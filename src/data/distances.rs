//! Precomputed pairwise distance matrix.

use super::Header;
use crate::error::{CoreHunterError, Result};

/// Tolerance for the symmetry check on input matrices.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Symmetric distance matrix with a zero diagonal, stored as a strict lower triangle.
#[derive(Debug, Clone)]
pub struct DistanceMatrixData {
    headers: Vec<Header>,
    lower: Vec<f64>,
}

impl DistanceMatrixData {
    /// Build from a full square matrix.
    pub fn new(headers: Vec<Header>, matrix: Vec<Vec<f64>>) -> Result<Self> {
        let n = headers.len();
        if matrix.len() != n {
            return Err(CoreHunterError::invalid_data(format!(
                "{} distance headers for a matrix with {} rows",
                n,
                matrix.len()
            )));
        }
        for (i, row) in matrix.iter().enumerate() {
            if row.len() != n {
                return Err(CoreHunterError::invalid_data(format!(
                    "distance matrix row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            if row[i] != 0.0 {
                return Err(CoreHunterError::invalid_data(format!(
                    "distance matrix diagonal entry {} is {}, expected 0",
                    i, row[i]
                )));
            }
        }

        let mut lower = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 1..n {
            for j in 0..i {
                let d = matrix[i][j];
                if !d.is_finite() || d < 0.0 {
                    return Err(CoreHunterError::invalid_data(format!(
                        "distance ({}, {}) = {} is not a finite non-negative value",
                        i, j, d
                    )));
                }
                if (d - matrix[j][i]).abs() > SYMMETRY_TOLERANCE {
                    return Err(CoreHunterError::invalid_data(format!(
                        "distance matrix is not symmetric at ({}, {})",
                        i, j
                    )));
                }
                lower.push(d);
            }
        }

        Ok(Self { headers, lower })
    }

    /// Build from the strict lower triangle, row by row (`(1,0), (2,0), (2,1), ...`).
    pub fn from_lower_triangle(headers: Vec<Header>, lower: Vec<f64>) -> Result<Self> {
        let n = headers.len();
        if lower.len() != n * n.saturating_sub(1) / 2 {
            return Err(CoreHunterError::invalid_data(format!(
                "lower triangle of {} entries does not fit {} items",
                lower.len(),
                n
            )));
        }
        if let Some(d) = lower.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(CoreHunterError::invalid_data(format!(
                "distance {} is not a finite non-negative value",
                d
            )));
        }
        Ok(Self { headers, lower })
    }

    /// Number of items.
    #[inline]
    pub fn size(&self) -> usize {
        self.headers.len()
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn header(&self, id: usize) -> &Header {
        &self.headers[id]
    }

    #[inline]
    pub fn distance(&self, x: usize, y: usize) -> f64 {
        if x == y {
            return 0.0;
        }
        let (i, j) = if x > y { (x, y) } else { (y, x) };
        self.lower[i * (i - 1) / 2 + j]
    }
}
