//! Series utilities: crossing detection and row-wise comparisons.
//!
//! Crossing semantics (exact two-row rule): `a` crosses above `b` at row i
//! iff `a[i-1] <= b[i-1]` and `a[i] > b[i]`. Row 0 has no predecessor and
//! never crosses. NaN on either side of either row never crosses.

/// Boolean series: `a` crosses above `b` between the previous and current row.
pub fn crossed_above(a: &[f64], b: &[f64]) -> Vec<bool> {
    assert_eq!(a.len(), b.len(), "crossing inputs must be aligned");
    let mut out = vec![false; a.len()];
    for i in 1..a.len() {
        out[i] = a[i - 1] <= b[i - 1] && a[i] > b[i];
    }
    out
}

/// Boolean series: `a` crosses below `b` between the previous and current row.
pub fn crossed_below(a: &[f64], b: &[f64]) -> Vec<bool> {
    assert_eq!(a.len(), b.len(), "crossing inputs must be aligned");
    let mut out = vec![false; a.len()];
    for i in 1..a.len() {
        out[i] = a[i - 1] >= b[i - 1] && a[i] < b[i];
    }
    out
}

/// Shift a series forward by `k` rows: row i reads the value from row i - k.
///
/// The first `k` rows become NaN. `k == 0` is a plain copy.
pub fn shift_forward(values: &[f64], k: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    for i in k..n {
        out[i] = values[i - k];
    }
    out
}
