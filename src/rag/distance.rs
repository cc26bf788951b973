//! Unit-norm helpers. Inner product between unit vectors is cosine
//! similarity, which is the only metric the index uses.

use ndarray::{Array2, ArrayViewMut1, Axis};

/// Scale a vector to unit L2 length. Zero vectors are left as zeros.
pub fn l2_normalize(mut v: ArrayViewMut1<f32>) {
    let norm = v.dot(&v).sqrt();
    if norm > 0.0 {
        v /= norm;
    }
}

/// Row-wise `l2_normalize`
pub fn l2_normalize_rows(matrix: &mut Array2<f32>) {
    for row in matrix.axis_iter_mut(Axis(0)) {
        l2_normalize(row);
    }
}
