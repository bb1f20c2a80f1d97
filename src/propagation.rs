use ndarray::{Array2, ArrayView2};

use crate::activation::sigmoid_array;
use crate::error::{Error, Result};
use crate::parameters::{Gradients, Parameters};

/// Probabilities fed to `ln` are clipped to `[EPSILON, 1 - EPSILON]`.
pub const EPSILON: f64 = 1e-15;

/// Checks that `w` is `(dim, 1)`, `x` is `(dim, m)` with `m >= 1` and `y` is `(1, m)`.
pub fn check_shapes(
    parameters: &Parameters,
    x: ArrayView2<f64>,
    y: ArrayView2<f64>,
) -> Result<()> {
    check_features(parameters, x)?;

    if y.dim() != (1, x.ncols()) {
        return Err(Error::shape_mismatch("labels", (1, x.ncols()), y.dim()));
    }

    Ok(())
}

pub(crate) fn check_features(parameters: &Parameters, x: ArrayView2<f64>) -> Result<()> {
    if parameters.w.ncols() != 1 {
        return Err(Error::shape_mismatch(
            "weights",
            (parameters.w.nrows(), 1),
            parameters.w.dim(),
        ));
    }

    if x.nrows() != parameters.dim() {
        return Err(Error::shape_mismatch(
            "features",
            (parameters.dim(), x.ncols()),
            x.dim(),
        ));
    }

    if x.ncols() == 0 {
        return Err(Error::EmptyDataset);
    }

    Ok(())
}

/// `A = sigmoid(wᵀX + b)`, shape `(1, m)`.
pub fn forward(parameters: &Parameters, x: ArrayView2<f64>) -> Array2<f64> {
    let z = parameters.w.t().dot(&x) + parameters.b;

    sigmoid_array(z.view())
}

/// Average binary cross-entropy between probabilities `a` and labels `y`.
pub fn cross_entropy(a: ArrayView2<f64>, y: ArrayView2<f64>) -> f64 {
    let m = a.ncols() as f64;

    let total: f64 = a
        .iter()
        .zip(y.iter())
        .map(|(&probability, &label)| {
            let probability = probability.clamp(EPSILON, 1.0 - EPSILON);
            label * probability.ln() + (1.0 - label) * (1.0 - probability).ln()
        })
        .sum();

    -total / m
}

/// Runs one forward and backward pass, returning the gradients and the cost.
///
/// Nothing is computed unless `x` has `w.len()` rows and `y` is `(1, x.ncols())`.
pub fn propagate(
    parameters: &Parameters,
    x: ArrayView2<f64>,
    y: ArrayView2<f64>,
) -> Result<(Gradients, f64)> {
    check_shapes(parameters, x, y)?;

    Ok(propagate_unchecked(parameters, x, y))
}

pub(crate) fn propagate_unchecked(
    parameters: &Parameters,
    x: ArrayView2<f64>,
    y: ArrayView2<f64>,
) -> (Gradients, f64) {
    let m = x.ncols() as f64;

    let a = forward(parameters, x);
    let cost = cross_entropy(a.view(), y);

    // A - Y
    let error = a - y;

    let dw = x.dot(&error.t()) / m;
    let db = error.sum() / m;

    (Gradients { dw, db }, cost)
}
