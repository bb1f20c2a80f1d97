use ndarray::{Array1, Array2, Axis};

/// Learned weights `w` with shape `(dim, 1)` and scalar bias `b`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub w: Array2<f64>,
    pub b: f64,
}

/// Gradients of the cost with respect to `w` and `b`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub dw: Array2<f64>,
    pub db: f64,
}

impl Parameters {
    /// Builds parameters from a flat weight vector, reshaping it into a column.
    pub fn from_weights(weights: Array1<f64>, b: f64) -> Self {
        let w = weights.insert_axis(Axis(1));

        Self { w, b }
    }

    pub fn dim(&self) -> usize {
        self.w.nrows()
    }

    pub fn is_finite(&self) -> bool {
        self.b.is_finite() && self.w.iter().all(|weight| weight.is_finite())
    }

    pub(crate) fn apply(&mut self, gradients: &Gradients, learning_rate: f64) {
        self.w.scaled_add(-learning_rate, &gradients.dw);
        self.b -= learning_rate * gradients.db;
    }
}

/// Zero weights of shape `(dim, 1)` and a zero bias.
pub fn initialize(dim: usize) -> Parameters {
    Parameters {
        w: Array2::zeros((dim, 1)),
        b: 0.0,
    }
}
