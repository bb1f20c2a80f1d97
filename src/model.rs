use log::{info, warn};
use ndarray::{Array2, ArrayView2};

use crate::error::{Error, Result};
use crate::gradient_descent::{GradientDescent, OptimizerConfig};
use crate::parameters::{initialize, Parameters};
use crate::predict::{predict, PredictorConfig};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModelConfig {
    pub optimizer: OptimizerConfig,
    pub predictor: PredictorConfig,
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn predictor(mut self, predictor: PredictorConfig) -> Self {
        self.predictor = predictor;
        self
    }
}

/// Everything a training run produced.
#[derive(Debug, Clone)]
pub struct ModelReport {
    pub costs: Vec<f64>,
    pub y_prediction_train: Array2<f64>,
    pub y_prediction_test: Array2<f64>,
    pub parameters: Parameters,
    pub learning_rate: f64,
    pub num_iterations: usize,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    /// Training went non-finite; the accuracy figures are degenerate.
    pub diverged: bool,
}

/// Percentage of predictions equal to the labels: `100 - mean(|pred - y|) * 100`.
pub fn accuracy(predictions: ArrayView2<f64>, labels: ArrayView2<f64>) -> Result<f64> {
    if predictions.dim() != labels.dim() {
        return Err(Error::shape_mismatch(
            "predictions",
            labels.dim(),
            predictions.dim(),
        ));
    }

    let mean_error = (&predictions - &labels)
        .mapv(f64::abs)
        .mean()
        .ok_or(Error::EmptyDataset)?;

    Ok(100.0 - mean_error * 100.0)
}

/// Trains on `(x_train, y_train)` starting from zero parameters, then reports
/// predictions and accuracy on both splits.
pub fn model(
    x_train: ArrayView2<f64>,
    y_train: ArrayView2<f64>,
    x_test: ArrayView2<f64>,
    y_test: ArrayView2<f64>,
    config: &ModelConfig,
) -> Result<ModelReport> {
    config.predictor.validate()?;
    if x_test.nrows() != x_train.nrows() {
        return Err(Error::shape_mismatch(
            "test features",
            (x_train.nrows(), x_test.ncols()),
            x_test.dim(),
        ));
    }
    if y_test.dim() != (1, x_test.ncols()) {
        return Err(Error::shape_mismatch(
            "test labels",
            (1, x_test.ncols()),
            y_test.dim(),
        ));
    }

    let parameters = initialize(x_train.nrows());

    let optimization =
        GradientDescent::new(config.optimizer).optimize(parameters, x_train, y_train)?;
    let diverged = optimization.diverged();
    if diverged {
        warn!("training diverged, accuracy figures are degenerate");
    }

    let y_prediction_test = predict(&optimization.parameters, x_test, &config.predictor)?;
    let y_prediction_train = predict(&optimization.parameters, x_train, &config.predictor)?;

    let train_accuracy = accuracy(y_prediction_train.view(), y_train)?;
    let test_accuracy = accuracy(y_prediction_test.view(), y_test)?;

    info!("train accuracy: {train_accuracy} %");
    info!("test accuracy: {test_accuracy} %");

    Ok(ModelReport {
        costs: optimization.costs,
        y_prediction_train,
        y_prediction_test,
        parameters: optimization.parameters,
        learning_rate: config.optimizer.learning_rate,
        num_iterations: config.optimizer.num_iterations,
        train_accuracy,
        test_accuracy,
        diverged,
    })
}
