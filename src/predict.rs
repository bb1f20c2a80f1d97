use log::info;
use ndarray::{Array2, ArrayView2};

use crate::error::{Error, Result};
use crate::parameters::Parameters;
use crate::propagation::{check_features, forward};

/// Probability above which an example is labelled 1.
///
/// Deliberately higher than the usual 0.5: the classifier only answers "cat"
/// when it is fairly confident.
pub const DEFAULT_THRESHOLD: f64 = 0.65;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictorConfig {
    pub threshold: f64,
    /// Log the raw probability of every example.
    pub print_probability: bool,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            print_probability: false,
        }
    }
}

impl PredictorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn print_probability(mut self, print_probability: bool) -> Self {
        self.print_probability = print_probability;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(Error::InvalidHyperparameter {
                name: "threshold",
                value: self.threshold,
            });
        }

        Ok(())
    }
}

/// Probability of the positive class for every column of `x`, shape `(1, m)`.
pub fn predict_proba(parameters: &Parameters, x: ArrayView2<f64>) -> Result<Array2<f64>> {
    check_features(parameters, x)?;

    Ok(forward(parameters, x))
}

/// Maps probabilities to 0/1 labels using a strict `> threshold` comparison.
pub fn classify(probabilities: ArrayView2<f64>, config: &PredictorConfig) -> Array2<f64> {
    probabilities.mapv(|probability| {
        if config.print_probability {
            info!("Prediction % = {probability}");
        }

        if probability > config.threshold {
            1.0
        } else {
            0.0
        }
    })
}

/// Predicts 0/1 labels for every column of `x`, shape `(1, m)`.
pub fn predict(
    parameters: &Parameters,
    x: ArrayView2<f64>,
    config: &PredictorConfig,
) -> Result<Array2<f64>> {
    config.validate()?;
    let probabilities = predict_proba(parameters, x)?;

    Ok(classify(probabilities.view(), config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::sigmoid;
    use ndarray::array;

    #[test]
    fn test_predict_known_values() {
        let parameters = Parameters {
            w: array![[0.1124579], [0.23106775]],
            b: -0.3,
        };
        let x = array![[1.0, -1.1, -3.2], [1.2, 2.0, 0.1]];
        let config = PredictorConfig::new().threshold(0.5);

        let predictions = predict(&parameters, x.view(), &config).unwrap();

        assert_eq!(predictions, array![[1.0, 1.0, 0.0]]);
    }

    #[test]
    fn test_default_threshold_is_stricter_than_half() {
        // sigmoid(0.5) ~ 0.622 is above 0.5 but below 0.65
        let parameters = Parameters {
            w: array![[0.5]],
            b: 0.0,
        };
        let x = array![[1.0]];

        let strict = predict(&parameters, x.view(), &PredictorConfig::default()).unwrap();
        let half = predict(&parameters, x.view(), &PredictorConfig::new().threshold(0.5)).unwrap();

        assert_eq!(strict, array![[0.0]]);
        assert_eq!(half, array![[1.0]]);
    }

    #[test]
    fn test_threshold_boundary_is_strict() {
        let config = PredictorConfig::default();
        let probabilities = array![[DEFAULT_THRESHOLD, DEFAULT_THRESHOLD + 1e-9]];

        let labels = classify(probabilities.view(), &config);

        assert_eq!(labels, array![[0.0, 1.0]]);
    }

    #[test]
    fn test_threshold_boundary_through_parameters() {
        // sigmoid(0) == 0.5 exactly
        let parameters = Parameters {
            w: array![[1.0]],
            b: 0.0,
        };
        let x = array![[0.0, 1e-6]];
        let config = PredictorConfig::new().threshold(0.5);

        let predictions = predict(&parameters, x.view(), &config).unwrap();

        assert_eq!(predictions, array![[0.0, 1.0]]);
    }

    #[test]
    fn test_predict_proba_matches_sigmoid() {
        let parameters = Parameters::from_weights(array![1.0, -1.0], 0.25);
        let x = array![[0.2, 0.9], [0.4, 0.1]];

        let probabilities = predict_proba(&parameters, x.view()).unwrap();

        assert_eq!(probabilities.dim(), (1, 2));
        assert!((probabilities[(0, 0)] - sigmoid(0.2 - 0.4 + 0.25)).abs() < 1e-12);
        assert!((probabilities[(0, 1)] - sigmoid(0.9 - 0.1 + 0.25)).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_threshold() {
        let parameters = Parameters::from_weights(array![1.0], 0.0);
        let x = array![[0.5]];

        for threshold in [0.0, 1.0, -0.2, f64::NAN] {
            let config = PredictorConfig::new().threshold(threshold);
            assert!(matches!(
                predict(&parameters, x.view(), &config),
                Err(Error::InvalidHyperparameter {
                    name: "threshold",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_feature_mismatch() {
        let parameters = Parameters::from_weights(array![1.0, 2.0, 3.0], 0.0);
        let x = array![[0.5], [0.5]];

        assert!(matches!(
            predict(&parameters, x.view(), &PredictorConfig::default()),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
