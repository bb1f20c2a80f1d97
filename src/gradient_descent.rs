use log::{info, warn};
use ndarray::ArrayView2;

use crate::error::{Error, Result};
use crate::parameters::{Gradients, Parameters};
use crate::propagation::{check_shapes, propagate_unchecked};

/// The cost is recorded once every this many iterations.
pub const COST_RECORD_INTERVAL: usize = 100;

pub const DEFAULT_NUM_ITERATIONS: usize = 2000;
pub const DEFAULT_LEARNING_RATE: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerConfig {
    pub num_iterations: usize,
    pub learning_rate: f64,
    /// Log the cost every time it is recorded.
    pub print_cost: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            num_iterations: DEFAULT_NUM_ITERATIONS,
            learning_rate: DEFAULT_LEARNING_RATE,
            print_cost: false,
        }
    }
}

impl OptimizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_iterations(mut self, num_iterations: usize) -> Self {
        self.num_iterations = num_iterations;
        self
    }

    /// Sets the iteration count from a signed value, rejecting negatives.
    pub fn try_num_iterations(self, num_iterations: i64) -> Result<Self> {
        usize::try_from(num_iterations)
            .map(|num_iterations| self.num_iterations(num_iterations))
            .map_err(|_| Error::InvalidHyperparameter {
                name: "num_iterations",
                value: num_iterations as f64,
            })
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn print_cost(mut self, print_cost: bool) -> Self {
        self.print_cost = print_cost;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidHyperparameter {
                name: "learning_rate",
                value: self.learning_rate,
            });
        }

        Ok(())
    }
}

/// Result of a gradient descent run.
#[derive(Debug, Clone)]
pub struct Optimization {
    pub parameters: Parameters,
    /// Gradients from the last iteration, `None` when no iteration ran.
    pub gradients: Option<Gradients>,
    /// Cost sampled every [`COST_RECORD_INTERVAL`] iterations.
    pub costs: Vec<f64>,
    /// First iteration whose cost or updated parameters were not finite.
    pub diverged_at: Option<usize>,
}

impl Optimization {
    /// Index of the first recorded cost that is not finite.
    pub fn first_non_finite_cost(&self) -> Option<usize> {
        self.costs.iter().position(|cost| !cost.is_finite())
    }

    pub fn diverged(&self) -> bool {
        self.diverged_at.is_some()
    }

    /// Turns a diverged run into [`Error::NumericDivergence`].
    pub fn ensure_finite(self) -> Result<Self> {
        match self.diverged_at {
            Some(iteration) => Err(Error::NumericDivergence { iteration }),
            None => Ok(self),
        }
    }
}

pub struct GradientDescent {
    pub config: OptimizerConfig,
}

impl GradientDescent {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Runs batch gradient descent from `parameters` on features `x` `(dim, m)`
    /// and labels `y` `(1, m)`.
    ///
    /// Hyperparameters and shapes are validated before the first update. A
    /// non-finite cost is not corrected and keeps flowing through later
    /// iterations.
    pub fn optimize(
        &self,
        mut parameters: Parameters,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
    ) -> Result<Optimization> {
        self.config.validate()?;
        check_shapes(&parameters, x, y)?;

        let mut costs = Vec::with_capacity(self.config.num_iterations / COST_RECORD_INTERVAL + 1);
        let mut gradients = None;
        let mut diverged_at = None;

        for iteration in 0..self.config.num_iterations {
            let (step_gradients, cost) = self.step(&mut parameters, x, y);
            gradients = Some(step_gradients);

            if diverged_at.is_none() && !(cost.is_finite() && parameters.is_finite()) {
                warn!("training became non-finite at iteration {iteration}");
                diverged_at = Some(iteration);
            }

            if iteration % COST_RECORD_INTERVAL == 0 {
                costs.push(cost);

                if self.config.print_cost {
                    info!("Cost after iteration {iteration}: {cost:.6}");
                }
            }
        }

        Ok(Optimization {
            parameters,
            gradients,
            costs,
            diverged_at,
        })
    }

    fn step(
        &self,
        parameters: &mut Parameters,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
    ) -> (Gradients, f64) {
        let (gradients, cost) = propagate_unchecked(parameters, x, y);

        parameters.apply(&gradients, self.config.learning_rate);

        (gradients, cost)
    }
}

/// Convenience wrapper around [`GradientDescent::optimize`].
pub fn optimize(
    parameters: Parameters,
    x: ArrayView2<f64>,
    y: ArrayView2<f64>,
    config: &OptimizerConfig,
) -> Result<Optimization> {
    GradientDescent::new(*config).optimize(parameters, x, y)
}
