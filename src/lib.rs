pub mod activation;
pub mod error;
pub mod features;
pub mod gradient_descent;
pub mod model;
pub mod parameters;
pub mod parse;
pub mod plot;
pub mod predict;
pub mod propagation;

pub use error::{Error, Result};
