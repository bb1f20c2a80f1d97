use ndarray::{Array2, ArrayView2};

/// Logistic function. Branches on the sign of `z` so `exp` only ever sees a
/// non-positive argument and cannot overflow.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let exp_z = z.exp();
        exp_z / (1.0 + exp_z)
    }
}

pub fn sigmoid_array(z: ArrayView2<f64>) -> Array2<f64> {
    z.mapv(sigmoid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_sigmoid_at_zero() {
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn test_sigmoid_known_values() {
        assert!((sigmoid(2.0) - 0.880_797_077_977_882_3).abs() < 1e-12);
        assert!((sigmoid(-2.0) - 0.119_202_922_022_117_7).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_saturates_without_overflow() {
        let low = sigmoid(-1000.0);
        let high = sigmoid(1000.0);

        assert!(low.is_finite() && low >= 0.0 && low < 1e-300);
        assert!(high.is_finite() && (high - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sigmoid_array_is_elementwise() {
        let z = array![[0.0, 2.0, -2.0]];
        let a = sigmoid_array(z.view());

        assert_eq!(a.dim(), (1, 3));
        for (&value, &input) in a.iter().zip(z.iter()) {
            assert!((value - sigmoid(input)).abs() < 1e-15);
        }
    }

    proptest! {
        #[test]
        fn sigmoid_is_strictly_between_zero_and_one(z in -30.0f64..30.0) {
            let a = sigmoid(z);
            prop_assert!(a > 0.0 && a < 1.0);
        }

        #[test]
        fn sigmoid_is_finite_and_bounded_everywhere(z in proptest::num::f64::NORMAL) {
            let a = sigmoid(z);
            prop_assert!(a.is_finite());
            prop_assert!((0.0..=1.0).contains(&a));
        }

        #[test]
        fn sigmoid_is_symmetric(z in -30.0f64..30.0) {
            prop_assert!((sigmoid(z) + sigmoid(-z) - 1.0).abs() < 1e-12);
        }
    }
}
