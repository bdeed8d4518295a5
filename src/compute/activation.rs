//! Activation functions for pattern network layers.
//!
//! Each hidden layer of every individual draws one activation from a fixed
//! menu, which is the main source of visual variety between networks. The
//! output layer always squashes into (0, 1) with a sigmoid.

use serde::{Deserialize, Serialize};

/// Closed set of layer activations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// sin(x): periodic stripes.
    Sine,
    /// cos(x): periodic stripes, phase shifted.
    Cosine,
    /// max(x, 0).
    Relu,
    /// ln(1 + e^x).
    Softplus,
    /// 1 / (1 + e^-x).
    Sigmoid,
    /// Softplus of the layer output minus its own mean, giving radial bands.
    Radial,
}

impl Activation {
    /// Full activation menu.
    pub const ALL: [Activation; 6] = [
        Activation::Sine,
        Activation::Cosine,
        Activation::Relu,
        Activation::Softplus,
        Activation::Sigmoid,
        Activation::Radial,
    ];

    /// Activation used by the final layer of every network.
    pub const OUTPUT: Activation = Activation::Sigmoid;

    /// Apply the activation to one layer output vector of a single sample.
    pub fn apply_in_place(self, values: &mut [f32]) {
        match self {
            Activation::Sine => values.iter_mut().for_each(|v| *v = v.sin()),
            Activation::Cosine => values.iter_mut().for_each(|v| *v = v.cos()),
            Activation::Relu => values.iter_mut().for_each(|v| *v = v.max(0.0)),
            Activation::Softplus => values.iter_mut().for_each(|v| *v = softplus(*v)),
            Activation::Sigmoid => values.iter_mut().for_each(|v| *v = sigmoid(*v)),
            Activation::Radial => {
                if values.is_empty() {
                    return;
                }
                let mean = values.iter().sum::<f32>() / values.len() as f32;
                values.iter_mut().for_each(|v| *v = softplus(*v - mean));
            }
        }
    }
}

/// Logistic sigmoid: float to (0, 1).
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Softplus, evaluated as max(x, 0) + ln(1 + e^-|x|) so large inputs do not overflow.
#[inline]
pub fn softplus(x: f32) -> f32 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_range() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(-20.0) > 0.0);
        assert!(sigmoid(20.0) <= 1.0);
    }

    #[test]
    fn test_softplus_matches_naive_form() {
        for x in [-5.0f32, -1.0, 0.0, 0.5, 3.0] {
            let naive = (1.0 + x.exp()).ln();
            assert!((softplus(x) - naive).abs() < 1e-5, "x = {}", x);
        }
        // Naive form overflows here
        assert!((softplus(200.0) - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_relu() {
        let mut values = [-1.0, 0.0, 2.5];
        Activation::Relu.apply_in_place(&mut values);
        assert_eq!(values, [0.0, 0.0, 2.5]);
    }

    #[test]
    fn test_radial_is_shift_invariant() {
        let mut a = [0.1, 0.7, -0.3];
        let mut b = [10.1, 10.7, 9.7];
        Activation::Radial.apply_in_place(&mut a);
        Activation::Radial.apply_in_place(&mut b);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-4);
        }
    }

    #[test]
    fn test_radial_empty() {
        let mut values: [f32; 0] = [];
        Activation::Radial.apply_in_place(&mut values);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Activation::Softplus).unwrap();
        assert_eq!(json, "\"softplus\"");
        let parsed: Activation = serde_json::from_str("\"radial\"").unwrap();
        assert_eq!(parsed, Activation::Radial);
    }
}
