// src/models/black_scholes.rs
//! Black–Scholes (geometric Brownian motion) asset model
//!
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! Stepped with the exact solution, so the simulated marginals carry no
//! discretisation bias:
//! ```text
//! S_{t+Δt} = S_t * exp((r - σ²/2)Δt + σ ΔW)
//! ```

use super::model::{AssetModel, BlackScholesParameters, ModelDescriptor};
use crate::error::CvResult;

#[derive(Clone, Copy, Debug)]
pub struct BlackScholesModel {
    pub params: BlackScholesParameters,
}

impl BlackScholesModel {
    pub fn new(initial_value: f64, risk_free_rate: f64, volatility: f64) -> CvResult<Self> {
        Ok(BlackScholesModel {
            params: BlackScholesParameters::new(initial_value, risk_free_rate, volatility)?,
        })
    }
}

impl AssetModel for BlackScholesModel {
    fn initial_value(&self) -> f64 {
        self.params.initial_value
    }

    fn risk_free_rate(&self) -> f64 {
        self.params.risk_free_rate
    }

    fn evolve(&self, s: f64, dt: f64, dw: f64) -> f64 {
        let sigma = self.params.volatility;
        s * ((self.params.risk_free_rate - 0.5 * sigma * sigma) * dt + sigma * dw).exp()
    }

    fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor::BlackScholesLike(self.params)
    }

    fn name(&self) -> &'static str {
        "Black-Scholes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_non_positive_volatility() {
        assert!(BlackScholesModel::new(1.0, 0.05, 0.0).is_err());
        assert!(BlackScholesModel::new(-1.0, 0.05, 0.3).is_err());
    }

    #[test]
    fn test_zero_increment_step_grows_at_drift_minus_convexity() {
        let model = BlackScholesModel::new(1.0, 0.05, 0.3).unwrap();
        let s = model.evolve(1.0, 0.1, 0.0);
        assert_relative_eq!(s, ((0.05 - 0.045) * 0.1_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_descriptor_exposes_parameters() {
        let model = BlackScholesModel::new(1.0, 0.05, 0.3).unwrap();
        match model.descriptor() {
            ModelDescriptor::BlackScholesLike(p) => {
                assert_eq!(p.initial_value, 1.0);
                assert_eq!(p.risk_free_rate, 0.05);
                assert_eq!(p.volatility, 0.3);
            }
            other => panic!("unexpected descriptor {:?}", other),
        }
    }
}
