// src/models/model.rs
use crate::error::{validation::*, CvResult};

/// Parameters of a Black–Scholes asset: `dS = r S dt + σ S dW`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlackScholesParameters {
    pub initial_value: f64,
    pub risk_free_rate: f64,
    pub volatility: f64,
}

impl BlackScholesParameters {
    pub fn new(initial_value: f64, risk_free_rate: f64, volatility: f64) -> CvResult<Self> {
        validate_positive("initial_value", initial_value)?;
        validate_finite("risk_free_rate", risk_free_rate)?;
        validate_positive("volatility", volatility)?;
        Ok(BlackScholesParameters {
            initial_value,
            risk_free_rate,
            volatility,
        })
    }
}

/// What a simulation knows about the model driving it
#[derive(Clone, Debug, PartialEq)]
pub enum ModelDescriptor {
    /// Constant-coefficient log-normal dynamics with closed-form vanilla prices
    BlackScholesLike(BlackScholesParameters),
    /// Any other dynamics
    Other { name: String },
}

/// One-dimensional asset dynamics under the risk-neutral measure
pub trait AssetModel: Send + Sync {
    fn initial_value(&self) -> f64;
    fn risk_free_rate(&self) -> f64;

    /// Advance `s` over `dt` given the Brownian increment `dw ~ N(0, dt)`
    fn evolve(&self, s: f64, dt: f64, dw: f64) -> f64;

    fn descriptor(&self) -> ModelDescriptor;
    fn name(&self) -> &'static str;
}
