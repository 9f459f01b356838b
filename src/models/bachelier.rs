// src/models/bachelier.rs
//! Bachelier (arithmetic Brownian motion) asset model
//!
//! ```text
//! dS_t = r S_t dt + σ dW_t
//! ```
//!
//! The exact transition is Gaussian:
//! ```text
//! S_{t+Δt} = S_t e^{rΔt} + σ √((e^{2rΔt} - 1) / (2r)) * Z
//! ```
//! which reduces to `S_t + σ ΔW` when `r = 0`. Prices can become negative.

use super::model::{AssetModel, ModelDescriptor};
use crate::error::{validation::*, CvResult};

#[derive(Clone, Copy, Debug)]
pub struct BachelierModel {
    pub s0: f64,
    pub r: f64,
    pub sigma: f64,
}

impl BachelierModel {
    pub fn new(s0: f64, r: f64, sigma: f64) -> CvResult<Self> {
        validate_finite("s0", s0)?;
        validate_finite("r", r)?;
        validate_positive("sigma", sigma)?;
        Ok(BachelierModel { s0, r, sigma })
    }

    /// Standard deviation of the transition over `dt`, divided by `σ √dt`
    fn variance_scale(&self, dt: f64) -> f64 {
        let x = 2.0 * self.r * dt;
        if x.abs() < 1e-10 {
            1.0 + 0.25 * x
        } else {
            (x.exp_m1() / x).sqrt()
        }
    }
}

impl AssetModel for BachelierModel {
    fn initial_value(&self) -> f64 {
        self.s0
    }

    fn risk_free_rate(&self) -> f64 {
        self.r
    }

    fn evolve(&self, s: f64, dt: f64, dw: f64) -> f64 {
        s * (self.r * dt).exp() + self.sigma * self.variance_scale(dt) * dw
    }

    fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor::Other {
            name: self.name().to_string(),
        }
    }

    fn name(&self) -> &'static str {
        "Bachelier"
    }
}
