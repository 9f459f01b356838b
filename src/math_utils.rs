// src/math_utils.rs
use statrs::function::erf;
use std::f64::consts::{PI, SQRT_2};
use std::time::Instant;

/// Standard normal cumulative distribution function
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf::erf(x / SQRT_2))
}

/// Standard normal probability density function
pub fn norm_pdf(x: f64) -> f64 {
    (1.0 / (2.0 * PI).sqrt()) * (-0.5 * x * x).exp()
}

/// Wall-clock stopwatch for timing consecutive pricing stages
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    lap_start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Timer {
            lap_start: Instant::now(),
        }
    }

    /// Milliseconds since the current lap began
    pub fn elapsed_ms(&self) -> f64 {
        self.lap_start.elapsed().as_secs_f64() * 1000.0
    }

    /// Close the current lap, returning its length in milliseconds, and open the next
    pub fn lap_ms(&mut self) -> f64 {
        let now = Instant::now();
        let lap = now.duration_since(self.lap_start).as_secs_f64() * 1000.0;
        self.lap_start = now;
        lap
    }
}

impl Default for Timer {
    fn default() -> Self {
        Timer::new()
    }
}
