//! # asian-cv: Asian options with an average-of-calls control variate
//!
//! Monte Carlo valuation of arithmetic-average Asian calls, with variance
//! reduced by a control variate whose expectation is known in closed form.
//!
//! ## Key Features
//!
//! - **Control variate**: average of discounted calls over the averaging dates,
//!   priced analytically under Black–Scholes
//! - **Optimal coefficient**: `β* = Cov(Z,Y)/Var(Y)` estimated per valuation
//! - **Graceful fallback**: plain Monte Carlo with a structured notice when the
//!   model has no closed-form control
//! - **Parallel**: path generation with Rayon, per-path statistics with ndarray
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use asian_cv::mc::mc_engine::{price_asian_option, McConfig};
//!
//! let report = price_asian_option(&McConfig::default()).expect("Valid configuration");
//! let plain = report.plain.expect("plain estimator requested");
//! let controlled = report.controlled.expect("control variate requested");
//! println!("Plain:      {:.6} ± {:.6}", plain.price, plain.standard_error);
//! println!("Controlled: {:.6} ± {:.6}", controlled.price, controlled.standard_error);
//! ```
//!
//! ## Valuation against any simulation
//!
//! [`mc::valuation::AsianOptionWithControlVariate`] only needs an
//! [`mc::simulation::AssetSimulationProvider`]; the bundled
//! [`mc::simulation::MonteCarloAssetSimulation`] is one such provider.

pub mod analytics;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod rng;
pub mod schedule;

pub use error::{CvError, CvResult};
pub use mc::sample::Sample;
pub use mc::valuation::{AsianOptionWithControlVariate, Notice, Valuation};
