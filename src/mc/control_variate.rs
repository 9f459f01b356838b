// src/mc/control_variate.rs
//! Average-of-calls control variate for Asian options
//!
//! # Estimator
//!
//! With `Z` the discounted Asian payoff and `Y` a correlated control whose
//! expectation `E[Y]` is known in closed form, the controlled estimator is
//! ```text
//! R = Z - β (Y - E[Y])
//! ```
//! Since `E[Y - E[Y]] = 0`, `E[R] = E[Z]` for every `β`. The variance
//! ```text
//! Var(R) = Var(Z) - 2β Cov(Z,Y) + β² Var(Y)
//! ```
//! is minimised by `β* = Cov(Z,Y) / Var(Y)`, giving
//! `Var(R) = Var(Z) (1 - ρ²(Z,Y))`.
//!
//! # Control
//!
//! `Y` is the average over the averaging dates of discounted call payoffs
//! struck at the option strike:
//! ```text
//! Y = (1/n) Σ_i e^{-r(t_i - t)} max(S(t_i) - K, 0)
//! E[Y] = (1/n) Σ_i C_BS(S_0, r, σ, t_i - t, K)
//! ```
//! It averages over the same dates as the Asian payoff, which makes it far
//! more correlated with `Z` than a single call at maturity.

use crate::analytics::bs_analytic::AnalyticPricer;
use crate::error::{CvError, CvResult};
use crate::mc::sample::Sample;
use crate::mc::simulation::AssetSimulationProvider;
use crate::models::model::BlackScholesParameters;
use crate::schedule::{AveragingSchedule, OptionSpec};
use tracing::warn;

/// Default threshold below which a control sample counts as constant.
///
/// The comparison is against the absolute variance of `Y`, in squared units
/// of the payoff, so it should be rescaled for very small or very large
/// notionals.
pub const DEFAULT_VARIANCE_TOLERANCE: f64 = 1e-14;

/// What to do when the control sample has (numerically) zero variance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DegeneratePolicy {
    /// Return [`CvError::DegenerateControlVariate`]
    #[default]
    Fail,
    /// Use `β = 0`, i.e. return the plain sample
    ZeroCoefficient,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlVariateConfig {
    pub degenerate_policy: DegeneratePolicy,
    /// Absolute bound on `Var(Y)`; not scaled by `Var(Z)`
    pub variance_tolerance: f64,
}

impl Default for ControlVariateConfig {
    fn default() -> Self {
        ControlVariateConfig {
            degenerate_policy: DegeneratePolicy::Fail,
            variance_tolerance: DEFAULT_VARIANCE_TOLERANCE,
        }
    }
}

/// Everything derived from the control in one valuation
#[derive(Clone, Debug, PartialEq)]
pub struct ControlVariateResult {
    pub simulated_sample: Sample,
    pub analytic_expectation: f64,
    pub optimal_coefficient: f64,
}

/// Estimated `β*` together with the moments it came from
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoefficientEstimate {
    pub coefficient: f64,
    pub covariance: f64,
    pub control_variance: f64,
    /// `true` when the zero-coefficient fallback was used
    pub degenerate: bool,
}

/// Per-path average of discounted calls over the averaging dates
pub fn control_variate_sample<P: AssetSimulationProvider + ?Sized>(
    schedule: &AveragingSchedule,
    spec: &OptionSpec,
    params: &BlackScholesParameters,
    evaluation_time: f64,
    provider: &P,
) -> CvResult<Sample> {
    let strike = spec.strike();
    let rate = params.risk_free_rate;
    let sum = schedule
        .times()
        .iter()
        .try_fold(provider.constant_sample(0.0), |acc, &time| {
            let underlying = provider.asset_value_at(time, spec.underlying_index())?;
            let discounted_call = underlying
                .sub_scalar(strike)
                .floor(0.0)
                .mult_scalar((-rate * (time - evaluation_time)).exp());
            acc.add(&discounted_call)
        })?;
    Ok(sum.div_scalar(schedule.len() as f64))
}

/// Closed-form expectation of [`control_variate_sample`]
pub fn analytic_control_expectation<A: AnalyticPricer + ?Sized>(
    pricer: &A,
    params: &BlackScholesParameters,
    schedule: &AveragingSchedule,
    spec: &OptionSpec,
    evaluation_time: f64,
) -> f64 {
    let call_sum: f64 = schedule
        .times()
        .iter()
        .map(|&time| {
            pricer.vanilla_call_price(
                params.initial_value,
                params.risk_free_rate,
                params.volatility,
                time - evaluation_time,
                spec.strike(),
            )
        })
        .sum();
    call_sum / schedule.len() as f64
}

/// `β* = Cov(Z,Y) / Var(Y)`, with the degenerate case handled per `config`
pub fn optimal_coefficient(
    target: &Sample,
    control: &Sample,
    config: &ControlVariateConfig,
) -> CvResult<CoefficientEstimate> {
    let covariance = target.covariance(control)?;
    let control_variance = control.variance();

    if !(control_variance > config.variance_tolerance) {
        return match config.degenerate_policy {
            DegeneratePolicy::Fail => Err(CvError::DegenerateControlVariate {
                variance: control_variance,
                tolerance: config.variance_tolerance,
            }),
            DegeneratePolicy::ZeroCoefficient => {
                warn!(
                    control_variance,
                    tolerance = config.variance_tolerance,
                    "control sample is degenerate, using zero coefficient"
                );
                Ok(CoefficientEstimate {
                    coefficient: 0.0,
                    covariance,
                    control_variance,
                    degenerate: true,
                })
            }
        };
    }

    Ok(CoefficientEstimate {
        coefficient: covariance / control_variance,
        covariance,
        control_variance,
        degenerate: false,
    })
}

/// `R = Z - β (Y - E[Y])`
pub fn combine(
    target: &Sample,
    control: &Sample,
    analytic_expectation: f64,
    coefficient: f64,
) -> CvResult<Sample> {
    let correction = control
        .sub_scalar(analytic_expectation)
        .mult_scalar(coefficient);
    target.sub(&correction)
}
