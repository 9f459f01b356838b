// src/mc/payoffs.rs
//! Plain Monte Carlo products
//!
//! # Mathematical Definitions
//!
//! - **European call**: `max(S_T - K, 0)`
//! - **Asian call**: `max(A_T - K, 0)` with `A_T = (1/n) Σ S(t_i)` over the
//!   averaging schedule `t_1 < ... < t_n = T`
//!
//! # Discounting
//!
//! Every product returns the per-path payoff expressed in units of the
//! numeraire at the evaluation time:
//! ```text
//! V_j(t) = payoff_j * N_j(t) / N_j(T)
//! ```
//! so that the sample mean is the Monte Carlo price.

use crate::error::{CvError, CvResult};
use crate::mc::sample::Sample;
use crate::mc::simulation::AssetSimulationProvider;
use crate::schedule::{AveragingSchedule, OptionSpec, TIME_TOLERANCE};

fn discount_to_evaluation_time<P: AssetSimulationProvider + ?Sized>(
    payoff: &Sample,
    evaluation_time: f64,
    maturity: f64,
    provider: &P,
) -> CvResult<Sample> {
    let numeraire_at_maturity = provider.numeraire(maturity)?;
    let numeraire_at_evaluation = provider.numeraire(evaluation_time)?;
    payoff
        .div(&numeraire_at_maturity)?
        .mult(&numeraire_at_evaluation)
}

/// Arithmetic-average Asian call on a single asset
#[derive(Clone, Debug)]
pub struct AsianOption {
    spec: OptionSpec,
    schedule: AveragingSchedule,
}

impl AsianOption {
    pub fn new(spec: OptionSpec, schedule: AveragingSchedule) -> CvResult<Self> {
        if (schedule.maturity() - spec.maturity()).abs() > TIME_TOLERANCE {
            return Err(CvError::ScheduleValidation {
                reason: format!(
                    "last averaging time {} differs from maturity {}",
                    schedule.maturity(),
                    spec.maturity()
                ),
            });
        }
        Ok(AsianOption { spec, schedule })
    }

    pub fn spec(&self) -> &OptionSpec {
        &self.spec
    }

    pub fn schedule(&self) -> &AveragingSchedule {
        &self.schedule
    }

    /// Per-path average of the underlying over the schedule
    pub fn average<P: AssetSimulationProvider + ?Sized>(&self, provider: &P) -> CvResult<Sample> {
        let index = self.spec.underlying_index();
        let sum = self
            .schedule
            .times()
            .iter()
            .try_fold(provider.constant_sample(0.0), |acc, &time| {
                acc.add(&provider.asset_value_at(time, index)?)
            })?;
        Ok(sum.div_scalar(self.schedule.len() as f64))
    }

    /// Discounted per-path payoff `max(A - K, 0) N(t)/N(T)`
    pub fn value<P: AssetSimulationProvider + ?Sized>(
        &self,
        evaluation_time: f64,
        provider: &P,
    ) -> CvResult<Sample> {
        let payoff = self.average(provider)?.sub_scalar(self.spec.strike()).floor(0.0);
        discount_to_evaluation_time(&payoff, evaluation_time, self.spec.maturity(), provider)
    }
}

/// European call on a single asset
#[derive(Clone, Debug)]
pub struct EuropeanOption {
    spec: OptionSpec,
}

impl EuropeanOption {
    pub fn new(spec: OptionSpec) -> Self {
        EuropeanOption { spec }
    }

    pub fn value<P: AssetSimulationProvider + ?Sized>(
        &self,
        evaluation_time: f64,
        provider: &P,
    ) -> CvResult<Sample> {
        let underlying =
            provider.asset_value_at(self.spec.maturity(), self.spec.underlying_index())?;
        let payoff = underlying.sub_scalar(self.spec.strike()).floor(0.0);
        discount_to_evaluation_time(&payoff, evaluation_time, self.spec.maturity(), provider)
    }
}
