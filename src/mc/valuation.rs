// src/mc/valuation.rs
//! Valuation entry point: Asian option with a Black–Scholes control variate
//!
//! One linear pass per call:
//! 1. value the plain Asian payoff `Z`
//! 2. dispatch on the model capability
//! 3. if capable: control sample `Y`, closed-form `E[Y]`, `β*`, combined sample
//! 4. otherwise: return `Z` untouched with a [`Notice`]

use crate::analytics::bs_analytic::{AnalyticPricer, BlackScholesFormulas};
use crate::error::{validation::validate_finite, CvResult};
use crate::mc::control_variate::{
    analytic_control_expectation, combine, control_variate_sample, optimal_coefficient,
    ControlVariateConfig, ControlVariateResult,
};
use crate::mc::payoffs::AsianOption;
use crate::mc::sample::Sample;
use crate::mc::simulation::AssetSimulationProvider;
use crate::models::model::{BlackScholesParameters, ModelDescriptor};
use crate::schedule::{AveragingSchedule, OptionSpec, TIME_TOLERANCE};
use std::fmt;
use tracing::{debug, warn};

/// Why no closed-form control is available
#[derive(Clone, Debug, PartialEq)]
pub enum IncapabilityReason {
    /// The simulated model has no Black–Scholes parametrisation
    NotBlackScholes { model: String },
    /// The spot is random at the evaluation time, so `E[Y]` is not a scalar
    EvaluationAfterStart {
        evaluation_time: f64,
        initial_time: f64,
    },
    /// The simulation carries no state before its initial time
    EvaluationBeforeStart {
        evaluation_time: f64,
        initial_time: f64,
    },
}

impl fmt::Display for IncapabilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncapabilityReason::NotBlackScholes { model } => {
                write!(f, "model '{}' is not Black-Scholes", model)
            }
            IncapabilityReason::EvaluationAfterStart {
                evaluation_time,
                initial_time,
            } => write!(
                f,
                "evaluation time {} is after the simulation start {}",
                evaluation_time, initial_time
            ),
            IncapabilityReason::EvaluationBeforeStart {
                evaluation_time,
                initial_time,
            } => write!(
                f,
                "evaluation time {} is before the simulation start {}",
                evaluation_time, initial_time
            ),
        }
    }
}

/// Outcome of the capability dispatch
#[derive(Clone, Debug, PartialEq)]
pub enum ModelCapability {
    BlackScholesCapable(BlackScholesParameters),
    Incapable(IncapabilityReason),
}

/// Decide whether the closed-form control can be used for this provider
pub fn model_capability<P: AssetSimulationProvider + ?Sized>(
    provider: &P,
    evaluation_time: f64,
) -> ModelCapability {
    match provider.model_descriptor() {
        ModelDescriptor::Other { name } => {
            ModelCapability::Incapable(IncapabilityReason::NotBlackScholes { model: name })
        }
        ModelDescriptor::BlackScholesLike(params) => {
            let initial_time = provider.initial_time();
            if evaluation_time > initial_time + TIME_TOLERANCE {
                ModelCapability::Incapable(IncapabilityReason::EvaluationAfterStart {
                    evaluation_time,
                    initial_time,
                })
            } else if evaluation_time < initial_time - TIME_TOLERANCE {
                ModelCapability::Incapable(IncapabilityReason::EvaluationBeforeStart {
                    evaluation_time,
                    initial_time,
                })
            } else {
                ModelCapability::BlackScholesCapable(params)
            }
        }
    }
}

/// Diagnostic attached to a valuation
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// Control variate applied with the estimated coefficient
    VarianceReduced,
    /// Plain Monte Carlo returned unmodified
    NoVarianceReduction { reason: IncapabilityReason },
    /// Control sample was degenerate and `β = 0` was used
    ZeroCoefficientFallback { control_variance: f64 },
}

impl Notice {
    pub fn variance_reduced(&self) -> bool {
        matches!(self, Notice::VarianceReduced)
    }
}

/// Per-path estimator plus its diagnostics
#[derive(Clone, Debug, PartialEq)]
pub struct Valuation {
    pub sample: Sample,
    pub notice: Notice,
    pub control: Option<ControlVariateResult>,
}

impl Valuation {
    pub fn price(&self) -> f64 {
        self.sample.mean()
    }

    pub fn standard_error(&self) -> f64 {
        self.sample.standard_error()
    }
}

/// Asian call valued with the average-of-calls control variate
#[derive(Clone, Debug)]
pub struct AsianOptionWithControlVariate<A: AnalyticPricer = BlackScholesFormulas> {
    option: AsianOption,
    pricer: A,
    config: ControlVariateConfig,
}

impl AsianOptionWithControlVariate<BlackScholesFormulas> {
    pub fn new(spec: OptionSpec, schedule: AveragingSchedule) -> CvResult<Self> {
        Self::with_pricer(spec, schedule, BlackScholesFormulas)
    }
}

impl<A: AnalyticPricer> AsianOptionWithControlVariate<A> {
    pub fn with_pricer(spec: OptionSpec, schedule: AveragingSchedule, pricer: A) -> CvResult<Self> {
        Ok(AsianOptionWithControlVariate {
            option: AsianOption::new(spec, schedule)?,
            pricer,
            config: ControlVariateConfig::default(),
        })
    }

    pub fn with_config(mut self, config: ControlVariateConfig) -> Self {
        self.config = config;
        self
    }

    /// The product valued without variance reduction
    pub fn plain(&self) -> &AsianOption {
        &self.option
    }

    pub fn config(&self) -> &ControlVariateConfig {
        &self.config
    }

    pub fn value<P: AssetSimulationProvider + ?Sized>(
        &self,
        evaluation_time: f64,
        provider: &P,
    ) -> CvResult<Valuation> {
        validate_finite("evaluation_time", evaluation_time)?;
        let standard_payoff = self.option.value(evaluation_time, provider)?;

        let params = match model_capability(provider, evaluation_time) {
            ModelCapability::BlackScholesCapable(params) => params,
            ModelCapability::Incapable(reason) => {
                warn!(%reason, "no closed-form control variate, performing standard Monte Carlo");
                return Ok(Valuation {
                    sample: standard_payoff,
                    notice: Notice::NoVarianceReduction { reason },
                    control: None,
                });
            }
        };

        let spec = self.option.spec();
        let schedule = self.option.schedule();
        let control =
            control_variate_sample(schedule, spec, &params, evaluation_time, provider)?;
        let estimate = optimal_coefficient(&standard_payoff, &control, &self.config)?;
        let expectation =
            analytic_control_expectation(&self.pricer, &params, schedule, spec, evaluation_time);

        debug!(
            coefficient = estimate.coefficient,
            covariance = estimate.covariance,
            control_variance = estimate.control_variance,
            analytic_expectation = expectation,
            simulated_expectation = control.mean(),
            "control variate estimated"
        );

        let sample = combine(&standard_payoff, &control, expectation, estimate.coefficient)?;
        let notice = if estimate.degenerate {
            Notice::ZeroCoefficientFallback {
                control_variance: estimate.control_variance,
            }
        } else {
            Notice::VarianceReduced
        };

        Ok(Valuation {
            sample,
            notice,
            control: Some(ControlVariateResult {
                simulated_sample: control,
                analytic_expectation: expectation,
                optimal_coefficient: estimate.coefficient,
            }),
        })
    }
}
