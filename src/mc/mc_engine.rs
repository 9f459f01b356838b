// src/mc/mc_engine.rs
use crate::error::{validation::*, CvError, CvResult};
use crate::mc::brownian::BrownianMotion;
use crate::mc::control_variate::{
    ControlVariateConfig, DegeneratePolicy, DEFAULT_VARIANCE_TOLERANCE,
};
use crate::mc::sample::Sample;
use crate::mc::simulation::{AssetSimulationProvider, MonteCarloAssetSimulation};
use crate::mc::valuation::{AsianOptionWithControlVariate, Notice};
use crate::models::bachelier::BachelierModel;
use crate::models::black_scholes::BlackScholesModel;
use crate::schedule::{AveragingSchedule, OptionSpec, TimeGrid};
use bitflags::bitflags;
use tracing::info;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EstimatorSet: u32 {
        const NONE            = 0;
        const PLAIN           = 1 << 0;
        const CONTROL_VARIATE = 1 << 1;
    }
}

/// Dynamics used by the reference simulation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelKind {
    BlackScholes,
    Bachelier,
}

#[derive(Clone, Debug)]
pub struct McConfig {
    pub paths: usize,
    pub time_step: f64,
    pub seed: u64,
    pub model: ModelKind,
    pub s0: f64,
    pub r: f64,
    pub sigma: f64,
    pub strike: f64,
    pub maturity: f64,
    pub averaging_times: Vec<f64>,
    pub evaluation_time: f64,
    pub estimators: EstimatorSet,
    pub degenerate_policy: DegeneratePolicy,
    pub variance_tolerance: f64,
}

impl McConfig {
    /// Validate the Monte Carlo configuration
    pub fn validate(&self) -> CvResult<()> {
        validate_paths(self.paths)?;
        validate_positive("time_step", self.time_step)?;
        validate_finite("s0", self.s0)?;
        validate_finite("r", self.r)?;
        validate_positive("sigma", self.sigma)?;
        validate_positive("strike", self.strike)?;
        validate_positive("maturity", self.maturity)?;
        validate_non_negative("evaluation_time", self.evaluation_time)?;
        validate_non_negative("variance_tolerance", self.variance_tolerance)?;
        if self.model == ModelKind::BlackScholes {
            validate_positive("s0", self.s0)?;
        }
        validate_steps(self.number_of_steps())?;

        if self.estimators.is_empty() {
            return Err(CvError::InvalidConfiguration {
                field: "estimators".to_string(),
                reason: "at least one estimator must be requested".to_string(),
            });
        }

        let grid_end = self.number_of_steps() as f64 * self.time_step;
        if (grid_end - self.maturity).abs() > 1e-9 * self.maturity.max(1.0) {
            return Err(CvError::InvalidConfiguration {
                field: "time_step".to_string(),
                reason: format!(
                    "maturity {} is not a multiple of the time step {}",
                    self.maturity, self.time_step
                ),
            });
        }

        let grid = TimeGrid::uniform(0.0, self.number_of_steps(), self.time_step)?;
        if let Some(&time) = self
            .averaging_times
            .iter()
            .find(|&&time| grid.time_index_at(time).is_err())
        {
            return Err(CvError::InvalidConfiguration {
                field: "averaging_times".to_string(),
                reason: format!(
                    "averaging date {} is not a multiple of the time step {}",
                    time, self.time_step
                ),
            });
        }

        Ok(())
    }

    pub fn number_of_steps(&self) -> usize {
        (self.maturity / self.time_step).round() as usize
    }

    pub fn control_variate_config(&self) -> ControlVariateConfig {
        ControlVariateConfig {
            degenerate_policy: self.degenerate_policy,
            variance_tolerance: self.variance_tolerance,
        }
    }
}

impl Default for McConfig {
    fn default() -> Self {
        McConfig {
            paths: 200_000,
            time_step: 0.1,
            seed: 1897,
            model: ModelKind::BlackScholes,
            s0: 1.0,
            r: 0.05,
            sigma: 0.30,
            strike: 1.0,
            maturity: 2.0,
            averaging_times: (1..=10).map(|i| i as f64 * 0.2).collect(),
            evaluation_time: 0.0,
            estimators: EstimatorSet::PLAIN | EstimatorSet::CONTROL_VARIATE,
            degenerate_policy: DegeneratePolicy::Fail,
            variance_tolerance: DEFAULT_VARIANCE_TOLERANCE,
        }
    }
}

/// Mean and dispersion of one estimator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EstimateSummary {
    pub price: f64,
    pub standard_deviation: f64,
    pub standard_error: f64,
    pub paths: usize,
}

impl EstimateSummary {
    pub fn from_sample(method: &str, sample: &Sample) -> CvResult<Self> {
        let summary = EstimateSummary {
            price: sample.mean(),
            standard_deviation: sample.standard_deviation(),
            standard_error: sample.standard_error(),
            paths: sample.len(),
        };
        if !summary.price.is_finite() {
            return Err(CvError::NumericalInstability {
                method: method.to_string(),
                reason: format!("Price estimate is not finite: {}", summary.price),
            });
        }
        if !summary.standard_deviation.is_finite() {
            return Err(CvError::NumericalInstability {
                method: method.to_string(),
                reason: format!(
                    "Standard deviation is not finite: {}",
                    summary.standard_deviation
                ),
            });
        }
        Ok(summary)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PricingReport {
    pub plain: Option<EstimateSummary>,
    pub controlled: Option<EstimateSummary>,
    pub optimal_coefficient: Option<f64>,
    pub analytic_control_expectation: Option<f64>,
    pub notice: Option<Notice>,
}

impl PricingReport {
    /// `sd(plain) / sd(controlled)`, when both estimators ran
    pub fn variance_reduction_ratio(&self) -> Option<f64> {
        match (&self.plain, &self.controlled) {
            (Some(plain), Some(controlled)) if controlled.standard_deviation > 0.0 => {
                Some(plain.standard_deviation / controlled.standard_deviation)
            }
            _ => None,
        }
    }
}

/// Monte Carlo pricing of an arithmetic Asian call
///
/// Builds the reference simulation described by `cfg` and runs the requested
/// estimators over the same paths, so the plain and controlled results are
/// directly comparable.
///
/// # Errors
///
/// Returns `CvError` for:
/// - Invalid configuration parameters or averaging schedule
/// - A degenerate control under [`DegeneratePolicy::Fail`]
/// - Non-finite estimates
pub fn price_asian_option(cfg: &McConfig) -> CvResult<PricingReport> {
    cfg.validate()?;
    let spec = OptionSpec::new(cfg.maturity, cfg.strike, 0)?;
    let schedule = AveragingSchedule::new(cfg.averaging_times.clone(), cfg.maturity)?;
    let grid = TimeGrid::uniform(0.0, cfg.number_of_steps(), cfg.time_step)?;
    let driver = BrownianMotion::new(grid, cfg.paths, cfg.seed)?;

    info!(
        paths = cfg.paths,
        steps = cfg.number_of_steps(),
        model = ?cfg.model,
        "pricing Asian option"
    );

    match cfg.model {
        ModelKind::BlackScholes => {
            let model = BlackScholesModel::new(cfg.s0, cfg.r, cfg.sigma)?;
            let simulation = MonteCarloAssetSimulation::new(model, driver)?;
            run_estimators(cfg, spec, schedule, &simulation)
        }
        ModelKind::Bachelier => {
            let model = BachelierModel::new(cfg.s0, cfg.r, cfg.sigma)?;
            let simulation = MonteCarloAssetSimulation::new(model, driver)?;
            run_estimators(cfg, spec, schedule, &simulation)
        }
    }
}

fn run_estimators<P: AssetSimulationProvider + ?Sized>(
    cfg: &McConfig,
    spec: OptionSpec,
    schedule: AveragingSchedule,
    provider: &P,
) -> CvResult<PricingReport> {
    let option = AsianOptionWithControlVariate::new(spec, schedule)?
        .with_config(cfg.control_variate_config());

    let mut report = PricingReport {
        plain: None,
        controlled: None,
        optimal_coefficient: None,
        analytic_control_expectation: None,
        notice: None,
    };

    if cfg.estimators.contains(EstimatorSet::PLAIN) {
        let plain = option.plain().value(cfg.evaluation_time, provider)?;
        report.plain = Some(EstimateSummary::from_sample("Monte Carlo", &plain)?);
    }

    if cfg.estimators.contains(EstimatorSet::CONTROL_VARIATE) {
        let valuation = option.value(cfg.evaluation_time, provider)?;
        report.controlled = Some(EstimateSummary::from_sample(
            "Control Variate Monte Carlo",
            &valuation.sample,
        )?);
        if let Some(control) = &valuation.control {
            report.optimal_coefficient = Some(control.optimal_coefficient);
            report.analytic_control_expectation = Some(control.analytic_expectation);
        }
        report.notice = Some(valuation.notice);
    }

    Ok(report)
}
