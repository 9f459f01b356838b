// src/schedule.rs
//! Time discretisations: the simulation grid and the averaging schedule of an
//! Asian option, plus the immutable option specification.

use crate::error::{validation::*, CvError, CvResult};

/// Two times closer than this are treated as the same date
pub const TIME_TOLERANCE: f64 = 1e-12;

/// Uniform simulation grid `t_0, t_0 + Δt, ..., t_0 + nΔt`
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    pub fn uniform(initial_time: f64, number_of_steps: usize, step: f64) -> CvResult<Self> {
        validate_finite("initial_time", initial_time)?;
        validate_steps(number_of_steps)?;
        validate_positive("step", step)?;
        let times = (0..=number_of_steps)
            .map(|i| initial_time + i as f64 * step)
            .collect();
        Ok(TimeGrid { times })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn initial_time(&self) -> f64 {
        self.times[0]
    }

    pub fn last_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    pub fn number_of_steps(&self) -> usize {
        self.times.len() - 1
    }

    pub fn step_size(&self, index: usize) -> f64 {
        self.times[index + 1] - self.times[index]
    }

    /// Index of the grid time equal to `time` (within [`TIME_TOLERANCE`]).
    ///
    /// Times between grid points are rejected: a simulated value observed at a
    /// neighbouring grid time would not be the value at `time`.
    pub fn time_index_at(&self, time: f64) -> CvResult<usize> {
        let nearest = if time.is_finite() {
            let above = self.times.partition_point(|&t| t < time);
            [above.checked_sub(1), Some(above)]
                .into_iter()
                .flatten()
                .filter(|&i| i < self.times.len())
                .min_by(|&a, &b| {
                    (self.times[a] - time)
                        .abs()
                        .total_cmp(&(self.times[b] - time).abs())
                })
        } else {
            None
        };

        match nearest {
            Some(index) if (self.times[index] - time).abs() <= TIME_TOLERANCE => Ok(index),
            _ => Err(CvError::InvalidParameters {
                parameter: "time".to_string(),
                value: time,
                constraint: format!(
                    "must be a simulation grid time in [{}, {}] with step {}",
                    self.initial_time(),
                    self.last_time(),
                    self.step_size(0)
                ),
            }),
        }
    }
}

/// Strictly increasing averaging dates `t_1 < ... < t_n` with `t_n` the maturity
#[derive(Clone, Debug, PartialEq)]
pub struct AveragingSchedule {
    times: Vec<f64>,
}

impl AveragingSchedule {
    pub fn new(times: Vec<f64>, maturity: f64) -> CvResult<Self> {
        let last = match times.last() {
            Some(&last) => last,
            None => {
                return Err(CvError::ScheduleValidation {
                    reason: "averaging schedule is empty".to_string(),
                })
            }
        };
        if let Some(bad) = times.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(CvError::ScheduleValidation {
                reason: format!("averaging time {} must be finite and non-negative", bad),
            });
        }
        if let Some(pair) = times.windows(2).find(|w| w[1] <= w[0]) {
            return Err(CvError::ScheduleValidation {
                reason: format!(
                    "averaging times must be strictly increasing, found {} followed by {}",
                    pair[0], pair[1]
                ),
            });
        }
        if (last - maturity).abs() > TIME_TOLERANCE {
            return Err(CvError::ScheduleValidation {
                reason: format!(
                    "last averaging time {} differs from maturity {}",
                    last, maturity
                ),
            });
        }
        Ok(AveragingSchedule { times })
    }

    /// `count` equally spaced dates ending at `maturity`
    pub fn uniform(maturity: f64, count: usize) -> CvResult<Self> {
        validate_positive("maturity", maturity)?;
        if count == 0 {
            return Err(CvError::ScheduleValidation {
                reason: "averaging schedule is empty".to_string(),
            });
        }
        let step = maturity / count as f64;
        let mut times: Vec<f64> = (1..count).map(|i| i as f64 * step).collect();
        times.push(maturity);
        Self::new(times, maturity)
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.times[0]
    }

    pub fn maturity(&self) -> f64 {
        self.times[self.times.len() - 1]
    }
}

/// Strike, maturity and underlying of a single-asset option
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptionSpec {
    maturity: f64,
    strike: f64,
    underlying_index: usize,
}

impl OptionSpec {
    pub fn new(maturity: f64, strike: f64, underlying_index: usize) -> CvResult<Self> {
        validate_finite("maturity", maturity)?;
        validate_positive("maturity", maturity)?;
        validate_finite("strike", strike)?;
        validate_positive("strike", strike)?;
        Ok(OptionSpec {
            maturity,
            strike,
            underlying_index,
        })
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn underlying_index(&self) -> usize {
        self.underlying_index
    }
}
