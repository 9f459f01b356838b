// src/mc/simulation.rs
//! Asset simulation: the provider interface consumed by products, and a
//! reference Monte Carlo implementation driven by a [`BrownianMotion`].
//!
//! Paths are generated once at construction, in parallel over paths, and
//! stored as a `(times × paths)` matrix so that every observation date is a
//! contiguous row.

use crate::error::{CvError, CvResult};
use crate::mc::brownian::BrownianMotion;
use crate::mc::sample::Sample;
use crate::models::model::{AssetModel, ModelDescriptor};
use ndarray::{Array1, Array2};
use rayon::prelude::*;

/// Source of simulated asset values and numeraires for valuation
pub trait AssetSimulationProvider {
    fn number_of_paths(&self) -> usize;

    /// Time at which the simulated state is deterministic
    fn initial_time(&self) -> f64;

    /// Per-path value of asset `asset_index` at `time`
    fn asset_value_at(&self, time: f64, asset_index: usize) -> CvResult<Sample>;

    /// Per-path numeraire at `time`
    fn numeraire(&self, time: f64) -> CvResult<Sample>;

    fn model_descriptor(&self) -> ModelDescriptor;

    fn constant_sample(&self, value: f64) -> Sample {
        Sample::constant(value, self.number_of_paths())
    }
}

/// Single-asset Monte Carlo simulation of an [`AssetModel`]
pub struct MonteCarloAssetSimulation<M: AssetModel> {
    model: M,
    driver: BrownianMotion,
    paths: Array2<f64>,
}

impl<M: AssetModel> MonteCarloAssetSimulation<M> {
    pub fn new(model: M, driver: BrownianMotion) -> CvResult<Self> {
        let grid = driver.grid();
        let n_times = grid.times().len();
        let n_paths = driver.number_of_paths();
        let s0 = model.initial_value();

        let trajectories: Vec<Vec<f64>> = (0..n_paths)
            .into_par_iter()
            .map(|path| {
                let increments = driver.increments_for_path(path);
                let mut values = Vec::with_capacity(n_times);
                values.push(s0);
                let mut s = s0;
                for (i, dw) in increments.iter().enumerate() {
                    s = model.evolve(s, grid.step_size(i), *dw);
                    values.push(s);
                }
                values
            })
            .collect();

        if let Some((path, _)) = trajectories
            .iter()
            .enumerate()
            .find(|(_, values)| values.iter().any(|s| !s.is_finite()))
        {
            return Err(CvError::Simulation {
                reason: format!("{} path {} produced a non-finite value", model.name(), path),
            });
        }

        let paths = Array2::from_shape_fn((n_times, n_paths), |(t, p)| trajectories[p][t]);

        Ok(MonteCarloAssetSimulation {
            model,
            driver,
            paths,
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn driver(&self) -> &BrownianMotion {
        &self.driver
    }
}

impl<M: AssetModel> AssetSimulationProvider for MonteCarloAssetSimulation<M> {
    fn number_of_paths(&self) -> usize {
        self.driver.number_of_paths()
    }

    fn initial_time(&self) -> f64 {
        self.driver.grid().initial_time()
    }

    fn asset_value_at(&self, time: f64, asset_index: usize) -> CvResult<Sample> {
        if asset_index != 0 {
            return Err(CvError::InvalidParameters {
                parameter: "asset_index".to_string(),
                value: asset_index as f64,
                constraint: "single-asset simulation only provides index 0".to_string(),
            });
        }
        let index = self.driver.grid().time_index_at(time)?;
        Ok(Sample::from_array(self.paths.row(index).to_owned()))
    }

    fn numeraire(&self, time: f64) -> CvResult<Sample> {
        let grid = self.driver.grid();
        let index = grid.time_index_at(time)?;
        let elapsed = grid.times()[index] - grid.initial_time();
        let value = (self.model.risk_free_rate() * elapsed).exp();
        Ok(Sample::from_array(Array1::from_elem(
            self.number_of_paths(),
            value,
        )))
    }

    fn model_descriptor(&self) -> ModelDescriptor {
        self.model.descriptor()
    }
}
