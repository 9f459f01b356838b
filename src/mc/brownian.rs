// src/mc/brownian.rs
//! Brownian driver for the reference asset simulation
//!
//! Increments over the grid step `Δt_i` are drawn as `ΔW_i = √Δt_i * Z_i` with
//! `Z_i ~ N(0,1)`. Each path draws from its own generator keyed by
//! `(seed, path)`, which keeps a path's increments identical regardless of how
//! the paths are distributed over threads.

use crate::error::{validation::validate_paths, CvResult};
use crate::rng::{self, RngFactory};
use crate::schedule::TimeGrid;

#[derive(Clone, Debug)]
pub struct BrownianMotion {
    grid: TimeGrid,
    number_of_paths: usize,
    rng_factory: RngFactory,
}

impl BrownianMotion {
    pub fn new(grid: TimeGrid, number_of_paths: usize, seed: u64) -> CvResult<Self> {
        validate_paths(number_of_paths)?;
        Ok(BrownianMotion {
            grid,
            number_of_paths,
            rng_factory: RngFactory::new(seed),
        })
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn number_of_paths(&self) -> usize {
        self.number_of_paths
    }

    pub fn seed(&self) -> u64 {
        self.rng_factory.base_seed()
    }

    /// All increments of one path, one per grid step
    pub fn increments_for_path(&self, path: usize) -> Vec<f64> {
        let mut rng = self.rng_factory.create_path_rng(path as u64);
        (0..self.grid.number_of_steps())
            .map(|i| self.grid.step_size(i).sqrt() * rng::get_normal_draw(&mut rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increments_are_reproducible() {
        let grid = TimeGrid::uniform(0.0, 10, 0.1).unwrap();
        let driver = BrownianMotion::new(grid, 100, 1897).unwrap();
        assert_eq!(driver.increments_for_path(7), driver.increments_for_path(7));
        assert_ne!(driver.increments_for_path(7), driver.increments_for_path(8));
        assert_eq!(driver.increments_for_path(0).len(), 10);
    }

    #[test]
    fn test_terminal_value_has_unit_variance_at_time_one() {
        let grid = TimeGrid::uniform(0.0, 10, 0.1).unwrap();
        let driver = BrownianMotion::new(grid, 20_000, 7).unwrap();
        let terminal: Vec<f64> = (0..driver.number_of_paths())
            .map(|p| driver.increments_for_path(p).iter().sum())
            .collect();
        let mean = terminal.iter().sum::<f64>() / terminal.len() as f64;
        let var = terminal.iter().map(|w| (w - mean).powi(2)).sum::<f64>() / terminal.len() as f64;
        assert!(mean.abs() < 0.03, "mean {}", mean);
        assert!((var - 1.0).abs() < 0.05, "variance {}", var);
    }

    #[test]
    fn test_zero_paths_rejected() {
        let grid = TimeGrid::uniform(0.0, 10, 0.1).unwrap();
        assert!(BrownianMotion::new(grid, 0, 1).is_err());
    }
}
