// src/mc/sample.rs
//! Per-path Monte Carlo random variables
//!
//! A [`Sample`] holds one realisation per simulated path. All arithmetic is
//! elementwise across paths and all statistics are reductions over the path
//! dimension, so both run data-parallel. Reductions sum fixed-size chunks in
//! parallel and combine the partial sums in chunk order, so a statistic does
//! not depend on the thread count.
//!
//! # Moments
//!
//! Variance and covariance are population moments:
//! ```text
//! Var(X)    = (1/n) Σ (X_j - X̄)²
//! Cov(X, Y) = (1/n) Σ (X_j - X̄)(Y_j - Ȳ)
//! ```
//! The standard error of the mean is `sd(X) / √n`.

use crate::error::{CvError, CvResult};
use ndarray::{Array1, Zip};
use rayon::prelude::*;

const REDUCTION_CHUNK: usize = 4096;

fn chunked_sum(values: &Array1<f64>, f: impl Fn(f64) -> f64 + Sync) -> f64 {
    match values.as_slice() {
        Some(slice) => slice
            .par_chunks(REDUCTION_CHUNK)
            .map(|chunk| chunk.iter().map(|&x| f(x)).sum::<f64>())
            .collect::<Vec<f64>>()
            .into_iter()
            .sum(),
        None => values.iter().map(|&x| f(x)).sum(),
    }
}

/// One value per simulated path
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    values: Array1<f64>,
}

impl Sample {
    /// Wrap per-path values. An empty vector is rejected.
    pub fn from_vec(values: Vec<f64>) -> CvResult<Self> {
        if values.is_empty() {
            return Err(CvError::InvalidConfiguration {
                field: "sample".to_string(),
                reason: "must contain at least one path".to_string(),
            });
        }
        Ok(Sample {
            values: Array1::from(values),
        })
    }

    pub(crate) fn from_array(values: Array1<f64>) -> Self {
        debug_assert!(!values.is_empty());
        Sample { values }
    }

    /// The same value on every path
    pub fn constant(value: f64, paths: usize) -> Self {
        Sample::from_array(Array1::from_elem(paths.max(1), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }

    fn check_len(&self, other: &Sample) -> CvResult<()> {
        if self.len() != other.len() {
            return Err(CvError::SampleLengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(())
    }

    fn map_scalar(&self, f: impl Fn(f64) -> f64 + Sync + Send) -> Sample {
        let mut values = self.values.clone();
        values.par_mapv_inplace(f);
        Sample { values }
    }

    fn zip_with(
        &self,
        other: &Sample,
        f: impl Fn(f64, f64) -> f64 + Sync + Send,
    ) -> CvResult<Sample> {
        self.check_len(other)?;
        let values = Zip::from(&self.values)
            .and(&other.values)
            .par_map_collect(|&a, &b| f(a, b));
        Ok(Sample { values })
    }

    pub fn add(&self, other: &Sample) -> CvResult<Sample> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Sample) -> CvResult<Sample> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn mult(&self, other: &Sample) -> CvResult<Sample> {
        self.zip_with(other, |a, b| a * b)
    }

    pub fn div(&self, other: &Sample) -> CvResult<Sample> {
        self.zip_with(other, |a, b| a / b)
    }

    pub fn add_scalar(&self, value: f64) -> Sample {
        self.map_scalar(move |x| x + value)
    }

    pub fn sub_scalar(&self, value: f64) -> Sample {
        self.map_scalar(move |x| x - value)
    }

    pub fn mult_scalar(&self, value: f64) -> Sample {
        self.map_scalar(move |x| x * value)
    }

    pub fn div_scalar(&self, value: f64) -> Sample {
        self.map_scalar(move |x| x / value)
    }

    /// Pathwise `max(x, floor)`
    pub fn floor(&self, floor: f64) -> Sample {
        self.map_scalar(move |x| x.max(floor))
    }

    pub fn mean(&self) -> f64 {
        chunked_sum(&self.values, |x| x) / self.len() as f64
    }

    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        chunked_sum(&self.values, |x| (x - mean) * (x - mean)) / self.len() as f64
    }

    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Standard error of the sample mean
    pub fn standard_error(&self) -> f64 {
        self.standard_deviation() / (self.len() as f64).sqrt()
    }

    pub fn covariance(&self, other: &Sample) -> CvResult<f64> {
        self.check_len(other)?;
        let (mean_x, mean_y) = (self.mean(), other.mean());
        let products = Zip::from(&self.values)
            .and(&other.values)
            .par_map_collect(|&x, &y| (x - mean_x) * (y - mean_y));
        Ok(chunked_sum(&products, |x| x) / self.len() as f64)
    }
}
