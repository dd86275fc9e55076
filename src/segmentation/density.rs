//! Smoothed value density and its normalized second derivative.
//!
//! Every value is spread over a fixed-resolution curve as a Gaussian kernel of
//! unit mass. The second derivative of that curve is high in the valleys
//! between modes, which is where a cut point separates the data most
//! naturally.

use crate::config::SegmentationConfig;
use crate::core::error::{CompositeError, Result};
use crate::segmentation::normalize_min_max;
use std::f64::consts::PI;

/// Mass below which a clipped kernel is folded back onto the nearest edge.
const FOLD_THRESHOLD: f64 = 0.99;

/// Density curve over a padded value range, sampled at a fixed resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityProfile {
    low: f64,
    high: f64,
    heights: Vec<f64>,
    curvature: Vec<f64>,
}

impl DensityProfile {
    /// Build the profile of `values`.
    ///
    /// * `samples` - resolution of the curve (at least 5)
    /// * `bandwidth` - kernel standard deviation, in value units
    /// * `padding` - range added below the smallest and above the largest value
    pub fn from_values(values: &[f64], samples: usize, bandwidth: f64, padding: f64) -> Result<Self> {
        if values.is_empty() {
            return Err(CompositeError::insufficient_data(
                "cannot build a density profile without values",
            ));
        }
        if samples < 5 {
            return Err(CompositeError::invalid_parameter(
                "density_samples",
                samples.to_string(),
                "must be at least 5",
            ));
        }
        if !(bandwidth > 0.0 && bandwidth.is_finite()) {
            return Err(CompositeError::invalid_parameter(
                "density_bandwidth",
                bandwidth.to_string(),
                "must be positive and finite",
            ));
        }

        let (lo, hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let low = lo - padding;
        let high = hi + padding;
        if !(high > low && (high - low).is_finite()) {
            return Err(CompositeError::insufficient_data(format!(
                "value range [{}, {}] is empty after padding",
                low, high
            )));
        }

        let scale = samples as f64 / (high - low);
        let sigma = bandwidth * scale;
        let mut heights = vec![0.0; samples];
        for &v in values {
            plot_gaussian(&mut heights, (v - low) * scale, sigma);
        }

        let mut first = vec![0.0; samples];
        for n in 1..samples - 1 {
            first[n] = heights[n + 1] - heights[n - 1];
        }
        let mut curvature = vec![0.0; samples];
        for n in 2..samples - 2 {
            curvature[n] = first[n + 1] - first[n - 1];
        }
        normalize_min_max(&mut curvature);

        Ok(DensityProfile {
            low,
            high,
            heights,
            curvature,
        })
    }

    /// Build the profile with the resolution, bandwidth and padding of `config`.
    pub fn from_config(values: &[f64], config: &SegmentationConfig) -> Result<Self> {
        Self::from_values(
            values,
            config.density_samples,
            config.density_bandwidth,
            config.density_padding,
        )
    }

    /// Lower end of the padded range.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper end of the padded range.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Number of samples on the curve.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Always false; a profile holds at least five samples.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Raw density samples; their sum is the number of input values.
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Second derivative, min-max normalized to `[0, 1]`.
    pub fn curvature(&self) -> &[f64] {
        &self.curvature
    }

    /// Fractional sample position of a value.
    pub fn position(&self, value: f64) -> f64 {
        (value - self.low) / (self.high - self.low) * self.heights.len() as f64
    }

    /// Normalized curvature at a value (1 = deepest valley).
    pub fn curvature_at(&self, value: f64) -> f64 {
        interpolate(&self.curvature, self.position(value))
    }

    /// Density at a value.
    pub fn density_at(&self, value: f64) -> f64 {
        interpolate(&self.heights, self.position(value))
    }
}

/// Add a unit-mass Gaussian centred at sample position `x`.
fn plot_gaussian(y: &mut [f64], x: f64, sigma: f64) {
    let k = 1.0 / (2.0 * PI * sigma * sigma).sqrt();
    let a = 1.0 / (2.0 * sigma * sigma);

    let mut total = 0.0;
    for (n, slot) in y.iter_mut().enumerate() {
        let d = n as f64 - x;
        let v = k * (-d * d * a).exp();
        total += v;
        *slot += v;
    }

    if total < FOLD_THRESHOLD {
        let extra = 1.0 - total;
        let edge = if 2.0 * x < y.len() as f64 { 0 } else { y.len() - 1 };
        y[edge] += extra;
    }
}

/// Linearly interpolated read of `y` at fractional index `x`, clamped to the
/// first and last sample.
pub fn interpolate(y: &[f64], x: f64) -> f64 {
    let Some(&last) = y.last() else { return 0.0 };
    if x.is_nan() || x < 0.0 {
        return y[0];
    }
    if x >= (y.len() - 1) as f64 {
        return last;
    }
    let ix = x.floor() as usize;
    let rx = x - ix as f64;
    y[ix] * (1.0 - rx) + y[ix + 1] * rx
}
