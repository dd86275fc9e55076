//! Core configuration structure and builder for segmentation and ensemble
//! training.

use crate::core::constants::*;
use crate::core::error::{CompositeError, Result};
use crate::core::types::ValidationKind;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Every tunable used by the segmentation search, the diversity subsampler
/// and the ensemble builder.
///
/// Defaults come from [`crate::core::constants`]. Use [`ConfigBuilder`] to
/// construct a validated instance, or deserialize one from JSON/TOML with
/// [`SegmentationConfig::load_from_file`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    // Bin count
    /// Fewest bins the search is allowed to produce
    pub min_bins: usize,
    /// Most bins the search is allowed to produce
    pub max_bins: usize,

    // Search effort
    /// Entries beyond this count are diversified down before scoring cut points
    pub subsample_size: usize,
    /// Runner-up cut points kept for iterative refinement
    pub max_candidates: usize,
    /// Refinement stops when the best two-partition ROC falls below this
    pub min_roc_split: f64,
    /// Smallest fraction of all entries a bin may hold
    pub min_bin_fraction: f64,
    /// Percentile of balance ratios that is rescaled to 1
    pub balance_percentile: f64,

    // Density curve
    /// Number of samples in the smoothed density curve
    pub density_samples: usize,
    /// Gaussian kernel width in value units
    pub density_bandwidth: f64,
    /// Extra value range added on each side of the observed values
    pub density_padding: f64,

    // Diversity subsampler
    /// Number of recent picks each candidate is compared against
    pub similarity_window: usize,
    /// Minimum forward scan at each sampling position
    pub scan_window: usize,

    // Ensemble
    /// Cross-validation protocol used for each per-bin model
    pub ensemble_validation: ValidationKind,

    // Execution
    /// Worker threads for parallel scoring (0 = global rayon pool)
    pub num_threads: usize,
    /// Seed used by [`split_holdout_with`](crate::dataset::split_holdout_with)
    pub partition_seed: u64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        SegmentationConfig {
            min_bins: DEFAULT_MIN_BINS,
            max_bins: DEFAULT_MAX_BINS,
            subsample_size: DEFAULT_SUBSAMPLE_SIZE,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            min_roc_split: DEFAULT_MIN_ROC_SPLIT,
            min_bin_fraction: DEFAULT_MIN_BIN_FRACTION,
            balance_percentile: DEFAULT_BALANCE_PERCENTILE,
            density_samples: DEFAULT_DENSITY_SAMPLES,
            density_bandwidth: DEFAULT_DENSITY_BANDWIDTH,
            density_padding: DEFAULT_DENSITY_PADDING,
            similarity_window: DEFAULT_SIMILARITY_WINDOW,
            scan_window: DEFAULT_SCAN_WINDOW,
            ensemble_validation: DEFAULT_ENSEMBLE_VALIDATION,
            num_threads: DEFAULT_NUM_THREADS,
            partition_seed: DEFAULT_PARTITION_SEED,
        }
    }
}

impl SegmentationConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.min_bins < MIN_BINS_FLOOR {
            return Err(CompositeError::invalid_parameter(
                "min_bins",
                self.min_bins.to_string(),
                format!("must be at least {}", MIN_BINS_FLOOR),
            ));
        }

        if self.max_bins > MAX_BINS_CEILING {
            return Err(CompositeError::invalid_parameter(
                "max_bins",
                self.max_bins.to_string(),
                format!("must be at most {}", MAX_BINS_CEILING),
            ));
        }

        if self.min_bins > self.max_bins {
            return Err(CompositeError::invalid_configuration(format!(
                "min_bins ({}) exceeds max_bins ({})",
                self.min_bins, self.max_bins
            )));
        }

        // The subsampler needs at least two sampling positions per pass
        if self.subsample_size < 10 {
            return Err(CompositeError::invalid_parameter(
                "subsample_size",
                self.subsample_size.to_string(),
                "must be at least 10",
            ));
        }

        if !(self.min_bin_fraction > 0.0 && self.min_bin_fraction < 1.0) {
            return Err(CompositeError::invalid_parameter(
                "min_bin_fraction",
                self.min_bin_fraction.to_string(),
                "must be in range (0.0, 1.0)",
            ));
        }

        if !(0.0..=1.0).contains(&self.min_roc_split) {
            return Err(CompositeError::invalid_parameter(
                "min_roc_split",
                self.min_roc_split.to_string(),
                "must be in range [0.0, 1.0]",
            ));
        }

        if !(self.balance_percentile > 0.0 && self.balance_percentile <= 1.0) {
            return Err(CompositeError::invalid_parameter(
                "balance_percentile",
                self.balance_percentile.to_string(),
                "must be in range (0.0, 1.0]",
            ));
        }

        if self.density_samples < 5 {
            return Err(CompositeError::invalid_parameter(
                "density_samples",
                self.density_samples.to_string(),
                "must be at least 5",
            ));
        }

        if !(self.density_bandwidth > 0.0 && self.density_bandwidth.is_finite()) {
            return Err(CompositeError::invalid_parameter(
                "density_bandwidth",
                self.density_bandwidth.to_string(),
                "must be positive",
            ));
        }

        if !(self.density_padding >= 0.0 && self.density_padding.is_finite()) {
            return Err(CompositeError::invalid_parameter(
                "density_padding",
                self.density_padding.to_string(),
                "must be non-negative",
            ));
        }

        if self.similarity_window == 0 {
            return Err(CompositeError::invalid_parameter(
                "similarity_window",
                "0",
                "must be at least 1",
            ));
        }

        if self.scan_window == 0 {
            return Err(CompositeError::invalid_parameter(
                "scan_window",
                "0",
                "must be at least 1",
            ));
        }

        if self.num_threads > num_cpus::get() * 2 {
            log::warn!(
                "num_threads ({}) is much larger than available cores ({})",
                self.num_threads,
                num_cpus::get()
            );
        }

        Ok(())
    }

    /// Smallest permitted bin population for a data set of `total` entries.
    pub fn min_bin_size(&self, total: usize) -> usize {
        // Nudge below the product so that e.g. 0.05 * 60 stays 3 rather than 4
        let exact = self.min_bin_fraction * total as f64;
        (exact - 1e-9).ceil().max(0.0) as usize
    }

    /// Largest permitted number of segments (cut points).
    pub fn max_segments(&self) -> usize {
        self.max_bins.saturating_sub(1)
    }

    /// Run `op` on the configured thread pool, or the global pool when
    /// `num_threads` is 0.
    pub fn install<R, F>(&self, op: F) -> Result<R>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        if self.num_threads == 0 {
            return Ok(op());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()
            .map_err(|e| CompositeError::internal(format!("Failed to create thread pool: {}", e)))?;
        Ok(pool.install(op))
    }

    /// Load configuration from a `.json` or `.toml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompositeError::config(format!("Failed to read config file: {}", e)))?;

        let config: SegmentationConfig = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| CompositeError::config(format!("Failed to parse JSON config: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| CompositeError::config(format!("Failed to parse TOML config: {}", e)))?,
            _ => {
                return Err(CompositeError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| CompositeError::config(format!("Failed to serialize to JSON: {}", e)))?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| CompositeError::config(format!("Failed to serialize to TOML: {}", e)))?,
            _ => {
                return Err(CompositeError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)
            .map_err(|e| CompositeError::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Override fields from `COMPOSITE_*` environment variables.
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        fn read<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
            match std::env::var(name) {
                Ok(val) => val
                    .parse()
                    .map(Some)
                    .map_err(|_| CompositeError::config(format!("Invalid {}", name))),
                Err(_) => Ok(None),
            }
        }

        if let Some(n) = read::<usize>("COMPOSITE_MIN_BINS")? {
            self.min_bins = n;
        }
        if let Some(n) = read::<usize>("COMPOSITE_MAX_BINS")? {
            self.max_bins = n;
        }
        if let Some(n) = read::<usize>("COMPOSITE_SUBSAMPLE_SIZE")? {
            self.subsample_size = n;
        }
        if let Some(n) = read::<usize>("COMPOSITE_NUM_THREADS")? {
            self.num_threads = n;
        }

        self.validate()
    }

    /// Flatten the configuration into name/value strings for logging.
    pub fn as_parameter_map(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert("min_bins".to_string(), self.min_bins.to_string());
        params.insert("max_bins".to_string(), self.max_bins.to_string());
        params.insert("subsample_size".to_string(), self.subsample_size.to_string());
        params.insert("max_candidates".to_string(), self.max_candidates.to_string());
        params.insert("min_roc_split".to_string(), self.min_roc_split.to_string());
        params.insert("min_bin_fraction".to_string(), self.min_bin_fraction.to_string());
        params.insert("balance_percentile".to_string(), self.balance_percentile.to_string());
        params.insert("density_samples".to_string(), self.density_samples.to_string());
        params.insert("density_bandwidth".to_string(), self.density_bandwidth.to_string());
        params.insert("density_padding".to_string(), self.density_padding.to_string());
        params.insert("similarity_window".to_string(), self.similarity_window.to_string());
        params.insert("scan_window".to_string(), self.scan_window.to_string());
        params.insert("ensemble_validation".to_string(), self.ensemble_validation.to_string());
        params.insert("num_threads".to_string(), self.num_threads.to_string());
        params.insert("partition_seed".to_string(), self.partition_seed.to_string());
        params
    }
}

/// Builder pattern for [`SegmentationConfig`]
#[derive(Debug)]
pub struct ConfigBuilder {
    config: SegmentationConfig,
    validation_errors: Vec<String>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        ConfigBuilder {
            config: SegmentationConfig::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the minimum number of bins; values below 3 are raised to 3
    pub fn min_bins(mut self, nbins: usize) -> Self {
        self.config.min_bins = nbins.max(MIN_BINS_FLOOR);
        self
    }

    /// Set the maximum number of bins; values above 20 are lowered to 20
    pub fn max_bins(mut self, nbins: usize) -> Self {
        self.config.max_bins = nbins.min(MAX_BINS_CEILING);
        self
    }

    /// Pin both the minimum and maximum number of bins
    pub fn num_bins(self, nbins: usize) -> Self {
        self.min_bins(nbins).max_bins(nbins)
    }

    /// Set the subsample cap
    pub fn subsample_size(mut self, size: usize) -> Self {
        self.config.subsample_size = size;
        self
    }

    /// Set the refinement candidate cap
    pub fn max_candidates(mut self, count: usize) -> Self {
        self.config.max_candidates = count;
        self
    }

    /// Set the minimum two-partition ROC for accepting further segments
    pub fn min_roc_split(mut self, roc: f64) -> Self {
        if !(0.0..=1.0).contains(&roc) {
            self.validation_errors
                .push("min_roc_split must be in range [0.0, 1.0]".to_string());
        }
        self.config.min_roc_split = roc;
        self
    }

    /// Set the minimum bin fraction
    pub fn min_bin_fraction(mut self, fraction: f64) -> Self {
        if fraction <= 0.0 || fraction >= 1.0 {
            self.validation_errors
                .push("min_bin_fraction must be in range (0.0, 1.0)".to_string());
        }
        self.config.min_bin_fraction = fraction;
        self
    }

    /// Set the balance-ratio percentile
    pub fn balance_percentile(mut self, percentile: f64) -> Self {
        self.config.balance_percentile = percentile;
        self
    }

    /// Set the density curve resolution
    pub fn density_samples(mut self, samples: usize) -> Self {
        self.config.density_samples = samples;
        self
    }

    /// Set the density kernel width
    pub fn density_bandwidth(mut self, bandwidth: f64) -> Self {
        self.config.density_bandwidth = bandwidth;
        self
    }

    /// Set the subsampler similarity window
    pub fn similarity_window(mut self, window: usize) -> Self {
        self.config.similarity_window = window;
        self
    }

    /// Set the subsampler scan window
    pub fn scan_window(mut self, window: usize) -> Self {
        self.config.scan_window = window;
        self
    }

    /// Set the per-bin cross-validation protocol
    pub fn ensemble_validation(mut self, kind: ValidationKind) -> Self {
        self.config.ensemble_validation = kind;
        self
    }

    /// Set the number of worker threads
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Set the hold-out partitioning seed
    pub fn partition_seed(mut self, seed: u64) -> Self {
        self.config.partition_seed = seed;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<SegmentationConfig> {
        if !self.validation_errors.is_empty() {
            return Err(CompositeError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
