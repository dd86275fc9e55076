//! Configuration management for segmentation search and ensemble training.
//!
//! All tunables that steer the search live in [`SegmentationConfig`] rather
//! than in process-wide constants, so two models can be built side by side
//! with different settings.

pub mod core;

pub use self::core::{ConfigBuilder, SegmentationConfig};
