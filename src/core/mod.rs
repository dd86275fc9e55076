//! Core infrastructure: error handling, fundamental types, default tunables
//! and the collaborator traits.
//!
//! - [`types`]: scalar aliases and [`ValidationKind`]
//! - [`constants`]: documented defaults for [`SegmentationConfig`](crate::config::SegmentationConfig)
//! - [`error`]: [`CompositeError`] and the crate-wide [`Result`]
//! - [`traits`]: [`Classifier`] and [`FeatureExtractor`]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{CompositeError, Result};
pub use traits::*;
pub use types::*;

use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/// Initialize logging for the library.
///
/// Installs an `env_logger` backend that honours `RUST_LOG` and falls back to
/// `info`. Calling it more than once, or after the application installed its
/// own logger, is harmless.
pub fn initialize_core() -> Result<()> {
    LOGGING_INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("info");
        if env_logger::Builder::from_env(env).try_init().is_ok() {
            log::debug!("composite-bayes {} logging initialized", COMPOSITE_BAYES_VERSION);
        }
    });
    Ok(())
}

/// Check if [`initialize_core`] has run.
pub fn is_core_initialized() -> bool {
    LOGGING_INIT.is_completed()
}
