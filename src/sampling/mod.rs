//! Subsampling of entries for the cut-point search.

pub mod diversity;
pub mod similarity;

pub use diversity::DiversitySubsampler;
pub use similarity::tanimoto;
