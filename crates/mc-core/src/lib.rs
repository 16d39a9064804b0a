/// Configuration, error and result types shared across melcep.
///
/// This crate has no numerical code: the pipeline lives in `mc-audio`,
/// the command line in `mc-app`.

pub mod config;
pub mod error;
pub mod features;

pub use config::MfccConfig;
pub use error::MfccError;
pub use features::FeatureMatrix;
