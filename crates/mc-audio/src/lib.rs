// MFCC feature extraction: Mel scale, filter bank, DCT-II, spectral analysis.

pub mod batch;
pub mod dct;
pub mod decode;
pub mod filterbank;
pub mod lifter;
pub mod pipeline;
pub mod scale;
pub mod spectrum;
pub mod window;

pub use pipeline::MfccPipeline;
