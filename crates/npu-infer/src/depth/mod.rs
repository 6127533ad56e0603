mod estimator;
mod postprocess;

pub use estimator::DepthEstimator;
pub use postprocess::{DepthMap, decode_depth};
