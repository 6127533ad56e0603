use crate::{DepthEstimator, DepthMap, InferError, PoseEstimator, PoseResult};
use npu_base::Tensor;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// A pipeline that turns one RGB image into one result.
pub trait Estimator: Send + 'static {
    type Output: Send + 'static;

    fn estimate(&mut self, image: &Tensor<u8>) -> Result<Self::Output, InferError>;
}

impl Estimator for PoseEstimator {
    type Output = PoseResult;

    fn estimate(&mut self, image: &Tensor<u8>) -> Result<PoseResult, InferError> {
        PoseEstimator::estimate(self, image)
    }
}

impl Estimator for DepthEstimator {
    type Output = DepthMap;

    fn estimate(&mut self, image: &Tensor<u8>) -> Result<DepthMap, InferError> {
        DepthEstimator::estimate(self, image)
    }
}

/// Receives the outcome of each processed image.
///
/// Exactly one method is called per `Worker::process` call.
pub trait ResultSink<T>: Send + Sync {
    fn on_result(&self, result: T, elapsed_ms: u64);

    fn on_error(&self, error: InferError);

    /// The runtime has no valid buffer set; nothing was run.
    fn on_unavailable(&self);
}

/// Runs an estimator off the async executor, one call at a time.
///
/// The runtime behind an estimator has a single execution context, so calls
/// are serialized through a mutex even when `process` is awaited from
/// several tasks.
pub struct Worker<E: Estimator> {
    estimator: Arc<Mutex<E>>,
}

impl<E: Estimator> Clone for Worker<E> {
    fn clone(&self) -> Self {
        Self {
            estimator: Arc::clone(&self.estimator),
        }
    }
}

impl<E: Estimator> Worker<E> {
    pub fn new(estimator: E) -> Self {
        Self {
            estimator: Arc::new(Mutex::new(estimator)),
        }
    }

    /// Estimate on tokio's blocking pool and report to `sink`.
    ///
    /// Elapsed time covers encode, inference and decode, not the wait for
    /// an earlier call to finish.
    pub async fn process(&self, image: Tensor<u8>, sink: &dyn ResultSink<E::Output>) {
        let estimator = Arc::clone(&self.estimator);
        let outcome = tokio::task::spawn_blocking(move || {
            let mut estimator = estimator.lock().unwrap_or_else(|e| e.into_inner());
            let start = Instant::now();
            let result = estimator.estimate(&image);
            (result, start.elapsed())
        })
        .await;

        match outcome {
            Ok((Ok(result), elapsed)) => {
                let elapsed_ms = elapsed.as_millis() as u64;
                log::debug!("Inference finished in {} ms", elapsed_ms);
                sink.on_result(result, elapsed_ms);
            }
            Ok((Err(InferError::RuntimeUnavailable), _)) => {
                log::warn!("Skipping inference: runtime unavailable");
                sink.on_unavailable();
            }
            Ok((Err(error), _)) => {
                log::error!("Inference failed: {}", error);
                sink.on_error(error);
            }
            Err(join_error) => {
                log::error!("Inference task failed: {}", join_error);
                sink.on_error(InferError::BackendError(format!(
                    "inference task failed: {join_error}"
                )));
            }
        }
    }
}
