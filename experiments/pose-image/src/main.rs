mod draw;

use draw::draw_pose;
use npu_base::{Tensor, init_stdout_logger};
use npu_image::{decode_image, encode_png, resize_rgb};
use npu_infer::{
    InferError, ModelConfig, ModelSource, OnnxBackend, PoseEstimator, PoseResult, ResultSink,
    Worker,
};
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

const KEYPOINT_THRESHOLD: f32 = 0.3;

/// Keeps the last pose handed over by the worker.
#[derive(Default)]
struct LastPose {
    pose: Mutex<Option<PoseResult>>,
}

impl ResultSink<PoseResult> for LastPose {
    fn on_result(&self, result: PoseResult, elapsed_ms: u64) {
        println!("Pose in {} ms (score {:.3})", elapsed_ms, result.score());
        for (part, keypoint) in result.iter() {
            println!(
                "  {:<15} x={:>8.1} y={:>8.1} confidence={:.3}",
                part.name(),
                keypoint.position.x,
                keypoint.position.y,
                keypoint.confidence
            );
        }
        if let Ok(mut slot) = self.pose.lock() {
            *slot = Some(result);
        }
    }

    fn on_error(&self, error: InferError) {
        eprintln!("Pose estimation failed: {}", error);
    }

    fn on_unavailable(&self) {
        eprintln!("Runtime unavailable, no pose estimated");
    }
}

/// Model constants from `NPU_MODEL_CONFIG` when set, PoseNet otherwise.
fn load_config() -> Result<ModelConfig, InferError> {
    match env::var("NPU_MODEL_CONFIG") {
        Ok(path) => ModelConfig::from_json_file(path),
        Err(_) => Ok(ModelConfig::posenet()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_stdout_logger();

    let model_path: PathBuf = env::var("NPU_MODEL_PATH")
        .unwrap_or_else(|_| "models/posenet_mobilenet_v1_100_257x257.onnx".to_string())
        .into();
    let image_path: PathBuf = env::var("NPU_IMAGE_PATH")
        .unwrap_or_else(|_| "data/person.jpg".to_string())
        .into();
    let output_path: PathBuf = env::var("NPU_OUTPUT_PATH")
        .unwrap_or_else(|_| "pose.png".to_string())
        .into();

    let config = load_config()?;
    let (input_width, input_height) = (config.input.width, config.input.height);

    println!("Pose Image Experiment");
    println!("Model: {}", model_path.display());
    println!("Image: {}", image_path.display());
    println!(
        "Input: {}x{} {} {}",
        input_width, input_height, config.input.layout, config.input.encoding
    );
    println!();

    let bytes = tokio::fs::read(&image_path).await?;
    let frame = decode_image(&bytes).await?.to_rgb8()?;
    let (height, width) = (frame.shape[0], frame.shape[1]);
    println!("Decoded {}x{} image", width, height);

    // keypoints come back in the coordinates of the model input
    let input = resize_rgb(&frame, input_width, input_height)?;

    println!("Loading pose model...");
    let estimator = PoseEstimator::new(ModelSource::File(model_path), config, &OnnxBackend)?;
    let worker = Worker::new(estimator);
    println!("Model loaded");

    let sink = LastPose::default();
    worker.process(input.clone(), &sink).await;

    let pose = sink.pose.lock().ok().and_then(|mut slot| slot.take());
    if let Some(pose) = pose {
        let mut canvas: Tensor<u8> = input;
        draw_pose(&mut canvas, &pose, KEYPOINT_THRESHOLD);
        tokio::fs::write(&output_path, encode_png(&canvas)?).await?;
        println!("Wrote {}", output_path.display());
    }

    Ok(())
}
