use npu_base::init_stdout_logger;
use npu_image::{decode_image, encode_png, resize_rgb};
use npu_infer::{DepthEstimator, ModelConfig, ModelSource, NumericPolicy, OnnxBackend};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_stdout_logger();

    let model_path: PathBuf = env::var("NPU_MODEL_PATH")
        .unwrap_or_else(|_| "models/depth_256x256.onnx".to_string())
        .into();
    let image_path: PathBuf = env::var("NPU_IMAGE_PATH")
        .unwrap_or_else(|_| "data/room.jpg".to_string())
        .into();
    let output_path: PathBuf = env::var("NPU_OUTPUT_PATH")
        .unwrap_or_else(|_| "depth.png".to_string())
        .into();
    let policy: NumericPolicy = env::var("NPU_NUMERIC_POLICY")
        .map(|value| value.parse::<NumericPolicy>())
        .unwrap_or(Ok(NumericPolicy::default()))?;

    let config = match env::var("NPU_MODEL_CONFIG") {
        Ok(path) => ModelConfig::from_json_file(path)?,
        Err(_) => ModelConfig::depth(),
    }
    .with_numeric_policy(policy);

    println!("Depth Image Experiment");
    println!("Model: {}", model_path.display());
    println!("Image: {}", image_path.display());
    println!("Numeric policy: {}", policy);
    println!();

    let bytes = tokio::fs::read(&image_path).await?;
    let frame = decode_image(&bytes).await?.to_rgb8()?;
    let input = resize_rgb(&frame, config.input.width, config.input.height)?;

    println!("Loading depth model...");
    let mut estimator = DepthEstimator::new(ModelSource::File(model_path), config, &OnnxBackend)?;
    if !estimator.is_available() {
        eprintln!("Runtime unavailable, nothing to do");
        return Ok(());
    }
    println!("Model loaded");

    let start = std::time::Instant::now();
    let depth = estimator.estimate(&input)?;
    println!(
        "Depth {}x{} in {} ms",
        depth.width,
        depth.height,
        start.elapsed().as_millis()
    );

    tokio::fs::write(&output_path, encode_png(&depth.to_tensor())?).await?;
    println!("Wrote {}", output_path.display());

    Ok(())
}
