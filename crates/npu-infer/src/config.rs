use crate::{InferError, Normalization, NumericEncoding, NumericPolicy, TensorLayout};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Name of the pose heatmap output in `ModelConfig::posenet()`.
pub const HEATMAP_OUTPUT: &str = "heatmaps";
/// Name of the pose offset-field output in `ModelConfig::posenet()`.
pub const OFFSET_OUTPUT: &str = "offsets";
/// Name of the depth output in `ModelConfig::depth()`.
pub const DEPTH_OUTPUT: &str = "depth";

/// Layer the encoded input is written to.
pub const INPUT_LAYER: usize = 0;

fn default_channels() -> usize {
    3
}

/// Model input tensor: image size, memory layout, element encoding and normalization.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InputSpec {
    pub width: usize,
    pub height: usize,
    #[serde(default = "default_channels")]
    pub channels: usize,
    pub layout: TensorLayout,
    pub encoding: NumericEncoding,
    pub normalization: Normalization,
}

impl InputSpec {
    pub fn element_count(&self) -> usize {
        self.width * self.height * self.channels
    }

    pub fn byte_len(&self) -> usize {
        self.element_count() * self.encoding.bytes_per_element()
    }
}

/// One runtime output buffer, decoded as `width x height x channels`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputSpec {
    pub name: String,
    pub layer: usize,
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub encoding: NumericEncoding,
    /// Applied by post-processors that de-scale raw values (depth).
    #[serde(default)]
    pub normalization: Normalization,
}

impl OutputSpec {
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.channels)
    }

    pub fn byte_len(&self) -> usize {
        self.width * self.height * self.channels * self.encoding.bytes_per_element()
    }
}

/// Fixed per-model constants. Nothing here is discovered from the runtime.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelConfig {
    pub name: String,
    pub model_file: PathBuf,
    pub input: InputSpec,
    pub outputs: Vec<OutputSpec>,
    #[serde(default)]
    pub numeric_policy: NumericPolicy,
}

impl ModelConfig {
    /// PoseNet (MobileNet v1, output stride 32) with a 257x257 float input.
    pub fn posenet() -> Self {
        Self {
            name: "posenet".to_string(),
            model_file: PathBuf::from("posenet_mobilenet_v1_100_257x257.bin"),
            input: InputSpec {
                width: 257,
                height: 257,
                channels: 3,
                layout: TensorLayout::ChannelLast,
                encoding: NumericEncoding::Float32,
                normalization: Normalization::new(128.0, 128.0),
            },
            outputs: vec![
                OutputSpec {
                    name: HEATMAP_OUTPUT.to_string(),
                    layer: 1,
                    width: 9,
                    height: 9,
                    channels: 17,
                    encoding: NumericEncoding::Float32,
                    normalization: Normalization::IDENTITY,
                },
                OutputSpec {
                    name: OFFSET_OUTPUT.to_string(),
                    layer: 2,
                    width: 9,
                    height: 9,
                    channels: 34,
                    encoding: NumericEncoding::Float32,
                    normalization: Normalization::IDENTITY,
                },
            ],
            numeric_policy: NumericPolicy::Wrapping,
        }
    }

    /// Monocular depth network with a 256x256 planar float input.
    pub fn depth() -> Self {
        Self {
            name: "depth".to_string(),
            model_file: PathBuf::from("depth_256x256.bin"),
            input: InputSpec {
                width: 256,
                height: 256,
                channels: 3,
                layout: TensorLayout::ChannelFirst,
                encoding: NumericEncoding::Float32,
                normalization: Normalization::new(0.0, 255.0),
            },
            outputs: vec![OutputSpec {
                name: DEPTH_OUTPUT.to_string(),
                layer: 1,
                width: 256,
                height: 256,
                channels: 1,
                encoding: NumericEncoding::Float32,
                normalization: Normalization::IDENTITY,
            }],
            numeric_policy: NumericPolicy::Wrapping,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, InferError> {
        let config: ModelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, InferError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String, InferError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_numeric_policy(mut self, policy: NumericPolicy) -> Self {
        self.numeric_policy = policy;
        self
    }

    pub fn output(&self, name: &str) -> Result<&OutputSpec, InferError> {
        self.outputs
            .iter()
            .find(|output| output.name == name)
            .ok_or_else(|| {
                InferError::Config(format!("model '{}' has no output '{}'", self.name, name))
            })
    }

    /// Check the bundle is internally consistent.
    pub fn validate(&self) -> Result<(), InferError> {
        let input = &self.input;
        if input.channels != 3 {
            return Err(InferError::Config(format!(
                "input must have 3 channels, got {}",
                input.channels
            )));
        }
        if input.width == 0 || input.height == 0 {
            return Err(InferError::Config("input size must be non-zero".to_string()));
        }
        check_normalization("input", &input.normalization)?;

        if self.outputs.is_empty() {
            return Err(InferError::Config("model declares no outputs".to_string()));
        }

        let mut layers = HashSet::new();
        for output in &self.outputs {
            if output.width == 0 || output.height == 0 || output.channels == 0 {
                return Err(InferError::Config(format!(
                    "output '{}' has an empty shape",
                    output.name
                )));
            }
            if output.layer == INPUT_LAYER {
                return Err(InferError::Config(format!(
                    "output '{}' cannot use the input layer",
                    output.name
                )));
            }
            if !layers.insert(output.layer) {
                return Err(InferError::Config(format!(
                    "layer {} is declared by more than one output",
                    output.layer
                )));
            }
            check_normalization(&output.name, &output.normalization)?;
        }

        Ok(())
    }
}

fn check_normalization(what: &str, normalization: &Normalization) -> Result<(), InferError> {
    if normalization.scale == 0.0
        || !normalization.scale.is_finite()
        || !normalization.offset.is_finite()
    {
        return Err(InferError::Config(format!(
            "{what} normalization must have a finite, non-zero scale and a finite offset"
        )));
    }
    Ok(())
}
