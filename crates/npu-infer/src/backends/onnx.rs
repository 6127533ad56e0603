use crate::config::{INPUT_LAYER, InputSpec, OutputSpec};
use crate::{Backend, InferError, ModelConfig, ModelSource, NumericEncoding, Session, TensorLayout};
use ndarray::{ArrayD, IxDyn};
use ort::{inputs, session::Session as OrtSession, value::TensorRef};

/// ONNX Runtime on the CPU execution provider.
///
/// Stands in for the vendor NPU runtime on development machines: one input
/// layer (0), then the model outputs in declaration order on layers 1, 2, ...
/// Output bytes keep ONNX Runtime's row-major order, so models are expected
/// to produce NCHW outputs.
pub struct OnnxBackend;

impl Backend for OnnxBackend {
    fn name(&self) -> &str {
        "onnx"
    }

    fn load_model(
        &self,
        model: ModelSource,
        config: &ModelConfig,
    ) -> Result<Box<dyn Session>, InferError> {
        let builder = OrtSession::builder().map_err(|e| {
            InferError::BackendError(format!("failed to create session builder: {}", e))
        })?;

        let session = match model {
            ModelSource::File(path) => builder.commit_from_file(path).map_err(|e| {
                InferError::ModelLoad(format!("failed to load model from file: {}", e))
            })?,
            ModelSource::Memory(bytes) => builder.commit_from_memory(&bytes).map_err(|e| {
                InferError::ModelLoad(format!("failed to load model from memory: {}", e))
            })?,
        };

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| InferError::ModelLoad("model has no inputs".to_string()))?;
        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();

        log::info!(
            "[onnx] '{}' loaded: input '{}', {} output(s)",
            config.name,
            input_name,
            output_names.len()
        );

        Ok(Box::new(OnnxSession {
            session,
            input_spec: config.input.clone(),
            output_specs: config.outputs.clone(),
            input_name,
            output_names,
            input: None,
            outputs: Vec::new(),
        }))
    }
}

pub struct OnnxSession {
    session: OrtSession,
    input_spec: InputSpec,
    output_specs: Vec<OutputSpec>,
    input_name: String,
    output_names: Vec<String>,
    input: Option<Vec<u8>>,
    outputs: Vec<Vec<u8>>,
}

impl OnnxSession {
    fn input_shape(&self) -> Vec<usize> {
        let spec = &self.input_spec;
        match spec.layout {
            TensorLayout::ChannelLast => vec![1, spec.height, spec.width, spec.channels],
            TensorLayout::ChannelFirst => vec![1, spec.channels, spec.height, spec.width],
        }
    }
}

/// Encoding declared for the output on `layer`, float32 when undeclared.
fn output_encoding(specs: &[OutputSpec], layer: usize) -> NumericEncoding {
    specs
        .iter()
        .find(|spec| spec.layer == layer)
        .map(|spec| spec.encoding)
        .unwrap_or(NumericEncoding::Float32)
}

impl Session for OnnxSession {
    fn buffers_ready(&self) -> bool {
        true
    }

    fn input_layers(&self) -> usize {
        1
    }

    fn write_input(&mut self, layer: usize, bytes: &[u8]) -> Result<(), InferError> {
        if layer != INPUT_LAYER {
            return Err(InferError::InvalidLayer {
                layer,
                available: 1 + self.output_names.len(),
            });
        }
        if bytes.len() != self.input_spec.byte_len() {
            return Err(InferError::ShapeMismatch {
                expected: format!("{} input bytes", self.input_spec.byte_len()),
                got: format!("{} bytes", bytes.len()),
            });
        }
        self.input = Some(bytes.to_vec());
        Ok(())
    }

    fn execute(&mut self) -> Result<(), InferError> {
        let shape = self.input_shape();
        let bytes = self
            .input
            .as_ref()
            .ok_or_else(|| {
                InferError::BackendError("no input written before execute".to_string())
            })?;

        let outputs = match self.input_spec.encoding {
            NumericEncoding::Float32 => {
                let values: Vec<f32> = bytes
                    .chunks_exact(4)
                    .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
                    .collect();
                let array = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| {
                    InferError::BackendError(format!("failed to create ndarray from input: {}", e))
                })?;
                let tensor_ref = TensorRef::from_array_view(array.view()).map_err(|e| {
                    InferError::BackendError(format!("failed to create tensor ref: {}", e))
                })?;
                self.session
                    .run(inputs![self.input_name.as_str() => tensor_ref])
                    .map_err(|e| InferError::BackendError(format!("inference failed: {}", e)))?
            }
            NumericEncoding::Uint8 => {
                let array = ArrayD::from_shape_vec(IxDyn(&shape), bytes.clone()).map_err(|e| {
                    InferError::BackendError(format!("failed to create ndarray from input: {}", e))
                })?;
                let tensor_ref = TensorRef::from_array_view(array.view()).map_err(|e| {
                    InferError::BackendError(format!("failed to create tensor ref: {}", e))
                })?;
                self.session
                    .run(inputs![self.input_name.as_str() => tensor_ref])
                    .map_err(|e| InferError::BackendError(format!("inference failed: {}", e)))?
            }
        };

        let mut raw_outputs = Vec::with_capacity(self.output_names.len());
        for (index, name) in self.output_names.iter().enumerate() {
            let value = &outputs[name.as_str()];
            let raw = match output_encoding(&self.output_specs, index + 1) {
                NumericEncoding::Float32 => value
                    .try_extract_array::<f32>()
                    .map_err(|e| {
                        InferError::BackendError(format!("output '{}' is not f32: {}", name, e))
                    })?
                    .iter()
                    .flat_map(|v| v.to_ne_bytes())
                    .collect(),
                NumericEncoding::Uint8 => value
                    .try_extract_array::<u8>()
                    .map_err(|e| {
                        InferError::BackendError(format!("output '{}' is not u8: {}", name, e))
                    })?
                    .iter()
                    .copied()
                    .collect(),
            };
            raw_outputs.push(raw);
        }
        drop(outputs);

        self.outputs = raw_outputs;
        Ok(())
    }

    fn read_output(&self, layer: usize) -> Result<Vec<u8>, InferError> {
        let available = 1 + self.output_names.len();
        if layer == INPUT_LAYER || layer >= available {
            return Err(InferError::InvalidLayer { layer, available });
        }
        match self.outputs.get(layer - 1) {
            Some(raw) => {
                log::debug!(
                    "[onnx] layer {} ({}): {} bytes",
                    layer,
                    output_encoding(&self.output_specs, layer),
                    raw.len()
                );
                Ok(raw.clone())
            }
            None => Err(InferError::BackendError(
                "no outputs available; execute the model first".to_string(),
            )),
        }
    }
}

impl Drop for OnnxSession {
    fn drop(&mut self) {
        log::debug!("[onnx] releasing session for input '{}'", self.input_name);
    }
}
