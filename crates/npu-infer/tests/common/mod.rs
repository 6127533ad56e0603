#![allow(dead_code)]

use npu_infer::{Backend, InferError, ModelConfig, ModelSource, Session};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What the scripted sessions did, shared with the test.
#[derive(Default)]
pub struct SessionLog {
    pub inputs: Mutex<Vec<(usize, Vec<u8>)>>,
    pub executions: AtomicUsize,
    pub opened: AtomicUsize,
    pub released: AtomicUsize,
}

impl SessionLog {
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<(usize, Vec<u8>)> {
        self.inputs.lock().unwrap().clone()
    }
}

/// In-memory runtime that replays fixed output buffers.
pub struct ScriptedBackend {
    outputs: HashMap<usize, Vec<u8>>,
    ready: bool,
    input_layers: usize,
    log: Arc<SessionLog>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            outputs: HashMap::new(),
            ready: true,
            input_layers: 1,
            log: Arc::new(SessionLog::default()),
        }
    }

    pub fn with_output(mut self, layer: usize, bytes: Vec<u8>) -> Self {
        self.outputs.insert(layer, bytes);
        self
    }

    /// Sessions report no valid buffer set.
    pub fn unavailable(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn with_input_layers(mut self, count: usize) -> Self {
        self.input_layers = count;
        self
    }

    pub fn log(&self) -> Arc<SessionLog> {
        Arc::clone(&self.log)
    }
}

impl Backend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn load_model(
        &self,
        _model: ModelSource,
        _config: &ModelConfig,
    ) -> Result<Box<dyn Session>, InferError> {
        self.log.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            outputs: self.outputs.clone(),
            ready: self.ready,
            input_layers: self.input_layers,
            log: Arc::clone(&self.log),
        }))
    }
}

struct ScriptedSession {
    outputs: HashMap<usize, Vec<u8>>,
    ready: bool,
    input_layers: usize,
    log: Arc<SessionLog>,
}

impl Session for ScriptedSession {
    fn buffers_ready(&self) -> bool {
        self.ready
    }

    fn input_layers(&self) -> usize {
        self.input_layers
    }

    fn write_input(&mut self, layer: usize, bytes: &[u8]) -> Result<(), InferError> {
        self.log.inputs.lock().unwrap().push((layer, bytes.to_vec()));
        Ok(())
    }

    fn execute(&mut self) -> Result<(), InferError> {
        self.log.executions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn read_output(&self, layer: usize) -> Result<Vec<u8>, InferError> {
        self.outputs.get(&layer).cloned().ok_or(InferError::InvalidLayer {
            layer,
            available: self.input_layers + self.outputs.len(),
        })
    }
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        self.log.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Native-endian bytes of a float slice.
pub fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

/// Planar (`c * H * W + y * W + x`) float values for an output buffer.
pub fn planar(
    width: usize,
    height: usize,
    channels: usize,
    f: impl Fn(usize, usize, usize) -> f32,
) -> Vec<f32> {
    let mut values = Vec::with_capacity(width * height * channels);
    for c in 0..channels {
        for y in 0..height {
            for x in 0..width {
                values.push(f(x, y, c));
            }
        }
    }
    values
}
