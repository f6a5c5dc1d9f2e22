//! Sentiment classifier wrapper for ONNX Runtime inference.

use std::path::Path;
use std::sync::Mutex;

use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{DynValue, Tensor};
use tracing::{debug, info};

use super::{InferenceError, SentimentClassifier, NUM_CLASSES};
use crate::config::{InputType, ModelConfig};

/// Device type for inference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda,
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpu => write!(f, "CPU"),
            Self::Cuda => write!(f, "CUDA"),
        }
    }
}

/// Pre-trained sentiment classifier exported to ONNX
pub struct SentimentModel {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    input_type: InputType,
    max_len: usize,
    device: Device,
}

impl std::fmt::Debug for SentimentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentModel")
            .field("device", &self.device)
            .field("input", &self.input_name)
            .field("output", &self.output_name)
            .field("input_type", &self.input_type)
            .field("max_len", &self.max_len)
            .finish()
    }
}

impl SentimentModel {
    /// Load the classifier described by `config`
    pub fn load(config: &ModelConfig) -> Result<Self, InferenceError> {
        let device = if config.enable_cuda {
            Device::Cuda
        } else {
            Device::Cpu
        };

        info!(path = %config.path.display(), ?device, "Loading sentiment model");

        let session =
            Self::create_session(&config.path, config.enable_cuda, config.intra_threads)?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| InferenceError::Onnx("Model has no inputs".to_string()))?;
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::Onnx("Model has no outputs".to_string()))?;

        debug!(
            inputs = ?session.inputs.iter().map(|i| &i.name).collect::<Vec<_>>(),
            outputs = ?session.outputs.iter().map(|o| &o.name).collect::<Vec<_>>(),
            "Sentiment model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            input_type: config.input_type,
            max_len: config.max_len,
            device,
        })
    }

    fn create_session(
        model_path: &Path,
        use_cuda: bool,
        intra_threads: usize,
    ) -> Result<Session, InferenceError> {
        let model_bytes = std::fs::read(model_path)?;

        let mut builder = Session::builder().map_err(|e| InferenceError::Onnx(e.to_string()))?;

        builder = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Onnx(e.to_string()))?;

        builder = builder
            .with_intra_threads(intra_threads)
            .map_err(|e| InferenceError::Onnx(e.to_string()))?;

        if use_cuda {
            #[cfg(feature = "cuda")]
            {
                use ort::execution_providers::CUDAExecutionProvider;
                builder = builder
                    .with_execution_providers([CUDAExecutionProvider::default().build()])
                    .map_err(|e| InferenceError::Onnx(e.to_string()))?;
            }
            #[cfg(not(feature = "cuda"))]
            {
                tracing::warn!("CUDA requested but not compiled with cuda feature, using CPU");
            }
        }

        builder
            .commit_from_memory(&model_bytes)
            .map_err(|e| InferenceError::Onnx(format!("Failed to load model: {e}")))
    }

    /// Get the device being used for inference
    pub fn device(&self) -> Device {
        self.device
    }

    fn input_tensor(&self, sequence: &[i64]) -> Result<DynValue, InferenceError> {
        let shape = [1usize, sequence.len()];
        let value = match self.input_type {
            InputType::Float32 => {
                let data: Vec<f32> = sequence.iter().map(|&i| i as f32).collect();
                Tensor::from_array((shape, data.into_boxed_slice())).map(|t| t.into_dyn())
            }
            InputType::Int64 => {
                let data = sequence.to_vec();
                Tensor::from_array((shape, data.into_boxed_slice())).map(|t| t.into_dyn())
            }
            InputType::Int32 => {
                let data: Vec<i32> = sequence.iter().map(|&i| i as i32).collect();
                Tensor::from_array((shape, data.into_boxed_slice())).map(|t| t.into_dyn())
            }
        };
        value.map_err(|e| InferenceError::Onnx(e.to_string()))
    }
}

impl SentimentClassifier for SentimentModel {
    fn predict(&self, sequence: &[i64]) -> Result<[f32; NUM_CLASSES], InferenceError> {
        if sequence.len() != self.max_len {
            return Err(InferenceError::InvalidOutput(format!(
                "Sequence length mismatch: expected {}, got {}",
                self.max_len,
                sequence.len()
            )));
        }

        let input = self.input_tensor(sequence)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| InferenceError::Onnx(format!("Session lock error: {e}")))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| InferenceError::Onnx(e.to_string()))?;

        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            InferenceError::Onnx(format!("Output '{}' not found", self.output_name))
        })?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Onnx(e.to_string()))?;

        debug!(?shape, data_len = data.len(), "Sentiment model output");

        if data.len() < NUM_CLASSES {
            return Err(InferenceError::InvalidOutput(format!(
                "Output too small: expected {}, got {}",
                NUM_CLASSES,
                data.len()
            )));
        }

        Ok([data[0], data[1], data[2]])
    }
}
