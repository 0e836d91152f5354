use std::sync::{Arc, Mutex};
use tch::{CModule, Device, Kind, Tensor};

pub const MODEL_VERSION: &str = "EfficientNetB0 + Metadata MLP";

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model artifact failed to load: {0}")]
    Load(tch::TchError),
    #[error("model forward pass failed: {0}")]
    Forward(tch::TchError),
    #[error("model returned an empty output tensor")]
    EmptyOutput,
}

/// TorchScript export of the fused image + metadata network. Loaded once at
/// startup and shared read-only between request handlers.
#[derive(Clone)]
pub struct Model {
    module: Arc<Mutex<CModule>>,
}

impl Model {
    pub fn load(model_path: &str) -> Result<Self, InferenceError> {
        let device = Device::cuda_if_available();
        let module =
            CModule::load_on_device(model_path, device).map_err(InferenceError::Load)?;
        Ok(Self {
            module: Arc::new(Mutex::new(module)),
        })
    }

    /// Runs the two prepared batches through the network and returns the
    /// scalar sigmoid output in [0, 1].
    pub fn predict(&self, image: &Tensor, metadata: &Tensor) -> Result<f32, InferenceError> {
        let output = self
            .module
            .lock()
            .unwrap()
            .forward_ts(&[image, metadata])
            .map_err(InferenceError::Forward)?;
        let flat = output.to_kind(Kind::Float).view([-1]);
        if flat.size()[0] == 0 {
            return Err(InferenceError::EmptyOutput);
        }
        Ok(flat.double_value(&[0]) as f32)
    }
}
