//! Sequence classifier adapter
//!
//! The pipeline only needs `predict(EncodedSequence) -> ProbabilityVector`;
//! [`SequenceClassifier`] is that seam. The ONNX Runtime backend lives behind
//! the `onnx` feature.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{EncodedSequence, ProbabilityVector};

/// Number of classes the model scores
pub const NUM_CLASSES: usize = 2;

/// Runs a pretrained binary classifier over one encoded email
pub trait SequenceClassifier: Send + Sync {
    fn predict(&self, sequence: &EncodedSequence) -> Result<ProbabilityVector>;
}

/// Element type of the model's input tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelInputType {
    /// Keras models exported without an explicit input dtype
    #[default]
    Float32,
    Int32,
    Int64,
}

/// Validate a raw output row and widen it to f64
pub fn probabilities_from_output(output: &[f32]) -> Result<ProbabilityVector> {
    match output {
        [not_spam, spam] => Ok(ProbabilityVector::new(
            f64::from(*not_spam),
            f64::from(*spam),
        )),
        other => Err(crate::error::SpamError::InferenceError(format!(
            "Expected {} class probabilities, model returned {}",
            NUM_CLASSES,
            other.len()
        ))),
    }
}

// ═══════════════════════════════════════════════════════════
// ONNX classifier (behind the `onnx` feature)
// ═══════════════════════════════════════════════════════════

#[cfg(feature = "onnx")]
mod onnx {
    use super::{probabilities_from_output, ModelInputType, SequenceClassifier};
    use crate::error::{Result, SpamError};
    use crate::models::{EncodedSequence, ProbabilityVector};
    use ort::session::Session;
    use ort::value::TensorRef;
    use std::path::Path;
    use std::sync::Mutex;

    /// Keras spam model exported to ONNX.
    ///
    /// `Session::run` needs `&mut self`, so the session sits behind a Mutex to
    /// keep [`SequenceClassifier::predict`] usable from shared references.
    pub struct OnnxSequenceClassifier {
        session: Mutex<Session>,
        input_type: ModelInputType,
    }

    impl OnnxSequenceClassifier {
        pub fn load(
            model_path: &Path,
            input_type: ModelInputType,
            intra_threads: usize,
        ) -> Result<Self> {
            if !model_path.exists() {
                return Err(SpamError::ModelLoad(format!(
                    "Model file not found: {}",
                    model_path.display()
                )));
            }

            let session = Session::builder()
                .map_err(|e: ort::Error| SpamError::ModelLoad(e.to_string()))?
                .with_intra_threads(intra_threads)
                .map_err(|e: ort::Error| SpamError::ModelLoad(e.to_string()))?
                .commit_from_file(model_path)
                .map_err(|e: ort::Error| SpamError::ModelLoad(format!("ONNX load failed: {e}")))?;

            tracing::info!(
                "ONNX classifier loaded from {} (input {:?})",
                model_path.display(),
                input_type
            );

            Ok(Self {
                session: Mutex::new(session),
                input_type,
            })
        }

        fn run<T>(&self, values: Vec<T>) -> Result<ProbabilityVector>
        where
            T: ort::tensor::PrimitiveTensorElementType + std::fmt::Debug + Clone + 'static,
        {
            let seq_len = values.len();
            let array = ndarray::Array2::from_shape_vec((1, seq_len), values)
                .map_err(|e| SpamError::InferenceError(e.to_string()))?;
            let tensor = TensorRef::from_array_view(&array)
                .map_err(|e| SpamError::InferenceError(e.to_string()))?;

            let mut session = self
                .session
                .lock()
                .map_err(|_| SpamError::InferenceError("Session lock poisoned".to_string()))?;

            let outputs = session
                .run(ort::inputs![tensor])
                .map_err(|e| SpamError::InferenceError(format!("ONNX inference failed: {e}")))?;

            // Output shape: [1, 2]
            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| SpamError::InferenceError(format!("Output extraction: {e}")))?;

            if shape.first().copied().unwrap_or(0) != 1 {
                return Err(SpamError::InferenceError(format!(
                    "Unexpected output shape: {shape:?}, expected a batch of one"
                )));
            }

            probabilities_from_output(data)
        }
    }

    impl SequenceClassifier for OnnxSequenceClassifier {
        fn predict(&self, sequence: &EncodedSequence) -> Result<ProbabilityVector> {
            let ids = sequence.as_slice();
            match self.input_type {
                ModelInputType::Float32 => self.run(ids.iter().map(|&id| id as f32).collect()),
                ModelInputType::Int32 => self.run(ids.iter().map(|&id| id as i32).collect()),
                ModelInputType::Int64 => self.run(ids.iter().map(|&id| i64::from(id)).collect()),
            }
        }
    }
}

#[cfg(feature = "onnx")]
pub use onnx::OnnxSequenceClassifier;
