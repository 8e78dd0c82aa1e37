use crate::classifier::{BertSequenceClassifier, Classifier, Device};
use crate::device::{select_device, DevicePreference};
use crate::error::{Error, Result};
use crate::model::ModelFiles;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Clone, Default, Deserialize, Serialize, Debug, PartialEq, Eq)]
pub struct ClassificationRequest {
    #[serde(default)]
    pub text: String,
}

/// Top-ranked label and its confidence in `[0, 1]`.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq)]
pub struct ClassificationResult {
    pub label: String,
    pub score: f32,
}

/// A loaded model bound to one device for the life of the process.
///
/// The model is only read after construction, so one instance is shared by
/// reference between all callers.
pub struct InferenceService {
    classifier: Box<dyn Classifier>,
    device: Device,
}

impl InferenceService {
    pub fn new<C: Classifier + 'static>(classifier: C, device: Device) -> Self {
        Self {
            classifier: Box::new(classifier),
            device,
        }
    }

    /// Selects the device, resolves `model` and loads it. Every failure here
    /// is [`Error::ModelUnavailable`] and happens before any request.
    pub fn load(model: &str, revision: &str, preference: DevicePreference) -> Result<Self> {
        let device = select_device(preference)?;
        let files = ModelFiles::resolve(model, revision)?;
        let classifier = BertSequenceClassifier::load(&files, device.clone())?;
        info!(model, "inference service ready");
        Ok(Self::new(classifier, device))
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let top = self
            .classifier
            .classify(text)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Inference("model returned no labels".to_string()))?;
        if !(0.0..=1.0).contains(&top.score) {
            return Err(Error::Inference(format!(
                "score {} for {:?} is outside [0, 1]",
                top.score, top.label
            )));
        }
        debug!(label = %top.label, score = top.score, bytes = text.len(), "classified");
        Ok(ClassificationResult {
            label: top.label,
            score: top.score,
        })
    }
}
