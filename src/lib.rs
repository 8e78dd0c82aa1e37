//! Text classification behind a single synchronous call.
//!
//! An [`InferenceService`] owns a pre-trained sequence classifier bound to one
//! compute device and turns a piece of text into the top label and its
//! confidence. The [`web`] module puts a one-page form and a JSON endpoint in
//! front of it.

pub mod classifier;
pub mod device;
pub mod error;
pub mod lines;
pub mod model;
pub mod service;
pub mod web;

pub use classifier::{BertSequenceClassifier, Classifier, Device, LabelScore};
pub use device::DevicePreference;
pub use error::{Error, Result};
pub use service::{ClassificationRequest, ClassificationResult, InferenceService};
