use std::fmt::Display;

/// Failures surfaced by the classifier.
///
/// Loading problems (missing files, bad config, unreachable device) are
/// [`Error::ModelUnavailable`] and are fatal at startup. A single request
/// that cannot be scored is [`Error::Inference`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

impl Error {
    pub(crate) fn unavailable(err: impl Display) -> Self {
        Self::ModelUnavailable(err.to_string())
    }

    pub(crate) fn inference(err: impl Display) -> Self {
        Self::Inference(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
