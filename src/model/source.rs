use crate::error::{Error, Result};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_FILE: &str = "config.json";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// Local paths of the three files a checkpoint is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

impl ModelFiles {
    /// Files of a checkpoint directory on disk. Every file must exist.
    pub fn from_dir<P: AsRef<Path>>(path: P) -> Result<Self> {
        let dir = path.as_ref();
        let files = Self {
            config: dir.join(CONFIG_FILE),
            tokenizer: dir.join(TOKENIZER_FILE),
            weights: dir.join(WEIGHTS_FILE),
        };
        for file in [&files.config, &files.tokenizer, &files.weights] {
            if !file.is_file() {
                return Err(Error::ModelUnavailable(format!(
                    "{} not found",
                    file.display()
                )));
            }
        }
        Ok(files)
    }

    /// Resolves a model identifier.
    ///
    /// An existing directory is used as is. Anything else must be a Hub
    /// repository id (`name` or `owner/name`) and is fetched into the local
    /// Hugging Face cache at the given revision.
    pub fn resolve(id: &str, revision: &str) -> Result<Self> {
        let path = Path::new(id);
        if path.is_dir() {
            info!(path = %path.display(), "using local model directory");
            return Self::from_dir(path);
        }
        if !is_repo_id(id) {
            return Err(Error::ModelUnavailable(format!(
                "{id:?} is neither a model directory nor a hub repository id"
            )));
        }

        info!(model = id, revision, "fetching model from the hub");
        let api = Api::new().map_err(Error::unavailable)?;
        let repo = api.repo(Repo::with_revision(
            id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));
        let fetch = |name: &str| {
            repo.get(name)
                .map_err(|e| Error::ModelUnavailable(format!("{id}/{name}: {e}")))
        };
        Ok(Self {
            config: fetch(CONFIG_FILE)?,
            tokenizer: fetch(TOKENIZER_FILE)?,
            weights: fetch(WEIGHTS_FILE)?,
        })
    }
}

fn is_repo_id(id: &str) -> bool {
    let mut parts = id.split('/');
    let valid = |part: &str| {
        !part.is_empty()
            && !part.starts_with('.')
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), None, None) => valid(name),
        (Some(owner), Some(name), None) => valid(owner) && valid(name),
        _ => false,
    }
}
