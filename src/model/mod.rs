pub mod config;
pub mod source;

#[cfg(test)]
pub(crate) mod fixture;

pub use config::{Config, Scoring};
pub use source::ModelFiles;
