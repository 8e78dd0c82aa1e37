//! Line-at-a-time classification for the `classify` subcommand.

use crate::error::Error;
use crate::service::InferenceService;
use serde_json::json;
use std::io::{BufRead, Write};

#[derive(Debug, thiserror::Error)]
pub enum LinesError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Service(#[from] Error),
}

/// Writes one JSON object per input line.
///
/// A line that fails scoring becomes `{"error": ...}` and the next line is
/// read. Any other failure stops the loop.
pub fn classify_lines<R: BufRead, W: Write>(
    service: &InferenceService,
    input: R,
    mut output: W,
) -> Result<(), LinesError> {
    for line in input.lines() {
        let line = line?;
        match service.classify(&line) {
            Ok(result) => serde_json::to_writer(&mut output, &result)?,
            Err(Error::Inference(message)) => {
                serde_json::to_writer(&mut output, &json!({ "error": message }))?
            }
            Err(e) => return Err(e.into()),
        }
        writeln!(output)?;
    }
    output.flush()?;
    Ok(())
}
