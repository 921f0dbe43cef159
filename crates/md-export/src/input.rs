//! Thread and config loading

use std::path::Path;

use md_core::GeneratorConfig;
use md_core::mail::RawThread;
use tracing::debug;

use crate::{ExportError, open_reader};

/// Load a JSON array of threads
pub fn load_threads(path: impl AsRef<Path>) -> Result<Vec<RawThread>, ExportError> {
    let path = path.as_ref();
    let threads: Vec<RawThread> = serde_json::from_reader(open_reader(path)?)?;
    debug!(path = %path.display(), threads = threads.len(), "loaded threads");
    Ok(threads)
}

/// Load a generator config; missing fields take their defaults
///
/// The config is not validated here; generation does that.
pub fn load_config(path: impl AsRef<Path>) -> Result<GeneratorConfig, ExportError> {
    Ok(serde_json::from_reader(open_reader(path.as_ref())?)?)
}
