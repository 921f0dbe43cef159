//! md-export: File input and output for the mail dungeon generator
//!
//! Reads thread lists and generator configs from JSON, and writes emitted
//! blocks for a map writer. Any path ending in `.gz` is read and written
//! through gzip.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use thiserror::Error;

mod dump;
mod input;

pub use dump::{
    DUMP_VERSION, DumpFile, DumpHeader, StreamRecord, read_dump, read_stream, write_emission,
    write_stream,
};
pub use input::{load_config, load_threads};

/// Import/export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Incompatible dump version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Invalid dump file header")]
    InvalidHeader,

    #[error("Layout error: {0}")]
    Layout(#[from] md_core::LayoutError),
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "gz")
}

fn open_reader(path: &Path) -> Result<Box<dyn Read>, ExportError> {
    let file = File::open(path).map_err(|_| ExportError::NotFound(path.display().to_string()))?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn write_with<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), ExportError>,
{
    let mut file = BufWriter::new(File::create(path)?);
    if is_gzip(path) {
        let mut encoder = GzEncoder::new(file, Compression::default());
        write(&mut encoder)?;
        encoder.finish()?.flush()?;
    } else {
        write(&mut file)?;
        file.flush()?;
    }
    Ok(())
}
