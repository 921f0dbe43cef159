//! Block dumps
//!
//! A dump is one JSON document: a versioned header followed by the emission.
//! A stream is JSON Lines: a header, one record per emitted entity and a
//! closing summary, written as each entity is emitted.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use md_core::block::BlockInstruction;
use md_core::dungeon::{DungeonLayout, LayoutMetadata};
use md_core::emit::{ChestContents, EmitStep, Emission, SignText, emit_step, traversal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{ExportError, open_reader, write_with};

/// Current dump format version
pub const DUMP_VERSION: u32 = 1;

/// Dump header for versioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpHeader {
    /// Magic identifier
    pub magic: String,
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub branch_count: usize,
    /// Unknown at the start of a stream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_count: Option<usize>,
}

impl DumpHeader {
    const MAGIC: &'static str = "MDNG";

    pub fn new(branch_count: usize, block_count: Option<usize>) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: DUMP_VERSION,
            generated_at: Utc::now(),
            branch_count,
            block_count,
        }
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if self.magic != Self::MAGIC {
            return Err(ExportError::InvalidHeader);
        }
        if self.version != DUMP_VERSION {
            return Err(ExportError::IncompatibleVersion {
                expected: DUMP_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Complete dump file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpFile {
    pub header: DumpHeader,
    pub emission: Emission,
}

/// One line of a streamed dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum StreamRecord {
    Header(DumpHeader),
    Entity {
        step: EmitStep,
        blocks: Vec<BlockInstruction>,
        signs: Vec<SignText>,
        chests: Vec<ChestContents>,
    },
    Summary {
        metadata: LayoutMetadata,
        block_count: usize,
    },
}

/// Write a whole emission as one document
pub fn write_emission(emission: &Emission, path: impl AsRef<Path>) -> Result<DumpHeader, ExportError> {
    let path = path.as_ref();
    let dump = DumpFile {
        header: DumpHeader::new(emission.metadata.branch_count, Some(emission.block_count())),
        emission: emission.clone(),
    };
    write_with(path, |w| Ok(serde_json::to_writer(w, &dump)?))?;
    info!(path = %path.display(), blocks = emission.block_count(), "wrote block dump");
    Ok(dump.header)
}

/// Read a dump written by [`write_emission`]
pub fn read_dump(path: impl AsRef<Path>) -> Result<DumpFile, ExportError> {
    let dump: DumpFile = serde_json::from_reader(open_reader(path.as_ref())?)?;
    dump.header.validate()?;
    Ok(dump)
}

/// Emit a layout entity by entity straight into a JSON Lines file
///
/// Returns the number of blocks written. On error the partial file is removed.
pub fn write_stream(layout: &DungeonLayout, path: impl AsRef<Path>) -> Result<usize, ExportError> {
    let path = path.as_ref();
    let mut block_count = 0;

    let result = write_with(path, |w| {
        write_line(w, &StreamRecord::Header(DumpHeader::new(layout.branch_count(), None)))?;
        for step in traversal(layout) {
            let chunk = emit_step(layout, step)?;
            block_count += chunk.blocks.len();
            debug!(?step, blocks = chunk.blocks.len(), "streamed entity");
            write_line(
                w,
                &StreamRecord::Entity {
                    step: chunk.step,
                    blocks: chunk.blocks,
                    signs: chunk.signs,
                    chests: chunk.chests,
                },
            )?;
        }
        write_line(
            w,
            &StreamRecord::Summary {
                metadata: layout.metadata(),
                block_count,
            },
        )
    });

    if let Err(e) = result {
        std::fs::remove_file(path).ok();
        return Err(e);
    }
    info!(path = %path.display(), blocks = block_count, "wrote block stream");
    Ok(block_count)
}

fn write_line(w: &mut dyn Write, record: &StreamRecord) -> Result<(), ExportError> {
    serde_json::to_writer(&mut *w, record)?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Read every record of a stream, checking its header
pub fn read_stream(path: impl AsRef<Path>) -> Result<Vec<StreamRecord>, ExportError> {
    let reader = BufReader::new(open_reader(path.as_ref())?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str::<StreamRecord>(&line)?);
    }
    match records.first() {
        Some(StreamRecord::Header(header)) => header.validate()?,
        _ => return Err(ExportError::InvalidHeader),
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use md_core::mail::RawThread;
    use md_core::{GeneratorConfig, LayoutError, generate};

    fn generated() -> md_core::Generated {
        let raw = vec![
            RawThread::with_message_count("a", 3),
            RawThread::with_message_count("b", 1),
        ];
        generate(&raw, &GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn test_dump_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dungeon.json");
        let generated = generated();

        let header = write_emission(&generated.emission, &path).unwrap();
        assert_eq!(header.block_count, Some(generated.emission.block_count()));

        let dump = read_dump(&path).unwrap();
        assert_eq!(dump.header, header);
        assert_eq!(dump.emission, generated.emission);
    }

    #[test]
    fn test_gzip_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dungeon.json.gz");
        let generated = generated();

        write_emission(&generated.emission, &path).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
        assert_eq!(read_dump(&path).unwrap().emission, generated.emission);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dungeon.json");
        let mut dump = DumpFile {
            header: DumpHeader::new(0, Some(0)),
            emission: generated().emission,
        };
        dump.header.magic = "NOPE".to_string();
        fs::write(&path, serde_json::to_string(&dump).unwrap()).unwrap();
        assert!(matches!(read_dump(&path), Err(ExportError::InvalidHeader)));

        dump.header.magic = DumpHeader::MAGIC.to_string();
        dump.header.version = DUMP_VERSION + 1;
        fs::write(&path, serde_json::to_string(&dump).unwrap()).unwrap();
        assert!(matches!(
            read_dump(&path),
            Err(ExportError::IncompatibleVersion { found, .. }) if found == DUMP_VERSION + 1
        ));
    }

    #[test]
    fn test_stream_matches_emission() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dungeon.jsonl");
        let generated = generated();

        let written = write_stream(&generated.layout, &path).unwrap();
        assert_eq!(written, generated.emission.block_count());

        let records = read_stream(&path).unwrap();
        assert_eq!(records.len(), traversal(&generated.layout).len() + 2);

        let mut blocks = Vec::new();
        for record in &records {
            if let StreamRecord::Entity { blocks: b, .. } = record {
                blocks.extend_from_slice(b);
            }
        }
        assert_eq!(blocks, generated.emission.blocks);
        assert!(matches!(
            records.last(),
            Some(StreamRecord::Summary { block_count, .. }) if *block_count == written
        ));
    }

    #[test]
    fn test_failed_stream_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut layout = generated().layout;
        // Every entity but the boss room streams before the escape is found
        layout.boss.volume.min.x += 100;
        layout.boss.volume.max.x += 100;

        for name in ["dungeon.jsonl", "dungeon.jsonl.gz"] {
            let path = dir.path().join(name);
            let err = write_stream(&layout, &path).unwrap_err();
            assert!(matches!(err, ExportError::Layout(LayoutError::InvariantViolation(_))));
            assert!(!path.exists(), "{name} left behind");
        }
    }
}
