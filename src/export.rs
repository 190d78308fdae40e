use anyhow::{Context, Result};
use csv::{Reader, Writer};
use std::{fs::File, path::Path};
use tracing::debug;

use crate::models::Record;

/// Overwrites `path` with one CSV row per record, header = record field names.
/// No records → zero-byte file, no header.
pub fn write_csv<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    if records.is_empty() {
        debug!("No records - wrote empty file {}", path.display());
        return Ok(());
    }

    let mut writer = Writer::from_writer(file);
    for r in records {
        writer
            .serialize(r)
            .with_context(|| format!("write row {} to {}", r.id, path.display()))?;
    }
    writer.flush().with_context(|| format!("flush {}", path.display()))?;

    debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = Reader::from_reader(file);
    let mut out = Vec::new();
    for row in reader.deserialize() {
        let r: Record = row.with_context(|| format!("decode row in {}", path.display()))?;
        out.push(r);
    }
    Ok(out)
}
