use bincode::{deserialize_from, serialize_into};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::path::Path;

use crate::table::CounterTable;

// Point-in-time backup of the whole counter table as a gzipped bincode
// file. The worksheet stays the source of truth; a snapshot is what a
// shift lead takes before handing the line over.

pub fn save_snapshot(table: &CounterTable, path: impl AsRef<Path>) -> std::io::Result<()> {
    let file = File::create(path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut writer = std::io::BufWriter::new(encoder);

    serialize_into(&mut writer, table)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    Ok(())
}

pub fn load_snapshot(path: impl AsRef<Path>) -> std::io::Result<CounterTable> {
    let file = File::open(path)?;
    let decoder = GzDecoder::new(file);
    let mut reader = std::io::BufReader::new(decoder);

    let mut table: CounterTable = deserialize_from(&mut reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    // Snapshot files are not trusted as derived truth.
    table.recompute_derived();

    Ok(table)
}
