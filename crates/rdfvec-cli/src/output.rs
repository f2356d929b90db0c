//! Embedding JSON output
//!
//! The mapping is written as a 2-space indented JSON object to a temporary
//! file next to the target, then renamed over it.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use rdfvec_core::{OutputMapping, RdfVecError, Result};

/// Serialize `mapping` to `output_path`, replacing any existing file
pub fn write_json(mapping: &OutputMapping, output_path: &Path) -> Result<()> {
    let to_error = |source: io::Error| RdfVecError::Serialization {
        path: output_path.to_path_buf(),
        source,
    };

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(to_error)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(to_error)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, mapping)
            .map_err(|e| to_error(io::Error::from(e)))?;
        writer.write_all(b"\n").map_err(to_error)?;
        writer.flush().map_err(to_error)?;
    }
    tmp.persist(output_path).map_err(|e| to_error(e.error))?;

    Ok(())
}

/// Read a mapping previously written by [`write_json`]
pub fn read_json(path: &Path) -> Result<OutputMapping> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| RdfVecError::Serialization {
        path: path.to_path_buf(),
        source: io::Error::from(e),
    })
}
