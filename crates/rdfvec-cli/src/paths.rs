//! Input file checks

use std::path::Path;

use tracing::{error, info};

use rdfvec_core::{RdfVecError, Result};

/// Fail fast when a required input file is missing
pub fn check_path(path: &Path) -> Result<()> {
    if path.exists() {
        info!("Path exists: {}", path.display());
        Ok(())
    } else {
        error!("Path does NOT exist: {}", path.display());
        Err(RdfVecError::MissingInputFile {
            path: path.to_path_buf(),
        })
    }
}
