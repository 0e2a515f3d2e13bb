//! `node_positions.csv` (when present): coordinates the core does not
//! consume, per spec.md §6. Read and validated as CSV, then discarded —
//! surfacing a malformed file the way the other readers do, rather than
//! ignoring it silently.

use std::path::Path;

use den2ne_core::diagnostics::Diagnostics;
use den2ne_core::error::{DenError, DenResult};

pub fn validate_positions_csv(path: &Path) -> DenResult<Diagnostics> {
    let mut diag = Diagnostics::new();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| DenError::Parse(format!("failed to open {}: {}", path.display(), e)))?;

    for (line, record) in reader.records().enumerate() {
        if let Err(e) = record {
            diag.add_error_at_line("parse", &format!("malformed row: {}", e), line + 2);
        }
    }

    Ok(diag)
}
