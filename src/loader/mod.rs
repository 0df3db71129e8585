//! Spreadsheet ingestion - file on disk → raw text `Frame`
//!
//! The loader reads the file exactly as present (columns and row order
//! preserved, every cell as raw text); type coercion is the normalizer's job.
//! The file handle is scoped to the load call.

mod csv_file;
mod excel;

use std::path::Path;

use tracing::debug;

use crate::error::{LensError, LensResult};
use crate::types::Frame;

/// Load a spreadsheet into a raw text frame, dispatching on file extension.
/// `.xlsx`/`.xlsm`/`.xls`/`.ods` go through calamine, `.csv` through the csv
/// reader. Missing or unreadable files fail here; nothing else does.
pub fn load_spreadsheet(path: &Path) -> LensResult<Frame> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let frame = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => excel::load(path)?,
        "csv" => csv_file::load(path)?,
        other => {
            return Err(LensError::Spreadsheet(format!(
                "unsupported file extension '{}' for {}",
                other,
                path.display()
            )))
        }
    };

    debug!(
        path = %path.display(),
        rows = frame.row_count(),
        columns = frame.column_count(),
        "loaded spreadsheet"
    );
    Ok(frame)
}

/// Frame name from the file stem, falling back to the full path
pub(crate) fn frame_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
