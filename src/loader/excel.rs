//! Excel loader - first worksheet of an .xlsx/.xls/.ods workbook

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::{LensError, LensResult};
use crate::types::{Column, ColumnValues, Frame};

/// Load the first worksheet: row 0 is the header, everything below is data.
pub fn load(path: &Path) -> LensResult<Frame> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| LensError::Spreadsheet(format!("failed to open {}: {}", path.display(), e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LensError::Spreadsheet(format!("{} has no worksheets", path.display())))?;

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        LensError::Spreadsheet(format!(
            "failed to read sheet '{}' of {}: {}",
            sheet_name,
            path.display(),
            e
        ))
    })?;

    range_to_frame(&range, super::frame_name(path))
}

fn range_to_frame(range: &Range<Data>, name: String) -> LensResult<Frame> {
    let (height, width) = range.get_size();
    let mut frame = Frame::new(name);
    if height == 0 {
        return Ok(frame);
    }

    // Header row
    let mut column_names: Vec<String> = Vec::with_capacity(width);
    for col in 0..width {
        let header = match range.get((0, col)) {
            Some(Data::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Data::Empty) | None => format!("col_{}", col),
            Some(cell) => cell.to_string(),
        };
        column_names.push(header);
    }

    // Data rows, one text array per column
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(height - 1); width];
    for row in 1..height {
        for (col, out) in cells.iter_mut().enumerate() {
            out.push(cell_to_text(range.get((row, col))));
        }
    }

    for (header, values) in column_names.into_iter().zip(cells) {
        frame.add_column(Column::new(header, ColumnValues::Text(values)));
    }
    Ok(frame)
}

/// Raw cell text. Empty cells and blank strings are missing; everything else
/// renders through the cell's display form so the normalizer sees one shape.
fn cell_to_text(cell: Option<&Data>) -> Option<String> {
    match cell {
        None | Some(Data::Empty) => None,
        Some(Data::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(Data::Error(_)) => None,
        Some(other) => Some(other.to_string()),
    }
}
