//! CSV loader - header row + data rows, cells as raw text

use std::path::Path;

use crate::error::LensResult;
use crate::types::{Column, ColumnValues, Frame};

pub fn load(path: &Path) -> LensResult<Frame> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (col, out) in cells.iter_mut().enumerate() {
            // Short records pad out with missing cells
            out.push(record.get(col).map(str::trim).and_then(|s| {
                if s.is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            }));
        }
    }

    let mut frame = Frame::new(super::frame_name(path));
    for (header, values) in headers.into_iter().zip(cells) {
        frame.add_column(Column::new(header, ColumnValues::Text(values)));
    }
    Ok(frame)
}
