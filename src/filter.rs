//! Row filtering - set membership over categorical and period columns.
//!
//! Constraints AND across columns and OR within a column's allowed set. An
//! explicitly empty allowed set matches nothing, so the result is an empty
//! frame rather than "no filter". Missing cells never match. Filtering is a
//! pure projection: the source frame is untouched.

use std::collections::{BTreeMap, HashSet};

use crate::error::LensResult;
use crate::types::Frame;

/// Allowed-value sets per column. Built with [`FilterSpec::allow`] for
/// categorical columns and [`FilterSpec::periods`] for a quarter/date label
/// column; internally both are the same set-membership constraint.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    // BTreeMap keeps constraint evaluation order deterministic
    allowed: BTreeMap<String, HashSet<String>>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain `column` to the given allowed values. Calling twice for the
    /// same column intersects the sets, so composing specs is idempotent.
    pub fn allow<I, S>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let incoming: HashSet<String> = values.into_iter().map(Into::into).collect();
        match self.allowed.get_mut(column) {
            Some(existing) => {
                existing.retain(|v| incoming.contains(v));
            }
            None => {
                self.allowed.insert(column.to_string(), incoming);
            }
        }
        self
    }

    /// Constrain a period-label column (e.g. quarter) to the given labels
    pub fn periods<I, S>(self, column: &str, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow(column, labels)
    }

    /// True when no column is constrained (every row passes)
    pub fn is_unconstrained(&self) -> bool {
        self.allowed.is_empty()
    }

    pub(crate) fn constraints(&self) -> impl Iterator<Item = (&str, &HashSet<String>)> {
        self.allowed.iter().map(|(c, s)| (c.as_str(), s))
    }
}

/// Return the rows of `frame` satisfying every constraint in `spec`
pub fn apply(frame: &Frame, spec: &FilterSpec) -> LensResult<Frame> {
    if spec.is_unconstrained() {
        return Ok(frame.clone());
    }

    let mut keep: Vec<bool> = vec![true; frame.row_count()];
    for (column, allowed) in spec.constraints() {
        let cells = frame.texts(column)?;
        for (row, cell) in cells.iter().enumerate() {
            let matches = cell.as_deref().is_some_and(|v| allowed.contains(v));
            keep[row] = keep[row] && matches;
        }
    }

    let rows: Vec<usize> = keep
        .iter()
        .enumerate()
        .filter_map(|(row, k)| k.then_some(row))
        .collect();
    Ok(frame.take_rows(&rows))
}
