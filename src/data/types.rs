use std::collections::HashMap;
use std::fmt;

use super::model::{Dataset, is_empty_cell};
use super::value::{parse_number, strip_percent};

// ---------------------------------------------------------------------------
// ColumnType – inferred semantic kind of a column
// ---------------------------------------------------------------------------

/// Semantic kind of a column, derived from its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Number,
    Percentage,
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Number => write!(f, "number"),
            ColumnType::Percentage => write!(f, "percentage"),
            ColumnType::Text => write!(f, "text"),
        }
    }
}

impl ColumnType {
    /// Number and Percentage columns compare numerically.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Number | ColumnType::Percentage)
    }
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

/// Classify a column by scanning every row.
///
/// Empty cells are ignored. Any value that is neither a number nor a number
/// followed by `%` makes the column Text. Otherwise a single `%` value makes
/// it Percentage, and plain numbers make it Number. Columns without any
/// non-empty value, and names not in the header, are Text.
pub fn infer_column_type(dataset: &Dataset, column: &str) -> ColumnType {
    match dataset.column_index(column) {
        Some(idx) => infer_at(dataset, idx),
        None => ColumnType::Text,
    }
}

fn infer_at(dataset: &Dataset, idx: usize) -> ColumnType {
    let mut seen_value = false;
    let mut seen_percent = false;

    for cell in dataset.column_values(idx) {
        if is_empty_cell(cell) {
            continue;
        }
        let value = cell.unwrap_or_default().trim();
        seen_value = true;

        let numeric = match strip_percent(value) {
            Some(prefix) => {
                seen_percent = true;
                parse_number(prefix).is_some()
            }
            None => parse_number(value).is_some(),
        };

        if !numeric {
            return ColumnType::Text;
        }
    }

    if seen_percent {
        ColumnType::Percentage
    } else if seen_value {
        ColumnType::Number
    } else {
        ColumnType::Text
    }
}

// ---------------------------------------------------------------------------
// ColumnTypeCache – memoized inference for an immutable dataset
// ---------------------------------------------------------------------------

/// Remembers inferred types by column name. Only valid for the dataset it
/// was filled from; callers drop it whenever the dataset is replaced.
#[derive(Debug, Clone, Default)]
pub struct ColumnTypeCache {
    types: HashMap<String, ColumnType>,
}

impl ColumnTypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type of `column`, inferring and storing it on first request.
    pub fn get(&mut self, dataset: &Dataset, column: &str) -> ColumnType {
        if let Some(ty) = self.types.get(column) {
            return *ty;
        }
        let ty = infer_column_type(dataset, column);
        log::debug!("Inferred column '{column}' as {ty}");
        self.types.insert(column.to_string(), ty);
        ty
    }

    pub fn clear(&mut self) {
        self.types.clear();
    }
}
