use crate::error::DatasetError;

// ---------------------------------------------------------------------------
// Row – one record of the source table
// ---------------------------------------------------------------------------

/// A single data row. Cells are kept as the raw text delivered by the loader;
/// null cells arrive as empty strings.
pub type Row = Vec<String>;

/// Whether a cell counts as empty: absent, or blank after trimming.
pub fn is_empty_cell(cell: Option<&str>) -> bool {
    match cell {
        Some(c) => c.trim().is_empty(),
        None => true,
    }
}

// ---------------------------------------------------------------------------
// DatasetParts – what the loader hands over before validation
// ---------------------------------------------------------------------------

/// Raw pieces delivered by a dataset source. Every field is optional so a
/// source that failed to produce one of them can be reported precisely.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct DatasetParts {
    pub headers: Option<Vec<String>>,
    pub rows: Option<Vec<Row>>,
    pub filterable_columns: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Dataset – the immutable table the filter engine works on
// ---------------------------------------------------------------------------

/// The loaded table plus the curated list of columns the user may filter on.
///
/// Rows whose length differs from `headers` are kept untouched. Reads go
/// through [`Dataset::cell`], which yields `None` past the end of a short
/// row and never looks at cells beyond the header count.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Row>,
    filterable_columns: Vec<String>,
}

impl Dataset {
    /// Build a dataset from already-separated parts.
    pub fn new(
        headers: Vec<String>,
        rows: Vec<Row>,
        filterable_columns: Vec<String>,
    ) -> Result<Self, DatasetError> {
        if headers.is_empty() {
            return Err(DatasetError::NoColumns);
        }

        let mut distinct: Vec<String> = Vec::with_capacity(filterable_columns.len());
        for col in filterable_columns {
            if col.trim().is_empty() || distinct.contains(&col) {
                continue;
            }
            distinct.push(col);
        }

        let dataset = Dataset {
            headers,
            rows,
            filterable_columns: distinct,
        };

        let malformed = dataset.malformed_row_count();
        if malformed > 0 {
            log::warn!(
                "{malformed} of {} rows do not have {} cells; missing cells read as empty, extra cells are ignored",
                dataset.rows.len(),
                dataset.headers.len()
            );
        }

        Ok(dataset)
    }

    /// Validate loader output. Fails when any part was not delivered.
    pub fn from_parts(parts: DatasetParts) -> Result<Self, DatasetError> {
        let headers = parts
            .headers
            .ok_or(DatasetError::Missing { field: "headers" })?;
        let rows = parts.rows.ok_or(DatasetError::Missing { field: "rows" })?;
        let filterable_columns = parts.filterable_columns.ok_or(DatasetError::Missing {
            field: "filterable_columns",
        })?;
        Self::new(headers, rows, filterable_columns)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn filterable_columns(&self) -> &[String] {
        &self.filterable_columns
    }

    /// Resolve a column name to its index in `headers` (first match wins).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (`row`, `column`), or `None` when the row is shorter than the
    /// header or the column is outside the header range.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        if column >= self.headers.len() {
            return None;
        }
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Iterate the values of one column in row order.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, column))
    }

    /// Number of rows whose cell count differs from the header count.
    pub fn malformed_row_count(&self) -> usize {
        let width = self.headers.len();
        self.rows.iter().filter(|r| r.len() != width).count()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
