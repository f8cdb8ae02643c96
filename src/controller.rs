use crate::data::filter::{FilterId, FilterReport, FilterRow, evaluate_filters};
use crate::data::model::Dataset;
use crate::data::operators::{OperatorKind, operators_for};
use crate::data::types::{ColumnType, ColumnTypeCache};

// ---------------------------------------------------------------------------
// TableSink – where recomputed results go
// ---------------------------------------------------------------------------

/// Receiver of the table contents. Called once for headers when the
/// controller is created and with the visible rows after every change.
pub trait TableSink {
    fn render_headers(&mut self, headers: &[String]);

    /// `visible` indexes into `Dataset::rows`. An empty slice means nothing
    /// matched and the sink should show its "no match" state.
    fn render_rows(&mut self, visible: &[usize]);
}

/// Table contents as last rendered, read by the GUI every frame.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    pub headers: Vec<String>,
    pub visible: Vec<usize>,
}

impl TableView {
    /// True when the last recomputation matched no rows.
    pub fn shows_no_match(&self) -> bool {
        self.visible.is_empty()
    }
}

impl TableSink for TableView {
    fn render_headers(&mut self, headers: &[String]) {
        self.headers = headers.to_vec();
    }

    fn render_rows(&mut self, visible: &[usize]) {
        self.visible = visible.to_vec();
    }
}

// ---------------------------------------------------------------------------
// FilterEdit – partial update of one filter row
// ---------------------------------------------------------------------------

/// A single field change on a filter row.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEdit {
    Column(Option<String>),
    Operator(Option<OperatorKind>),
    Value(String),
}

// ---------------------------------------------------------------------------
// FilterRowController
// ---------------------------------------------------------------------------

/// Owns the ordered filter rows for one dataset and re-evaluates the whole
/// filter set on every mutation, pushing the result into its sink.
#[derive(Debug)]
pub struct FilterRowController<S: TableSink> {
    dataset: Dataset,
    rows: Vec<FilterRow>,
    next_id: u64,
    types: ColumnTypeCache,
    report: FilterReport,
    sink: S,
}

impl<S: TableSink> FilterRowController<S> {
    /// Take ownership of the dataset and render the unfiltered table.
    pub fn new(dataset: Dataset, mut sink: S) -> Self {
        sink.render_headers(dataset.headers());
        let mut controller = FilterRowController {
            dataset,
            rows: Vec::new(),
            next_id: 0,
            types: ColumnTypeCache::new(),
            report: FilterReport::default(),
            sink,
        };
        controller.recompute();
        controller
    }

    /// Replace all filter rows with `preset`, assigning fresh ids.
    pub fn with_filters(mut self, preset: Vec<FilterRow>) -> Self {
        self.rows = preset
            .into_iter()
            .map(|row| FilterRow {
                id: self.allocate_id(),
                ..row
            })
            .collect();
        self.recompute();
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn rows(&self) -> &[FilterRow] {
        &self.rows
    }

    pub fn report(&self) -> &FilterReport {
        &self.report
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Append an unset filter row.
    pub fn add_row(&mut self) -> FilterId {
        let id = self.allocate_id();
        self.rows.push(FilterRow::new(id));
        self.recompute();
        id
    }

    /// Apply one field change. Returns `false` for an unknown id.
    ///
    /// Changing the column drops the operator when the new column does not
    /// offer it.
    pub fn update_row(&mut self, id: FilterId, edit: FilterEdit) -> bool {
        let Some(pos) = self.rows.iter().position(|r| r.id == id) else {
            return false;
        };

        match edit {
            FilterEdit::Column(column) => {
                let offered = column.as_deref().map(|c| self.operators_for_column(c));
                let row = &mut self.rows[pos];
                if let (Some(op), Some(offered)) = (row.operator, offered) {
                    if !offered.contains(&op) {
                        row.operator = None;
                    }
                }
                row.column = column;
            }
            FilterEdit::Operator(operator) => self.rows[pos].operator = operator,
            FilterEdit::Value(value) => self.rows[pos].value = value,
        }

        self.recompute();
        true
    }

    /// Delete a filter row. Returns `false` for an unknown id.
    pub fn remove_row(&mut self, id: FilterId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        if self.rows.len() == before {
            return false;
        }
        self.recompute();
        true
    }

    /// Remove every filter row.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.recompute();
    }

    /// Inferred type of a column, or `None` if it is not in the headers.
    pub fn column_type(&mut self, column: &str) -> Option<ColumnType> {
        self.dataset.column_index(column)?;
        Some(self.types.get(&self.dataset, column))
    }

    /// Operators to offer once `column` is selected.
    pub fn operators_for_column(&mut self, column: &str) -> &'static [OperatorKind] {
        operators_for(self.column_type(column))
    }

    fn allocate_id(&mut self) -> FilterId {
        self.next_id += 1;
        FilterId(self.next_id)
    }

    fn recompute(&mut self) {
        self.report = evaluate_filters(&self.dataset, &self.rows);
        self.sink.render_rows(&self.report.visible);
    }
}
