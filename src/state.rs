use std::path::{Path, PathBuf};

use crate::controller::{FilterEdit, FilterRowController, TableView};
use crate::data::filter::{FilterId, FilterRow};
use crate::data::loader::load_dataset;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    /// Filter rows and the rendered table (None until a dataset is loaded).
    pub controller: Option<FilterRowController<TableView>>,

    /// Source of the current dataset.
    pub data_path: Option<PathBuf>,

    /// Optional CSV listing the filterable columns.
    pub columns_path: Option<PathBuf>,

    /// Fatal load error. While set, no filter controls are shown.
    pub load_error: Option<String>,

    /// Non-fatal status message shown in the top bar.
    pub status_message: Option<String>,

    /// Add one empty filter row whenever a dataset is installed.
    pub initial_filter_row: bool,
}

impl AppState {
    pub fn new(columns_path: Option<PathBuf>, initial_filter_row: bool) -> Self {
        Self {
            columns_path,
            initial_filter_row,
            ..Default::default()
        }
    }

    /// Ingest a validated dataset, replacing any previous filters.
    pub fn set_dataset(&mut self, dataset: Dataset, preset: Vec<FilterRow>) {
        let mut controller =
            FilterRowController::new(dataset, TableView::default()).with_filters(preset);
        if self.initial_filter_row && controller.rows().is_empty() {
            controller.add_row();
        }
        self.controller = Some(controller);
        self.load_error = None;
    }

    /// Load `path` (with the configured column list) and install it.
    ///
    /// On failure the previous dataset is discarded so the UI never runs on
    /// partial state.
    pub fn load(&mut self, path: &Path, preset: Vec<FilterRow>) {
        self.data_path = Some(path.to_path_buf());
        match load_dataset(path, self.columns_path.as_deref()) {
            Ok(dataset) => self.set_dataset(dataset, preset),
            Err(e) => {
                log::error!("Failed to load dataset: {e:#}");
                self.controller = None;
                self.load_error = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Reload the current data file, e.g. after the column list changed.
    pub fn reload(&mut self) {
        if let Some(path) = self.data_path.clone() {
            self.load(&path, Vec::new());
        }
    }

    /// Add an empty filter row.
    pub fn add_filter(&mut self) {
        if let Some(c) = &mut self.controller {
            c.add_row();
        }
    }

    /// Apply a batch of edits collected during one frame.
    pub fn apply_edits(&mut self, edits: Vec<(FilterId, FilterEdit)>) {
        let Some(c) = &mut self.controller else {
            return;
        };
        for (id, edit) in edits {
            if !c.update_row(id, edit) {
                log::debug!("Ignoring edit for removed {id}");
            }
        }
    }

    /// Remove a filter row.
    pub fn remove_filter(&mut self, id: FilterId) {
        if let Some(c) = &mut self.controller {
            c.remove_row(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::operators::OperatorKind;
    use std::io::Write;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_adds_initial_row() {
        let file = csv_file("Name,Price\nA,10\nB,20\n");
        let mut state = AppState::new(None, true);
        state.load(file.path(), Vec::new());
        let c = state.controller.as_ref().unwrap();
        assert_eq!(c.rows().len(), 1);
        assert_eq!(c.sink().visible, vec![0, 1]);
    }

    #[test]
    fn test_failed_load_clears_controller() {
        let good = csv_file("Name\nA\n");
        let mut state = AppState::new(None, false);
        state.load(good.path(), Vec::new());
        assert!(state.controller.is_some());

        state.load(Path::new("/definitely/not/here.csv"), Vec::new());
        assert!(state.controller.is_none());
        assert!(state.load_error.is_some());
    }

    #[test]
    fn test_edits_flow_to_table() {
        let file = csv_file("Name,Price\nA,10\nB,20\n");
        let mut state = AppState::new(None, true);
        state.load(file.path(), Vec::new());
        let id = state.controller.as_ref().unwrap().rows()[0].id;
        state.apply_edits(vec![
            (id, FilterEdit::Column(Some("Price".into()))),
            (id, FilterEdit::Operator(Some(OperatorKind::LessThan))),
            (id, FilterEdit::Value("15".into())),
        ]);
        assert_eq!(state.controller.as_ref().unwrap().sink().visible, vec![0]);

        state.remove_filter(id);
        assert_eq!(state.controller.as_ref().unwrap().sink().visible, vec![0, 1]);
    }
}
