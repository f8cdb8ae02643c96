use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use screener_filter::controller::FilterEdit;
use screener_filter::data::filter::{FilterId, FilterRow, SkipReason};
use screener_filter::data::operators::{OperatorKind, operators_for};
use screener_filter::data::types::ColumnType;
use screener_filter::state::AppState;

// ---------------------------------------------------------------------------
// Filter panel – one line per filter row
// ---------------------------------------------------------------------------

/// Everything needed to draw one filter row without borrowing the state.
struct RowView {
    row: FilterRow,
    column_type: Option<ColumnType>,
    operators: &'static [OperatorKind],
    note: Option<String>,
}

/// Render the filter controls.
pub fn filter_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Controls");
    ui.separator();

    if let Some(err) = &state.load_error {
        ui.label(RichText::new(err).color(Color32::RED));
        return;
    }

    let Some(controller) = &mut state.controller else {
        ui.label("No dataset loaded.");
        return;
    };

    // Snapshot rows so we can mutate state after drawing.
    let columns = controller.dataset().filterable_columns().to_vec();
    let rows: Vec<FilterRow> = controller.rows().to_vec();
    let views: Vec<RowView> = rows
        .into_iter()
        .map(|row| {
            let column_type = row.column.as_deref().and_then(|c| controller.column_type(c));
            let operators: &'static [OperatorKind] = match row.column.as_deref() {
                Some(_) => operators_for(column_type),
                None => &[],
            };
            let note = controller
                .report()
                .skip_reason(row.id)
                .filter(|r| !matches!(r, SkipReason::Incomplete | SkipReason::EmptyValue))
                .map(ToString::to_string);
            RowView {
                row,
                column_type,
                operators,
                note,
            }
        })
        .collect();

    let mut edits: Vec<(FilterId, FilterEdit)> = Vec::new();
    let mut removed: Vec<FilterId> = Vec::new();

    ScrollArea::vertical()
        .max_height(220.0)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for view in &views {
                filter_row(ui, view, &columns, &mut edits, &mut removed);
            }
        });

    ui.add_space(4.0);
    let add_clicked = ui.button("Add Filter").clicked();

    state.apply_edits(edits);
    for id in removed {
        state.remove_filter(id);
    }
    if add_clicked {
        state.add_filter();
    }
}

fn filter_row(
    ui: &mut Ui,
    view: &RowView,
    columns: &[String],
    edits: &mut Vec<(FilterId, FilterEdit)>,
    removed: &mut Vec<FilterId>,
) {
    let row = &view.row;
    let id = row.id;

    ui.horizontal(|ui: &mut Ui| {
        // ---- Column ----
        let current_col = row.column.clone().unwrap_or_default();
        let col_text = if current_col.is_empty() {
            "Select Column".to_string()
        } else {
            current_col.clone()
        };
        egui::ComboBox::from_id_salt(("filter_column", id))
            .selected_text(col_text)
            .width(180.0)
            .show_ui(ui, |ui: &mut Ui| {
                for col in columns {
                    if ui.selectable_label(current_col == *col, col).clicked() && current_col != *col {
                        edits.push((id, FilterEdit::Column(Some(col.clone()))));
                    }
                }
            });

        // ---- Operator ----
        let op_text = row
            .operator
            .map(|op| op.label(view.column_type))
            .unwrap_or("Select Operator");
        egui::ComboBox::from_id_salt(("filter_operator", id))
            .selected_text(op_text)
            .width(140.0)
            .show_ui(ui, |ui: &mut Ui| {
                for op in view.operators {
                    let selected = row.operator == Some(*op);
                    if ui.selectable_label(selected, op.label(view.column_type)).clicked() && !selected {
                        edits.push((id, FilterEdit::Operator(Some(*op))));
                    }
                }
            });

        // ---- Value ----
        let mut value = row.value.clone();
        let hint = match view.column_type {
            Some(ColumnType::Number) => "Enter number",
            Some(ColumnType::Percentage) => "e.g. 15% or 0.15",
            _ => "Enter value",
        };
        let enabled = !row.operator.is_some_and(OperatorKind::is_emptiness_check);
        let response = ui.add_enabled(
            enabled,
            egui::TextEdit::singleline(&mut value)
                .hint_text(hint)
                .desired_width(200.0),
        );
        if response.changed() {
            edits.push((id, FilterEdit::Value(value)));
        }

        // ---- Remove ----
        if ui
            .button(RichText::new("Remove").color(Color32::from_rgb(220, 60, 60)))
            .clicked()
        {
            removed.push(id);
        }

        if let Some(note) = &view.note {
            ui.label(RichText::new(note).color(Color32::YELLOW).italics());
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_dataset_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open column list…").clicked() {
                open_columns_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        if let Some(c) = &state.controller {
            ui.label(format!(
                "{} rows loaded, {} visible",
                c.dataset().len(),
                c.sink().visible.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_dataset_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open screener data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path, Vec::new());
    }
}

pub fn open_columns_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open filterable column list")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Using column list {}", path.display());
        state.columns_path = Some(path);
        state.reload();
    }
}
