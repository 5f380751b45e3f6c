use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No metadata loaded.");
        estimate_controls(ui, state);
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let year_span = table.year_span;
    let journals: Vec<String> = table.journals.iter().cloned().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year range ----
            ui.strong("Year range");
            match year_span {
                Some((min_year, max_year)) => {
                    let (mut lo, mut hi) = state.filters.years.unwrap_or((min_year, max_year));
                    let mut changed = false;
                    changed |= ui
                        .add(egui::Slider::new(&mut lo, min_year..=max_year).text("from"))
                        .changed();
                    changed |= ui
                        .add(egui::Slider::new(&mut hi, min_year..=max_year).text("to"))
                        .changed();
                    if changed {
                        state.set_year_range(lo, hi);
                    }
                }
                None => {
                    ui.label("No parsed dates in this dataset.");
                }
            }
            ui.separator();

            // ---- Journal multi-select ----
            let n_selected = state.filters.journals.len();
            let header_text = format!("Journals  ({n_selected}/{})", journals.len());

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_journals();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_journals();
                        }
                    });

                    for journal in &journals {
                        let mut checked = state.filters.journals.contains(journal);
                        if ui.checkbox(&mut checked, journal).changed() {
                            state.toggle_journal(journal);
                        }
                    }
                });
            ui.separator();

            // ---- Word-frequency knobs ----
            ui.strong("Title words");
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Min length");
                ui.add(egui::DragValue::new(&mut state.word_config.min_len).range(1..=12));
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Top N");
                ui.add(egui::DragValue::new(&mut state.word_config.top_n).range(5..=200));
            });

            estimate_controls(ui, state);
        });
}

/// Year selector for the top-countries view, shown once estimates are
/// loaded.
fn estimate_controls(ui: &mut Ui, state: &mut AppState) {
    let Some(estimates) = &state.estimates else {
        return;
    };
    let years: Vec<i32> = estimates.years.iter().copied().collect();

    ui.separator();
    ui.strong("Estimates");
    let current = state.estimate_year;
    egui::ComboBox::from_label("Year")
        .selected_text(current.map(|y| y.to_string()).unwrap_or_default())
        .show_ui(ui, |ui: &mut Ui| {
            for year in years {
                if ui
                    .selectable_label(current == Some(year), year.to_string())
                    .clicked()
                {
                    state.estimate_year = Some(year);
                }
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
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open estimates…").clicked() {
                open_estimates_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} papers loaded, {} after filters",
                table.len(),
                state.visible_indices.len()
            ));
        }
        if let Some(estimates) = &state.estimates {
            ui.label(format!("{} estimate rows", estimates.len()));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open metadata CSV")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_and_clean(&path, state.row_cap) {
            Ok(table) => {
                log::info!("loaded {} papers from {}", table.len(), path.display());
                state.set_table(table);
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

pub fn open_estimates_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open estimated numbers CSV")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::estimates::load_estimates(&path, state.row_cap) {
            Ok(table) => {
                log::info!("loaded {} estimate rows from {}", table.len(), path.display());
                state.set_estimates(table);
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
