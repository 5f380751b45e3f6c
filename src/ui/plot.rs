use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, Points};

use crate::color;
use crate::data::aggregate::{
    journal_counts, publications_by_year, source_counts, title_word_frequency,
};
use crate::data::estimates::{self, EstimatesTable};
use crate::data::model::CleanedTable;
use crate::state::{AppState, View};

/// Journals shown in the top-journals chart.
const TOP_JOURNALS: usize = 20;
/// Countries shown in the top-countries chart.
const TOP_COUNTRIES: usize = 10;
/// Rows shown in the raw-data preview.
const PREVIEW_ROWS: usize = 50;

// ---------------------------------------------------------------------------
// Central panel – aggregate views
// ---------------------------------------------------------------------------

/// Render the view selector and the active aggregate view. Every chart is
/// recomputed from the filtered row subset on each frame.
pub fn central_view(ui: &mut Ui, state: &mut AppState) {
    if state.table.is_none() && state.estimates.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a metadata or estimates CSV to explore it  (File → Open…)");
        });
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        for view in View::ALL {
            if ui.selectable_label(state.view == view, view.label()).clicked() {
                state.view = view;
            }
        }
    });
    ui.separator();

    if state.view.uses_estimates() {
        match &state.estimates {
            Some(est) => estimates_view(ui, est, state.view, state.estimate_year),
            None => {
                ui.label("No estimates CSV loaded  (File → Open estimates…).");
            }
        }
        return;
    }

    let Some(table) = &state.table else {
        ui.label("No metadata CSV loaded  (File → Open…).");
        return;
    };
    let indices = &state.visible_indices;

    match state.view {
        View::Years => years_chart(ui, table, indices),
        View::Journals => {
            horizontal_counts(ui, "journals_plot", &journal_counts(table, indices, TOP_JOURNALS))
        }
        View::Words => horizontal_counts(
            ui,
            "words_plot",
            &title_word_frequency(table, indices, &state.word_config),
        ),
        View::Sources => horizontal_counts(ui, "sources_plot", &source_counts(table, indices)),
        View::Preview => preview_table(ui, table, indices),
        // Estimates views returned above.
        View::EstimatedCases | View::TopCountries => {}
    }
}

fn estimates_view(ui: &mut Ui, table: &EstimatesTable, view: View, year: Option<i32>) {
    match view {
        View::TopCountries => top_countries_chart(ui, table, year),
        _ => cases_chart(ui, table),
    }
}

// ---------------------------------------------------------------------------
// Metadata charts
// ---------------------------------------------------------------------------

fn years_chart(ui: &mut Ui, table: &CleanedTable, indices: &[usize]) {
    let counts = publications_by_year(table, indices);
    let bars: Vec<Bar> = counts
        .iter()
        .map(|(&year, &n)| {
            Bar::new(year as f64, n as f64)
                .width(0.7)
                .name(year.to_string())
        })
        .collect();
    let chart = BarChart::new(bars).color(color::YEAR_BAR).name("Publications");

    Plot::new("years_plot")
        .x_axis_label("Year")
        .y_axis_label("Publications")
        .allow_scroll(false)
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| integer_label(mark.value))
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Horizontal bar chart of (category, count) pairs, largest at the top.
fn horizontal_counts(ui: &mut Ui, id: &str, counts: &[(String, u64)]) {
    let items: Vec<(String, f64)> = counts
        .iter()
        .map(|(label, n)| (label.clone(), *n as f64))
        .collect();
    horizontal_bars(ui, id, &items, "Papers");
}

/// Horizontal bar chart of (category, value) pairs, largest at the top.
fn horizontal_bars(ui: &mut Ui, id: &str, items: &[(String, f64)], x_label: &str) {
    let n = items.len();
    let palette = color::generate_palette(n);
    let labels: Vec<String> = items.iter().map(|(label, _)| label.clone()).collect();

    let bars: Vec<Bar> = items
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::new((n - 1 - i) as f64, *value)
                .width(0.6)
                .fill(palette[i])
                .name(label.clone())
        })
        .collect();
    let chart = BarChart::new(bars).horizontal();

    Plot::new(id)
        .x_axis_label(x_label.to_string())
        .allow_scroll(false)
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let v = mark.value;
            if (v - v.round()).abs() > 0.01 {
                return String::new();
            }
            let idx = n as i64 - 1 - v.round() as i64;
            if (0..n as i64).contains(&idx) {
                labels[idx as usize].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

fn integer_label(value: f64) -> String {
    if (value - value.round()).abs() < 0.01 {
        format!("{}", value.round() as i64)
    } else {
        String::new()
    }
}

// ---------------------------------------------------------------------------
// Estimates charts
// ---------------------------------------------------------------------------

fn cases_chart(ui: &mut Ui, table: &EstimatesTable) {
    let totals = estimates::cases_by_year(table);
    let points: Vec<[f64; 2]> = totals.iter().map(|(&year, &cases)| [year as f64, cases]).collect();

    Plot::new("cases_plot")
        .x_axis_label("Year")
        .y_axis_label("Cases (median)")
        .allow_scroll(false)
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| integer_label(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points.clone())
                    .color(color::YEAR_BAR)
                    .width(2.0)
                    .name("Cases (median)"),
            );
            plot_ui.points(Points::new(points).radius(3.0).color(color::YEAR_BAR));
        });
}

fn top_countries_chart(ui: &mut Ui, table: &EstimatesTable, year: Option<i32>) {
    let Some(year) = year else {
        ui.label("No year with estimates available.");
        return;
    };
    let top = estimates::top_countries_for_year(table, year, TOP_COUNTRIES);
    if top.is_empty() {
        ui.label(format!("No case estimates for {year}."));
        return;
    }
    ui.strong(format!("Top countries by estimated cases, {year}"));
    horizontal_bars(ui, "countries_plot", &top, "Cases (median)");
}

// ---------------------------------------------------------------------------
// Raw-row preview
// ---------------------------------------------------------------------------

fn preview_table(ui: &mut Ui, table: &CleanedTable, indices: &[usize]) {
    let rows: Vec<usize> = indices.iter().copied().take(PREVIEW_ROWS).collect();

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .column(Column::remainder())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("ID");
            });
            header.col(|ui| {
                ui.strong("Title");
            });
            header.col(|ui| {
                ui.strong("Authors");
            });
            header.col(|ui| {
                ui.strong("Journal");
            });
            header.col(|ui| {
                ui.strong("Year");
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let paper = &table.papers[rows[row.index()]];
                row.col(|ui| {
                    ui.label(paper.id.as_deref().unwrap_or(""));
                });
                row.col(|ui| {
                    ui.label(&paper.title);
                });
                row.col(|ui| {
                    ui.label(paper.authors.as_deref().unwrap_or(""));
                });
                row.col(|ui| {
                    ui.label(&paper.journal);
                });
                row.col(|ui| {
                    ui.label(paper.year.map(|y| y.to_string()).unwrap_or_default());
                });
            });
        });
}
