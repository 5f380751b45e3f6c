mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;

use app::PubscopeApp;
use data::aggregate::{self, WordFrequencyConfig};
use data::estimates;
use data::loader;
use state::AppState;

/// Explore research publication metadata: clean a CSV, filter it, chart it.
#[derive(Parser)]
#[command(name = "pubscope", version, about)]
struct Cli {
    /// Metadata CSV to load at startup.
    path: Option<PathBuf>,

    /// Country-year estimates CSV to load at startup.
    #[arg(long, value_name = "PATH")]
    estimates: Option<PathBuf>,

    /// Read at most this many rows from each source file.
    #[arg(long, value_name = "N")]
    rows: Option<usize>,

    /// Number of top title words to report.
    #[arg(long, default_value_t = 50)]
    top_words: usize,

    /// Shortest title word counted.
    #[arg(long, default_value_t = 2)]
    min_word_len: usize,

    /// Print summary statistics to stdout instead of opening the UI.
    #[arg(long)]
    summary: bool,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let word_config = WordFrequencyConfig {
        min_len: cli.min_word_len,
        top_n: cli.top_words,
        ..WordFrequencyConfig::default()
    };

    if cli.summary {
        if let Err(e) = run_summary(&cli, &word_config) {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut app_state = AppState {
        word_config,
        row_cap: cli.rows,
        ..AppState::default()
    };
    if let Some(path) = &cli.path {
        match loader::load_and_clean(path, cli.rows) {
            Ok(table) => app_state.set_table(table),
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                app_state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
    if let Some(path) = &cli.estimates {
        match estimates::load_estimates(path, cli.rows) {
            Ok(table) => app_state.set_estimates(table),
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                app_state.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Pubscope – Metadata Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(PubscopeApp::new(app_state)))),
    )
}

/// Headless mode: load, clean, print the aggregate views, exit.
fn run_summary(cli: &Cli, cfg: &WordFrequencyConfig) -> anyhow::Result<()> {
    anyhow::ensure!(
        cli.path.is_some() || cli.estimates.is_some(),
        "a CSV path (positional or --estimates) is required with --summary"
    );

    if let Some(path) = cli.path.as_deref() {
        let table = loader::load_and_clean(path, cli.rows)?;
        let indices: Vec<usize> = (0..table.len()).collect();

        println!("{} cleaned rows, {} journals", table.len(), table.journals.len());

        println!("\nPublications by year:");
        for (year, n) in aggregate::publications_by_year(&table, &indices) {
            println!("  {year}: {n}");
        }

        println!("\nTop journals:");
        for (journal, n) in aggregate::journal_counts(&table, &indices, 10) {
            println!("  {n:>6}  {journal}");
        }

        println!("\nTop title words:");
        for (word, n) in aggregate::title_word_frequency(&table, &indices, cfg) {
            println!("  {n:>6}  {word}");
        }
    }

    if let Some(path) = cli.estimates.as_deref() {
        let table = estimates::load_estimates(path, cli.rows)?;

        println!("\n{} estimate rows, {} years", table.len(), table.years.len());

        println!("\nEstimated cases (median) by year:");
        for (year, total) in estimates::cases_by_year(&table) {
            println!("  {year}: {total:.0}");
        }

        if let Some(year) = table.latest_year() {
            println!("\nTop countries, {year}:");
            for (country, cases) in estimates::top_countries_for_year(&table, year, 10) {
                println!("  {cases:>10.0}  {country}");
            }
        }
    }

    Ok(())
}
