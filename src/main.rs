use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ratatui::DefaultTerminal;

mod controller;
mod domain;
mod editor;
mod filter;
mod inputter;
mod logging;
mod model;
mod paging;
mod state;
mod table;
mod ui;
mod view;

use controller::Controller;
use domain::{DEFAULT_PAGE_SIZE, TableConfig, TableError};
use model::{Model, Status};
use table::{SAMPLE_RECORDS, load_records, parse_records};
use ui::TableUI;

/// A tui based paginated record table.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file holding an array of records, the bundled sample is shown when omitted
    path: Option<String>,

    /// Records per page
    #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Milliseconds to wait for input before redrawing
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,

    /// Widest a column is drawn
    #[arg(long, default_value_t = 32)]
    max_column_width: usize,

    /// Log file, defaults to recview.log in the temp directory
    #[arg(long)]
    log_file: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn expand_path(path: &str) -> Result<PathBuf, TableError> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| TableError::LoadingFailed(e.to_string()))
}

fn run(args: Args) -> Result<(), TableError> {
    let log_file = args.log_file.as_deref().map(expand_path).transpose()?;
    logging::init(log_file.as_deref());

    let records = match args.path.as_deref() {
        Some(path) => load_records(&expand_path(path)?)?,
        None => parse_records(SAMPLE_RECORDS)?,
    };

    let cfg = TableConfig::default()
        .with_page_size(args.page_size.max(1))
        .with_event_poll_time(args.poll_ms)
        .with_max_column_width(args.max_column_width);

    let mut model = Model::init(&cfg, records);
    let mut ui = TableUI::new(model.config());
    let controller = Controller::new(&cfg);

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut model, &mut ui, &controller);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    model: &mut Model,
    ui: &mut TableUI,
    controller: &Controller,
) -> Result<(), TableError> {
    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(model)?;
        model.update(message)?;
    }
    Ok(())
}
