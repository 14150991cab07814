//! Terminal rendition of the cartoons list screen.
//!
//! # Responsibility
//! - Drive the list presenter from the command line.
//! - Print rows on reload and report removed rows.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use cartoon_core::{
    init_logging, AppConfig, FilePreferences, HttpRemoteSource, ListPresenter, ListView,
    LoadOnceCoordinator, SqliteCartoonStore, DELETE_CONFIRMATION_LABEL,
};
use clap::{Parser, Subcommand};

/// Cartoons list loaded once from the remote endpoint.
#[derive(Parser)]
#[command(name = "cartoons", version, about = "Cartoons list loaded once and kept locally")]
struct Cli {
    /// Directory holding the database, preferences and logs.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Character endpoint used by the one-time load.
    #[arg(long)]
    api_url: Option<String>,

    /// Log level: trace, debug, info, warn, error.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the list, loading it on first run.
    List,
    /// Delete the row at INDEX (as shown by `list`).
    Delete { index: usize },
    /// Show whether the one-time load has completed.
    Status,
}

/// Collects removed row indexes; rows are printed once the command finishes.
#[derive(Default)]
struct TerminalView {
    removed: Vec<usize>,
}

impl ListView for TerminalView {
    fn reload_rows(&mut self) {}

    fn remove_row(&mut self, index: usize) {
        self.removed.push(index);
    }
}

type Presenter = ListPresenter<HttpRemoteSource, TerminalView>;

fn main() {
    let cli = Cli::parse();

    let mut config = match cli.data_dir {
        Some(dir) => AppConfig::for_data_dir(dir),
        None => AppConfig::from_env(),
    };
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url);
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    if let Err(err) = run(&config, cli.command) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(config: &AppConfig, command: Commands) -> Result<(), String> {
    config.validate().map_err(|err| err.to_string())?;
    init_logging(&config.log_level, &config.log_dir)?;

    let store = Arc::new(
        SqliteCartoonStore::open(&config.database_path)
            .map_err(|err| format!("store open failed: {err}"))?,
    );
    let prefs = Arc::new(
        FilePreferences::open(&config.preferences_path)
            .map_err(|err| format!("preferences open failed: {err}"))?,
    );
    let coordinator = Arc::new(LoadOnceCoordinator::new(
        store.clone(),
        prefs,
        HttpRemoteSource::new(),
        config.api_url.as_str(),
    ));

    if let Commands::Status = command {
        let loaded = coordinator.is_loaded().map_err(|err| err.to_string())?;
        println!("loaded={loaded}");
        println!("database={}", config.database_path.display());
        return Ok(());
    }

    // Current-thread runtime: the presenter and its rows stay on this thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("runtime start failed: {err}"))?;
    let mut presenter = Presenter::new(store, coordinator, TerminalView::default());

    if let Err(err) = runtime.block_on(presenter.on_screen_ready()) {
        eprintln!("warning: {err}");
    }

    if let Commands::Delete { index } = command {
        println!("{DELETE_CONFIRMATION_LABEL} #{index}");
        presenter.delete_row(index).map_err(|err| err.to_string())?;
        for removed in &presenter.view().removed {
            println!("removed row {removed}");
        }
    }

    print_rows(&presenter);
    Ok(())
}

fn print_rows(presenter: &Presenter) {
    if presenter.row_count() == 0 {
        println!("(no cartoons)");
        return;
    }
    for index in 0..presenter.row_count() {
        if let Some(title) = presenter.render_row(index) {
            println!("{index:>3}  {title}");
        }
    }
}
