mod printer;
mod ui;

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{Parser, Subcommand, ValueEnum};
use egui::Vec2;
use paddock::{
    AppConfig, ErgastClient, FlagTable, LogReporter, PaddockError, StoredConfig,
    ViewController,
    table::{SortOrder, TableState},
};
use ui::DriverApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Season to show, defaults to the configured one
    #[arg(short, long, global = true)]
    season: Option<String>,

    /// Root of the Ergast compatible API
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory holding img/<familyname>.jpg portraits
    #[arg(long, global = true)]
    asset_dir: Option<PathBuf>,

    /// JSON flag table replacing the built-in one
    #[arg(long, global = true)]
    flags: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the driver dashboard
    Show { driver_id: String },
    /// Print the driver card and results table to the terminal
    Print {
        driver_id: String,

        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Only show races whose name contains this text, can be repeated
        #[arg(short, long)]
        filter: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Asc => SortOrder::Ascending,
            SortArg::Desc => SortOrder::Descending,
        }
    }
}

/// Returns the stored config and the one in effect once CLI overrides are applied.
fn load_config(args: &Args) -> (StoredConfig, AppConfig) {
    let stored = StoredConfig::load();
    let mut config = stored.config.clone();
    if let Some(season) = &args.season {
        config.season = season.clone();
    }
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(asset_dir) = &args.asset_dir {
        config.asset_dir = Some(asset_dir.clone());
    }
    if let Some(flags) = &args.flags {
        config.flags_file = Some(flags.clone());
    }
    (stored, config)
}

fn load_flags(config: &AppConfig) -> Result<FlagTable, PaddockError> {
    match &config.flags_file {
        Some(path) => FlagTable::from_file(path),
        None => Ok(FlagTable::builtin()),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, PaddockError> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|e| PaddockError::RuntimeError { source: e })
}

fn show(
    driver_id: &str,
    config: AppConfig,
    stored_config: StoredConfig,
) -> Result<(), PaddockError> {
    let runtime = runtime()?;
    let flags = load_flags(&config)?;
    let client = ErgastClient::new(
        &config.base_url,
        Duration::from_secs(config.request_timeout_s),
    )?;
    let controller = ViewController::new(
        Arc::new(client),
        Arc::new(LogReporter),
        runtime.handle().clone(),
        &config.season,
    );

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size(Vec2::new(config.window_width, config.window_height));

    let driver_id = driver_id.to_string();
    eframe::run_native(
        "Paddock",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(DriverApp::new(
                controller,
                flags,
                config,
                stored_config,
                &driver_id,
                cc,
            )))
        }),
    )
    .map_err(|e| PaddockError::UiError {
        description: e.to_string(),
    })
}

fn print(driver_id: &str, config: AppConfig, table_state: TableState) -> Result<(), PaddockError> {
    let runtime = runtime()?;
    let flags = load_flags(&config)?;
    let client = ErgastClient::new(
        &config.base_url,
        Duration::from_secs(config.request_timeout_s),
    )?;
    printer::print_driver(&runtime, &client, &flags, &config, driver_id, &table_state)
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let (stored_config, config) = load_config(&cli);
    let result = match &cli.command {
        Commands::Show { driver_id } => show(driver_id, config, stored_config),
        Commands::Print {
            driver_id,
            sort,
            filter,
        } => {
            let table_state = TableState {
                selected_filters: filter.iter().cloned().collect(),
                sort: sort.map(SortOrder::from),
                ..TableState::default()
            };
            print(driver_id, config, table_state)
        }
    };
    if let Err(e) = result {
        eprintln!("{}", e.summary());
        std::process::exit(1);
    }
}
