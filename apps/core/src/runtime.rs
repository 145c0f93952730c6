use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::action_executor::{ActionVariant, LoggingExecutor};
use crate::config::{self, ConfigError};
use crate::contract::{command_count, result_rows, ResultRow, SearchResponse};
use crate::core_service::{CommandSearch, ServiceError};
use crate::discovery::{MenuScanner, MenuTreeScanner, ScanError};
use crate::logging::LoggingError;
use crate::pins::FilePinStorage;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Debug, Parser)]
#[command(name = "cmdsearch-core", about = "Search and run host menu commands")]
pub struct Cli {
    /// Config file (defaults to the app data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Menu tree dump to index instead of the configured one
    #[arg(long, global = true)]
    pub menu: Option<PathBuf>,

    /// Pin set file to use instead of the configured one
    #[arg(long, global = true)]
    pub pins: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Filter commands; pinned commands are always listed
    Search {
        /// Pin set to activate before filtering
        #[arg(long)]
        set: Option<String>,
        #[arg(long)]
        json: bool,
        query: Vec<String>,
    },
    /// List stored pin sets
    Sets,
    /// Pin the given commands and store them as a named set
    Save {
        name: String,
        #[arg(long = "pin", required = true)]
        pins: Vec<String>,
    },
    /// Delete a stored pin set
    Delete { name: String },
    /// Print the focus hotkey binding for the host to register
    Binding {
        #[arg(long)]
        json: bool,
    },
    /// Trigger a command by id
    Run {
        id: String,
        #[arg(long)]
        option: bool,
    },
}

pub fn run(cli: Cli) -> Result<(), RuntimeError> {
    let mut cfg = config::load(cli.config.as_deref())?;
    if cli.verbose {
        cfg.log_level = "debug".to_string();
    }
    if let Some(pins) = cli.pins {
        cfg.pins_path = Some(pins);
    }
    if let Some(menu) = cli.menu {
        cfg.menu_dump_path = Some(menu);
    }

    if let Err(error) = crate::logging::init(&cfg.log_level) {
        eprintln!("[cmdsearch-core] logging disabled: {error}");
    }
    tracing::info!(
        hotkey = %cfg.hotkey,
        config_path = %cfg.config_path.display(),
        "startup"
    );

    let scanner: Box<dyn MenuScanner> = match &cfg.menu_dump_path {
        Some(path) => Box::new(MenuTreeScanner::from_path(path)?),
        None => Box::new(MenuTreeScanner::deterministic_fixture()),
    };
    let storage = Box::new(FilePinStorage::from_config(&cfg));
    let mut session = CommandSearch::new(cfg, scanner, storage)?;
    session.refresh();

    match cli.command {
        Command::Search { set, json, query } => {
            if let Some(set) = set {
                session.activate_set(&set);
            }
            let query = query.join(" ");
            let rows = result_rows(&session.search(&query));
            if json {
                let response = SearchResponse {
                    query,
                    active_set: session.active_set().map(str::to_string),
                    rows,
                };
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_rows(&rows);
            }
        }
        Command::Sets => {
            let active = session.active_set().map(str::to_string);
            for (name, paths) in session.pin_sets() {
                let marker = if active.as_deref() == Some(name.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {name} ({} commands)", paths.len());
            }
        }
        Command::Save { name, pins } => {
            for id in &pins {
                session.set_pinned(id, true)?;
            }
            let count = session.save_set(&name)?;
            println!("[cmdsearch-core] saved pin set '{name}' with {count} commands");
        }
        Command::Delete { name } => {
            session.delete_set(&name)?;
            println!("[cmdsearch-core] deleted pin set '{name}'");
        }
        Command::Binding { json } => {
            let binding = session.focus_binding()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&binding)?);
            } else {
                println!(
                    "{} -> {} ({})",
                    binding.chord, binding.command, binding.operation
                );
            }
        }
        Command::Run { id, option } => {
            let variant = if option {
                ActionVariant::Option
            } else {
                ActionVariant::Primary
            };
            let mut executor = LoggingExecutor::default();
            session.execute(&id, variant, &mut executor)?;
            for handle in &executor.triggered {
                println!("[cmdsearch-core] triggered {handle}");
            }
        }
    }

    Ok(())
}

fn print_rows(rows: &[ResultRow]) {
    if command_count(rows) == 0 {
        println!("[cmdsearch-core] no matching commands");
        return;
    }

    for row in rows {
        match row {
            ResultRow::Group(group) => println!("-- {group} --"),
            ResultRow::Command(command) => {
                let pin = if command.pinned { "*" } else { " " };
                let option = if command.has_option { " [+]" } else { "" };
                println!("{pin} {}{option}    ({})", command.name, command.hierarchy);
            }
        }
    }
}
