mod chart;
mod cli;
mod error;
mod fmt;
mod importer;
mod logging;
mod models;
mod reports;
mod session;
mod settings;
mod store;
mod tui;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Track { sort: None });

    let log_file = command.is_interactive().then(settings::log_path);
    logging::init(log_file.as_deref());

    let result = match command {
        Commands::Track { sort } => cli::track::run(sort),
        Commands::Summarize { file, sort } => cli::summarize::run(&file, sort),
        Commands::Demo { sort } => cli::demo::run(sort),
        Commands::Categories => cli::categories::list(),
        Commands::Init { force } => cli::init::run(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
