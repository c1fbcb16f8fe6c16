mod assigner;
mod batch;
mod cli;
mod error;
mod fmt;
mod ledger;
mod mappings;
mod models;
mod parser;
mod reconciler;
mod reports;
mod settings;
mod store;

use clap::Parser;

use cli::{Cli, Commands, ExportCommands, MappingsCommands, MembersCommands, ReportCommands};
use settings::resolve_data_dir;

fn main() {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir.as_deref());

    let result = match cli.command {
        Commands::Init => cli::init::run(cli.data_dir),
        Commands::Members { command } => match command {
            MembersCommands::Add { name, class, phone, email } => {
                cli::members::add(&data_dir, &name, &class, &phone, &email)
            }
            MembersCommands::List { year } => cli::members::list(&data_dir, year),
        },
        Commands::Import { file, out } => cli::import::run(&data_dir, &file, out.as_deref()),
        Commands::Commit { file } => cli::commit::run(&data_dir, &file),
        Commands::Mappings { command } => match command {
            MappingsCommands::List => cli::mappings::list(&data_dir),
            MappingsCommands::Add { details, member } => {
                cli::mappings::add(&data_dir, &details, &member)
            }
        },
        Commands::Report { command } => match command {
            ReportCommands::Outstanding { month } => {
                cli::report::outstanding_report(&data_dir, month.as_deref())
            }
            ReportCommands::Overview { year } => cli::report::overview(&data_dir, year),
        },
        Commands::Export { command } => match command {
            ExportCommands::Reminders { output, month } => {
                cli::export::reminders(&data_dir, output.as_deref(), month.as_deref())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
