pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "leadbot",
    about = "Leadbot operator CLI",
    long_about = "Inspect leadbot configuration, check Salesforce signing readiness, and list Lead picklist values.",
    after_help = "Examples:\n  leadbot config\n  leadbot doctor --json\n  leadbot picklists"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and confirm the Salesforce signing key can sign assertions")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List active values of every picklist field on the Salesforce Lead object")]
    Picklists {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => commands::CommandResult::text(commands::config::run()),
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Picklists { json } => commands::picklists::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
