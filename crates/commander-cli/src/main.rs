//! Commander CLI
//!
//! Runs the HTTP service and offers read-only operator commands

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "commander")]
#[command(about = "Commander - a catalogue of shell commands per platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Print every stored command as JSON
    List(commands::list::ListArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args),
        Commands::List(args) => commands::list::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "commander",
            "serve",
            "--port",
            "8080",
            "--database",
            "/tmp/c.db",
        ])
        .unwrap();

        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.database.as_deref(), Some("/tmp/c.db"));
                assert!(args.host.is_none());
            }
            other => panic!("Expected Serve, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from(["commander", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List(_)));
    }
}
