//! CLI argument parsing for the crm-api binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "crm-api", about = "CRM REST API with spreadsheet import")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server (default if no subcommand given)
    Serve,
    /// Run database migrations and exit
    Migrate,
    /// Import a spreadsheet straight into the database and print the report
    Import {
        #[arg(value_enum)]
        kind: ImportKind,
        /// Path to an .xlsx, .xls or (instagram only) .csv file
        path: PathBuf,
    },
    /// Open a deal for every client that has none
    CreateDeals {
        /// Country of the new deals (defaults to DEFAULT_COUNTRY)
        #[arg(long)]
        country: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportKind {
    Clients,
    Instagram,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_no_command_defaults_to_none() {
        let cli = Cli::parse_from(["crm-api"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_serve_and_migrate_parse() {
        let cli = Cli::parse_from(["crm-api", "serve"]);
        assert!(matches!(cli.command, Some(Command::Serve)));

        let cli = Cli::parse_from(["crm-api", "migrate"]);
        assert!(matches!(cli.command, Some(Command::Migrate)));
    }

    #[test]
    fn test_cli_import_parses_kind_and_path() {
        let cli = Cli::parse_from(["crm-api", "import", "instagram", "leads/accounts.csv"]);
        match cli.command {
            Some(Command::Import { kind, path }) => {
                assert_eq!(kind, ImportKind::Instagram);
                assert_eq!(path, PathBuf::from("leads/accounts.csv"));
            }
            _ => panic!("expected import command"),
        }
    }

    #[test]
    fn test_cli_import_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["crm-api", "import", "tasks", "a.xlsx"]).is_err());
    }

    #[test]
    fn test_cli_create_deals_country_is_optional() {
        let cli = Cli::parse_from(["crm-api", "create-deals"]);
        assert!(matches!(cli.command, Some(Command::CreateDeals { country: None })));

        let cli = Cli::parse_from(["crm-api", "create-deals", "--country", "Грузия"]);
        match cli.command {
            Some(Command::CreateDeals { country }) => assert_eq!(country.as_deref(), Some("Грузия")),
            _ => panic!("expected create-deals command"),
        }
    }
}
