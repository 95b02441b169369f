//! CLI command definitions for the `bnfc` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod donor;
pub mod fields;
pub mod session;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Donor profile and donation forms.
#[derive(Parser)]
#[command(name = "bnfc", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Emit logs as JSON lines.
        #[arg(long)]
        json_logs: bool,
    },

    /// Show the assembled profile fields.
    Fields {
        /// Fill values from this donor's record instead of an anonymous visitor.
        #[arg(long)]
        email: Option<String>,
    },

    /// Manage donor records.
    Donor {
        #[command(subcommand)]
        action: donor::DonorCommand,
    },

    /// Manage login sessions (access codes).
    Session {
        #[command(subcommand)]
        action: session::SessionCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["bnfc", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, host, json_logs } => {
                assert_eq!(port, 3000);
                assert_eq!(host, "127.0.0.1");
                assert!(!json_logs);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bnfc", "fields", "--email", "ada@example.org", "--json", "-vv"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Fields { email: Some(_) }));
    }
}
