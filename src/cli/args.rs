//! CLI argument definitions using clap
//!
//! Commands:
//! - tabsync check --snapshot <path> --expect <path> [--config <path>]
//! - tabsync eval --type <declared> --literal <literal> --value <json>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tabsync - check database snapshots against declarative fixtures
#[derive(Parser, Debug)]
#[command(name = "tabsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile a JSON snapshot against expected rows
    Check {
        /// Snapshot file: table name to {schema, rows}
        #[arg(long)]
        snapshot: PathBuf,

        /// Expectations file: table name to a list of column to literal maps
        #[arg(long)]
        expect: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate one value against one fixture literal
    Eval {
        /// Declared column type, `?` prefix for nullable
        #[arg(long = "type")]
        declared: String,

        /// Fixture literal, `=` prefix for a predicate
        #[arg(long, allow_hyphen_values = true)]
        literal: String,

        /// Actual value as JSON, plain or tagged (`{"Integer": 1}`)
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from([
            "tabsync", "check", "--snapshot", "db.json", "--expect", "want.json",
        ])
        .unwrap();
        match cli.command {
            Command::Check { snapshot, expect, config } => {
                assert_eq!(snapshot, PathBuf::from("db.json"));
                assert_eq!(expect, PathBuf::from("want.json"));
                assert!(config.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_eval() {
        let cli = Cli::try_parse_from([
            "tabsync", "eval", "--type", "?int", "--literal", "=value > 0", "--value", "-3",
        ])
        .unwrap();
        match cli.command {
            Command::Eval { declared, literal, value } => {
                assert_eq!(declared, "?int");
                assert_eq!(literal, "=value > 0");
                assert_eq!(value, "-3");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
