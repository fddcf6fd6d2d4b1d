//! CLI argument definitions using clap
//!
//! Commands:
//! - flatorm init --config <path>
//! - flatorm save --config <path> --schema <name> --set field=value ...
//! - flatorm query --config <path> --schema <name> --where field=value ...
//! - flatorm demo --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// flatorm - typed records over a flat text file
#[derive(Parser, Debug)]
#[command(name = "flatorm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default config if missing and create the backing store
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./flatorm.json")]
        config: PathBuf,
    },

    /// Insert or replace one record
    Save {
        /// Path to configuration file
        #[arg(long, default_value = "./flatorm.json")]
        config: PathBuf,

        /// Record type
        #[arg(long)]
        schema: String,

        /// Field assignment, repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Resolve an equality filter and write the results file
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./flatorm.json")]
        config: PathBuf,

        /// Record type
        #[arg(long)]
        schema: String,

        /// Equality constraint, repeatable
        #[arg(long = "where", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        constraints: Vec<(String, String)>,
    },

    /// Seed five users and list those aged 20
    Demo {
        /// Path to configuration file
        #[arg(long, default_value = "./flatorm.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Splits `field=value` at the first `=`
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("age=20").unwrap(),
            ("age".to_string(), "20".to_string())
        );
        assert_eq!(
            parse_assignment("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_assignment("username=").unwrap(),
            ("username".to_string(), String::new())
        );
        assert!(parse_assignment("age").is_err());
        assert!(parse_assignment("=20").is_err());
    }

    #[test]
    fn test_query_command() {
        let cli = Cli::try_parse_from([
            "flatorm", "query", "--schema", "User", "--where", "age=20", "--where", "username=Ivan",
        ])
        .unwrap();
        match cli.command {
            Command::Query {
                config,
                schema,
                constraints,
            } => {
                assert_eq!(config, PathBuf::from("./flatorm.json"));
                assert_eq!(schema, "User");
                assert_eq!(constraints.len(), 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
