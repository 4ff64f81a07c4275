use clap::{Args, Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_DATABASE_URL};
use crate::filters::split_pair;

#[derive(Parser)]
#[command(name = "jsonfilter")]
#[command(version, about = "Filter PostgreSQL rows by JSON column properties", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// PostgreSQL connection URL (used by `count`)
    #[arg(long, global = true, env = ENV_DATABASE_URL)]
    pub database_url: Option<String>,
}

/// Parse a `property=value` filter argument
fn parse_filter_pair(s: &str) -> Result<(String, String), String> {
    let (property, value) = split_pair(s);
    if property.is_empty() {
        return Err(format!(
            "Invalid filter '{}'. Expected property=value or property[]=value",
            s
        ));
    }
    Ok((property.to_string(), value.to_string()))
}

/// A filter request against one configured resource
#[derive(Args, Clone, Debug)]
pub struct RequestArgs {
    /// Resource name from the config file
    #[arg(long, short = 'r')]
    pub resource: String,

    /// Filter as property=value; repeat property[]=value for several values
    #[arg(long = "filter", short = 'f', value_parser = parse_filter_pair)]
    pub filters: Vec<(String, String)>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Print the filter parameters a resource accepts
    Describe {
        /// Resource name from the config file
        #[arg(long, short = 'r')]
        resource: String,
    },
    /// Compile a filter request and print the SQL with its parameters
    Compile {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Count matching rows in PostgreSQL
    Count {
        #[command(flatten)]
        request: RequestArgs,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub database_url: Option<String>,
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            database_url: cli.database_url.clone(),
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    (CliConfig::from(&cli), cli.command)
}
