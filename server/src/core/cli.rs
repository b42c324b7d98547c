use clap::{Args, Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_POSTGRES_MAX_CONNECTIONS, ENV_POSTGRES_URL, ENV_SEARCH_LIMIT};
use crate::data::filters::PropertyFilter;

#[derive(Parser, Debug)]
#[command(name = "lightbnb")]
#[command(version, about = "LightBnB property rental data access", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// PostgreSQL connection URL
    #[arg(long, global = true, env = ENV_POSTGRES_URL)]
    pub postgres_url: Option<String>,

    /// Maximum number of pooled connections
    #[arg(long, global = true, env = ENV_POSTGRES_MAX_CONNECTIONS)]
    pub max_connections: Option<u32>,

    /// Rows returned by `search` when --limit is not given
    #[arg(long, global = true, env = ENV_SEARCH_LIMIT)]
    pub search_limit: Option<u32>,
}

/// Property search options
#[derive(Args, Clone, Debug, Default)]
pub struct SearchArgs {
    /// Match properties whose city contains this text (case-sensitive)
    #[arg(long)]
    pub city: Option<String>,

    /// Only properties belonging to this owner
    #[arg(long)]
    pub owner_id: Option<i64>,

    /// Minimum nightly price in whole currency units
    #[arg(long = "min-price")]
    pub minimum_price_per_night: Option<u32>,

    /// Maximum nightly price in whole currency units
    #[arg(long = "max-price")]
    pub maximum_price_per_night: Option<u32>,

    /// Minimum average rating
    #[arg(long = "min-rating")]
    pub minimum_rating: Option<f64>,

    /// Number of rows to return
    #[arg(long, short = 'n')]
    pub limit: Option<u32>,
}

impl SearchArgs {
    pub fn filter(&self) -> PropertyFilter {
        PropertyFilter {
            city: self.city.clone(),
            owner_id: self.owner_id,
            minimum_price_per_night: self.minimum_price_per_night,
            maximum_price_per_night: self.maximum_price_per_night,
            minimum_rating: self.minimum_rating,
        }
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Search properties, cheapest first
    Search(SearchArgs),
    /// Look up a user by email or id
    User {
        /// User email
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        email: Option<String>,
        /// User id
        #[arg(long)]
        id: Option<i64>,
    },
    /// Register a user
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List a guest's reservations, earliest first
    Reservations {
        /// Guest user id
        #[arg(long)]
        guest_id: i64,
        /// Number of rows to return
        #[arg(long, short = 'n')]
        limit: Option<u32>,
    },
    /// Add a property from a JSON file
    AddProperty {
        /// JSON file with the property fields (cost_per_night in cents)
        #[arg(long, short = 'f')]
        file: PathBuf,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub postgres_url: Option<String>,
    pub max_connections: Option<u32>,
    pub search_limit: Option<u32>,
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            postgres_url: cli.postgres_url.clone(),
            max_connections: cli.max_connections,
            search_limit: cli.search_limit,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    (CliConfig::from(&cli), cli.command)
}
