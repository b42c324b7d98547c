//! Core application

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::data::executor::QueryExecutor;
use crate::data::postgres::PostgresService;
use crate::data::types::{NewProperty, NewUser};
use crate::data::{property, reservation, user};

pub struct CoreApp {
    pub config: AppConfig,
    pub database: PostgresService,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let config = AppConfig::load(&cli_config)?;
        let database = PostgresService::init(&config.postgres)
            .await
            .context("Failed to connect to PostgreSQL")?;
        let app = Self { config, database };

        let result = app.execute(command).await;
        app.database.close().await;

        let output = result?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Run one command against the pool and return its JSON output
    pub async fn execute(&self, command: Commands) -> Result<Value> {
        dispatch(&self.database, &self.config, command).await
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // stdout carries command output
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }
}

async fn dispatch(
    executor: &dyn QueryExecutor,
    config: &AppConfig,
    command: Commands,
) -> Result<Value> {
    let output = match command {
        Commands::Search(args) => {
            let limit = args.limit.unwrap_or(config.search.default_limit);
            let rows = property::search_properties(executor, &args.filter(), Some(limit)).await?;
            tracing::info!(count = rows.len(), "Search complete");
            serde_json::to_value(rows)?
        }
        Commands::User { email, id } => {
            let found = match (email, id) {
                (Some(email), _) => user::get_user_with_email(executor, &email).await?,
                (None, Some(id)) => user::get_user_with_id(executor, id).await?,
                (None, None) => anyhow::bail!("Either --email or --id is required"),
            };
            if found.is_none() {
                tracing::info!("No matching user");
            }
            serde_json::to_value(found)?
        }
        Commands::AddUser {
            name,
            email,
            password,
        } => {
            let created = user::add_user(
                executor,
                &NewUser {
                    name,
                    email,
                    password,
                },
            )
            .await?;
            tracing::info!(id = created.id, "User added");
            serde_json::to_value(created)?
        }
        Commands::Reservations { guest_id, limit } => {
            let rows = reservation::get_all_reservations(executor, guest_id, limit).await?;
            tracing::info!(guest_id, count = rows.len(), "Reservations loaded");
            serde_json::to_value(rows)?
        }
        Commands::AddProperty { file } => {
            let new_property = read_property_file(&file)?;
            let created = property::add_property(executor, &new_property).await?;
            tracing::info!(id = created.id, "Property added");
            serde_json::to_value(created)?
        }
    };
    Ok(output)
}

fn read_property_file(path: &Path) -> Result<NewProperty> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read property file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse property file: {}", path.display()))
}
