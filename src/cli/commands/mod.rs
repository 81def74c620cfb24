//! CLI command definitions and dispatch.
//!
//! Each group of subcommands is implemented in its own submodule:
//! - `track`: registration, lookup and cover export
//! - `settings`: config file creation and checking

mod settings;
mod track;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::catalog::CatalogClient;
use crate::config::{self, Config};
use crate::db::{self, SqliteTrackStore};
use crate::error::{Result, ResultExt};
use crate::model::validate_recording_code;
use crate::registry::RegistrationService;
use crate::storage::DiskCoverStore;

pub use settings::{cmd_check_config, cmd_init_config};
pub use track::{cmd_cover, cmd_register, cmd_show};

/// Track Registry CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: OS config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Provider client id, overrides the config file
    #[arg(long, global = true, env = "CATALOG_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Provider client secret, overrides the config file
    #[arg(long, global = true, env = "CATALOG_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Database path, overrides the config file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Register a track by ISRC, fetching it from the provider if unknown
    Register {
        /// Recording code, e.g. USMC18620549
        #[arg(value_parser = parse_recording_code)]
        isrc: String,
    },
    /// Show a registered track
    Show {
        /// Recording code
        #[arg(value_parser = parse_recording_code)]
        isrc: String,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export the stored cover image of a registered track
    Cover {
        /// Recording code
        #[arg(value_parser = parse_recording_code)]
        isrc: String,
        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Write a config file; credentials from flags or the environment are left out
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show effective settings and check the database
    CheckConfig,
}

impl Cli {
    /// Settings that may be written back to the config file.
    ///
    /// Credentials given as flags or environment variables are left out.
    pub fn file_settings(&self) -> Config {
        let mut config = config::load(self.config.as_deref());
        if let Some(db) = &self.db {
            config.database.path = db.clone();
        }
        config
    }

    /// Effective settings: the config file with command-line overrides applied.
    pub fn settings(&self) -> Config {
        let mut config = self.file_settings();
        if let Some(id) = &self.client_id {
            config.provider.client_id = id.clone();
        }
        if let Some(secret) = &self.client_secret {
            config.provider.client_secret = secret.clone();
        }
        config
    }
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let settings = cli.settings();

    match &cli.command {
        Commands::Register { isrc } => cmd_register(&rt, &settings, isrc),
        Commands::Show { isrc, json } => cmd_show(&rt, &settings, isrc, *json),
        Commands::Cover { isrc, output } => cmd_cover(&rt, &settings, isrc, output),
        Commands::InitConfig { force } => {
            cmd_init_config(cli.config.as_deref(), &cli.file_settings(), *force)
        }
        Commands::CheckConfig => cmd_check_config(&rt, &settings),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Accept only well-formed recording codes.
fn parse_recording_code(value: &str) -> std::result::Result<String, String> {
    validate_recording_code(value)
        .map(|()| value.to_string())
        .map_err(|e| e.to_string())
}

/// Open the track database, creating its directory if needed.
pub(crate) async fn open_store(config: &Config) -> Result<SqliteTrackStore> {
    let path = &config.database.path;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(format!("creating database directory {}", dir.display()))?;
    }

    let pool = db::init_db(&db::db_url(Some(path)))
        .await
        .with_context(format!("opening database {}", path.display()))?;
    Ok(SqliteTrackStore::new(pool))
}

/// Wire the production collaborators into a registration service.
pub(crate) async fn open_service(config: &Config) -> Result<RegistrationService> {
    let store = open_store(config).await?;
    let provider = CatalogClient::new(&config.provider).with_context("building provider client")?;
    let covers = DiskCoverStore::new(
        config.storage.cover_dir.clone(),
        Duration::from_secs(config.storage.io_timeout_secs),
    );

    Ok(RegistrationService::new(
        Arc::new(store),
        Arc::new(provider),
        Arc::new(covers),
    ))
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
    fn test_register_rejects_malformed_code() {
        assert!(Cli::try_parse_from(["track-registry", "register", "usmc18620549"]).is_err());
        assert!(Cli::try_parse_from(["track-registry", "register", "SHORT"]).is_err());
        assert!(Cli::try_parse_from(["track-registry", "register", "USMC18620549"]).is_ok());
    }

    #[test]
    fn test_overrides_apply_to_settings() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "track-registry",
            "--config",
            dir.path().join("absent.toml").to_str().unwrap(),
            "--client-id",
            "cli-id",
            "--client-secret",
            "cli-secret",
            "--db",
            "/tmp/override.db",
            "check-config",
        ])
        .unwrap();

        let settings = cli.settings();
        assert_eq!(settings.provider.client_id, "cli-id");
        assert_eq!(settings.provider.client_secret, "cli-secret");
        assert_eq!(settings.database.path, PathBuf::from("/tmp/override.db"));
    }

    #[test]
    fn test_show_json_flag() {
        let cli = Cli::try_parse_from(["track-registry", "show", "USMC18620549", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Show { json: true, .. }));
    }
}
