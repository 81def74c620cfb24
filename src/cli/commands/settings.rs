//! Config file commands.

use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use super::open_store;
use crate::config::{self, Config, ConfigError};
use crate::error::{Error, Result};

/// Write file-sourced settings to the config file
pub fn cmd_init_config(path: Option<&Path>, settings: &Config, force: bool) -> anyhow::Result<()> {
    let path = init_config(path, settings, force)?;
    println!("Wrote config to {}", path.display());
    if !settings.provider.has_credentials() {
        println!(
            "Credentials are not written from flags or the environment; \
             set client_id and client_secret under [provider] or keep using \
             CATALOG_CLIENT_ID/CATALOG_CLIENT_SECRET."
        );
    }
    Ok(())
}

/// Print effective settings and check the database
pub fn cmd_check_config(rt: &Runtime, settings: &Config) -> anyhow::Result<()> {
    println!("Settings");
    println!("========");
    match config::config_path() {
        Some(p) => println!("Default config file: {}", p.display()),
        None => println!("Default config file: (no config directory)"),
    }
    println!("Token endpoint:      {}", settings.provider.auth_url);
    println!("API base URL:        {}", settings.provider.api_base_url);
    println!(
        "Credentials:         {}",
        if settings.provider.has_credentials() { "set" } else { "missing" }
    );
    println!("Request timeout:     {}s", settings.provider.request_timeout_secs);
    println!("Cover directory:     {}", settings.storage.cover_dir.display());
    println!("Database:            {}", settings.database.path.display());
    println!();

    let registered = rt.block_on(count_tracks(settings))?;
    println!("✓ Database OK, {} track(s) registered", registered);

    if !settings.provider.has_credentials() {
        anyhow::bail!("provider credentials are missing");
    }
    println!("✓ Provider credentials present");
    Ok(())
}

fn init_config(path: Option<&Path>, settings: &Config, force: bool) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config::config_path().ok_or(ConfigError::NoConfigDir)?,
    };

    if path.exists() && !force {
        return Err(Error::settings(format!(
            "{} already exists, pass --force to overwrite",
            path.display()
        )));
    }

    config::save(settings, &path)?;
    Ok(path)
}

async fn count_tracks(settings: &Config) -> Result<i64> {
    let store = open_store(settings).await?;
    Ok(store.count().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_config_writes_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Config::default();
        settings.provider.client_id = "from-env".to_string();

        assert_eq!(init_config(Some(&path), &settings, false).unwrap(), path);
        assert_eq!(config::load(Some(&path)).provider.client_id, "from-env");

        assert!(matches!(
            init_config(Some(&path), &settings, false),
            Err(Error::Settings(_))
        ));
        assert!(init_config(Some(&path), &Config::default(), true).is_ok());
        assert_eq!(config::load(Some(&path)).provider.client_id, "");
    }

    #[test]
    fn test_init_config_keeps_override_credentials_out_of_file() {
        use crate::cli::Cli;
        use clap::Parser;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cli = Cli::try_parse_from([
            "track-registry",
            "--config",
            path.to_str().unwrap(),
            "--client-id",
            "cli-id",
            "--client-secret",
            "s3cret-from-cli",
            "init-config",
        ])
        .unwrap();

        init_config(cli.config.as_deref(), &cli.file_settings(), false).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("s3cret-from-cli"));
        assert!(!written.contains("cli-id"));
        assert_eq!(config::load(Some(&path)).provider.client_secret, "");

        // The running process still uses the overrides
        assert_eq!(cli.settings().provider.client_secret, "s3cret-from-cli");
    }

    #[test]
    fn test_init_config_preserves_file_credentials() {
        use crate::cli::Cli;
        use clap::Parser;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[provider]\nclient_id = \"file-id\"\nclient_secret = \"file-secret\"\n")
            .unwrap();
        let cli = Cli::try_parse_from([
            "track-registry",
            "--config",
            path.to_str().unwrap(),
            "--client-secret",
            "override",
            "init-config",
            "--force",
        ])
        .unwrap();

        init_config(cli.config.as_deref(), &cli.file_settings(), true).unwrap();
        assert_eq!(config::load(Some(&path)).provider.client_secret, "file-secret");
    }

    #[tokio::test]
    async fn test_count_tracks_on_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Config::default();
        settings.database.path = dir.path().join("sub").join("tracks.db");

        assert_eq!(count_tracks(&settings).await.unwrap(), 0);
        assert!(settings.database.path.exists());
    }
}
