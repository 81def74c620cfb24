//! Track registration, lookup and cover export commands.

use std::path::Path;
use tokio::runtime::Runtime;

use super::open_service;
use crate::config::Config;
use crate::error::{Error, Result, ResultExt};
use crate::model::{RegistrationOutcome, TrackRecord};
use crate::registry::RegistryError;

/// Register a track by ISRC
pub fn cmd_register(rt: &Runtime, config: &Config, isrc: &str) -> anyhow::Result<()> {
    let outcome = rt.block_on(register(config, isrc))?;

    if outcome.created {
        println!("Registered {}", isrc);
    } else {
        println!("{} was already registered", isrc);
    }
    print_record(&outcome.record);
    Ok(())
}

/// Show a registered track
pub fn cmd_show(rt: &Runtime, config: &Config, isrc: &str, json: bool) -> anyhow::Result<()> {
    let record = rt.block_on(show(config, isrc))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(&record);
    }
    Ok(())
}

/// Export the stored cover of a track
pub fn cmd_cover(rt: &Runtime, config: &Config, isrc: &str, output: &Path) -> anyhow::Result<()> {
    let written = rt.block_on(export_cover(config, isrc, output))?;
    println!("Wrote {} bytes to {}", written, output.display());
    Ok(())
}

async fn register(config: &Config, isrc: &str) -> Result<RegistrationOutcome> {
    if !config.provider.has_credentials() {
        return Err(Error::settings(
            "provider client_id and client_secret must be set \
             (config file, --client-id/--client-secret or CATALOG_CLIENT_ID/CATALOG_CLIENT_SECRET)",
        ));
    }

    let service = open_service(config).await?;
    service.register(isrc).await.map_err(|e| report(isrc, e))
}

async fn show(config: &Config, isrc: &str) -> Result<TrackRecord> {
    let service = open_service(config).await?;
    service.get_by_code(isrc).await.map_err(|e| report(isrc, e))
}

async fn export_cover(config: &Config, isrc: &str, output: &Path) -> Result<usize> {
    let service = open_service(config).await?;
    let bytes = service
        .get_cover_bytes(isrc)
        .await
        .map_err(|e| report(isrc, e))?;

    tokio::fs::write(output, &bytes)
        .await
        .with_context(format!("writing {}", output.display()))?;
    Ok(bytes.len())
}

/// Log a core failure and lift it into the application error.
fn report(isrc: &str, err: RegistryError) -> Error {
    if err.is_not_found() {
        tracing::warn!(isrc = %isrc, error = %err, "Lookup found nothing");
    } else {
        tracing::error!(isrc = %isrc, status = err.http_status(), error = %err, "Operation failed");
    }
    Error::Registry(err)
}

fn print_record(record: &TrackRecord) {
    println!("ISRC:     {}", record.recording_code);
    println!("Title:    {}", record.title);
    println!("Artist:   {}", record.artist_name);
    println!("Album:    {} ({})", record.album_name, record.album_id);
    println!("Explicit: {}", if record.is_explicit { "yes" } else { "no" });
    println!(
        "Duration: {}:{:02}",
        record.duration_seconds / 60,
        record.duration_seconds % 60
    );
    println!("Cover:    {}", record.cover_location);
}
