//! CLI entrypoint for sighting
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use sighting_application::{NoProgress, RefreshVoteCachesUseCase, VotingContext};
use sighting_domain::OutputFormat;
use sighting_infrastructure::{
    CatalogSnapshot, ConfigLoader, FileConfig, InMemoryObservationStore, JsonlVoteAuditLog,
    StaticUserDirectory,
};
use sighting_presentation::{
    Cli, ConsoleFormatter, ProgressReporter, ReplayRunner, ReplayScript, ReportFormatter,
    observation_views,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = load_config(&cli)?;
    if !config.output.color {
        colored::control::set_override(false);
    }

    // === Catalog ===
    let catalog_path = cli.catalog.clone().or_else(|| config.catalog.path.clone());
    let snapshot = match &catalog_path {
        Some(path) if path.exists() => CatalogSnapshot::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        Some(path) => {
            info!("Catalog {} does not exist yet; starting empty", path.display());
            CatalogSnapshot::default()
        }
        None => CatalogSnapshot::default(),
    };

    let script = match &cli.script {
        Some(path) => ReplayScript::load(path)?,
        None if catalog_path.is_some() => ReplayScript::default(),
        None => bail!("A replay script is required when no catalog is configured."),
    };

    // === Dependency Injection ===
    let mut directory = StaticUserDirectory::from_records(&snapshot.users);
    for user in &script.users {
        directory.upsert(user.id.clone(), user.contribution);
    }
    let directory = Arc::new(directory);
    let store = Arc::new(InMemoryObservationStore::with_observations(
        snapshot.observations,
    ));

    let mut ctx = VotingContext::new(Arc::clone(&store), Arc::clone(&directory));
    if let Some(path) = config.audit.active_path() {
        match JsonlVoteAuditLog::open(path) {
            Some(log) => {
                info!("Auditing votes to {}", log.path().display());
                ctx = ctx.with_audit_log(Arc::new(log));
            }
            None => warn!("Audit log disabled: cannot open {}", path.display()),
        }
    }

    // Stored caches were computed under whatever weights held at save time
    if !store.is_empty() {
        let refresh = RefreshVoteCachesUseCase::new(ctx.clone()).execute().await?;
        info!(
            "Recomputed caches for {} observation(s): {} changed, {} consensus change(s)",
            refresh.observations,
            refresh.caches_changed,
            refresh.consensus_changes.len()
        );
        for (id, reason) in &refresh.failures {
            warn!("Could not refresh {}: {}", id, reason);
        }
    }

    info!(
        "Replaying {} action(s) over {} stored observation(s)",
        script.actions.len(),
        store.len()
    );
    let runner = ReplayRunner::new(ctx).with_strict(cli.strict);
    let report = if cli.quiet {
        runner.run(&script, &NoProgress).await?
    } else {
        runner.run(&script, &ProgressReporter::new()).await?
    };

    // === Output ===
    let observations = store.snapshot();
    let views = observation_views(&observations, directory.as_ref());
    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    println!("{}", ConsoleFormatter.format(format, &report, &views));

    if let Some(path) = save_path(&cli, &config, catalog_path) {
        let snapshot = CatalogSnapshot {
            users: directory.records(),
            observations,
        };
        snapshot
            .save(&path)
            .with_context(|| format!("Failed to save catalog {}", path.display()))?;
        info!("Saved catalog to {}", path.display());
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            error!("{}", issue.message);
        } else {
            warn!("{}", issue.message);
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }
    Ok(config)
}

/// `--save` wins; otherwise `save_on_exit` writes back to the catalog path
fn save_path(cli: &Cli, config: &FileConfig, catalog_path: Option<PathBuf>) -> Option<PathBuf> {
    cli.save
        .clone()
        .or_else(|| catalog_path.filter(|_| config.catalog.save_on_exit))
}
