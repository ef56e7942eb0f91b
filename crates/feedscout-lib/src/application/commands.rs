//! Command execution handlers

use crate::application::cli::OutputFormat;
use crate::application::env::EnvironmentConfig;
use crate::application::{AppConfig, CliConfig, Commands};
use crate::feeds::{FeedKind, FeedSet};
use crate::graph::{CancellationFlag, DependencyDiscovery, DiscoveryLimits};
use crate::logger::Logger;
use crate::networking::{HttpClient, NetworkingManager};
use crate::primitives::{DependencyEdge, FeedDescriptor, LoggerError};
use anyhow::{Context, Result, bail};
use indicatif::ProgressStyle;
use serde::Serialize;
use std::sync::Arc;
use tracing::{Instrument, info, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// Outcome of one `discover` run, as printed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    pub package: String,
    pub version: String,
    pub truncated: bool,
    /// Sorted by package name, then range text
    pub dependencies: Vec<DependencyEdge>,
}

impl DiscoveryReport {
    /// One `name range` line per dependency
    pub fn to_text(&self) -> String {
        self.dependencies
            .iter()
            .map(|edge| format!("{edge}\n"))
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize discovery report")
    }
}

/// One row of `feedscout feeds`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSummary {
    pub url: String,
    pub protocol_version: String,
    pub supported: bool,
    pub kind: FeedKind,
    pub authenticated: bool,
}

impl FeedSummary {
    pub fn from_descriptor(descriptor: &FeedDescriptor) -> Self {
        Self {
            url: descriptor.repository_url.clone(),
            protocol_version: descriptor.protocol_version.clone(),
            supported: descriptor.is_supported(),
            kind: FeedKind::detect(&descriptor.repository_url),
            authenticated: descriptor.auth_header.is_some(),
        }
    }
}

impl std::fmt::Display for FeedSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let adapter = if self.supported {
            self.kind.to_string()
        } else {
            format!("skipped (protocol {})", self.protocol_version)
        };
        let auth = if self.authenticated { " [auth]" } else { "" };
        write!(f, "{}\t{adapter}{auth}", self.url)
    }
}

/// Execute CLI commands
pub async fn execute_command(config: CliConfig) -> Result<()> {
    init_logger(&config.app_config)?;

    let Some(command) = config.command else {
        eprintln!("feedscout - transitive dependency discovery for NuGet feeds");
        eprintln!("Run 'feedscout --help' for usage information");
        return Ok(());
    };

    match command {
        Commands::Discover {
            package,
            version,
            format,
        } => handle_discover(&config.app_config, &package, &version, format).await,
        Commands::Feeds => handle_feeds(&config.app_config),
    }
}

fn init_logger(config: &AppConfig) -> Result<()> {
    let ansi = EnvironmentConfig::load()?.use_ansi();
    match Logger::init(config.to_logger_config(ansi)) {
        Ok(_) | Err(LoggerError::AlreadyInitialized) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn handle_discover(
    config: &AppConfig,
    package: &str,
    version: &str,
    format: OutputFormat,
) -> Result<()> {
    let descriptors = config.feed_descriptors()?;
    if descriptors.is_empty() {
        bail!("No feeds configured; pass --feed <url> or --feeds-file <path>");
    }

    let http = Arc::new(NetworkingManager::new(config.networking_config())?);

    let cancellation = CancellationFlag::new();
    let interrupt = {
        let cancellation = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling discovery");
                cancellation.cancel();
            }
        })
    };

    let span = crate::progress_span!("discover", package = package, version = version);
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]") {
        span.pb_set_style(&style);
    }
    span.pb_set_message(&format!("Discovering dependencies of {package} {version}"));

    let report = run_discovery(
        http,
        &descriptors,
        config.limits(),
        cancellation,
        package,
        version,
    )
    .instrument(span)
    .await;
    interrupt.abort();
    let report = report?;

    if report.truncated {
        warn!("Result is partial; raise --max-depth or --max-nodes to explore further");
    }

    match format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}

/// Build the feed set from `descriptors` and run one discovery
pub async fn run_discovery<H: HttpClient>(
    http: Arc<H>,
    descriptors: &[FeedDescriptor],
    limits: DiscoveryLimits,
    cancellation: CancellationFlag,
    package: &str,
    version: &str,
) -> Result<DiscoveryReport> {
    let feeds = FeedSet::from_descriptors(http, descriptors);
    if feeds.is_empty() {
        bail!("None of the configured feeds speak protocol v3");
    }
    info!(feeds = feeds.len(), package, version, "querying feeds");

    let result = DependencyDiscovery::new(feeds)
        .with_limits(limits)
        .with_cancellation(cancellation)
        .discover(package, version)
        .await
        .with_context(|| format!("Discovery of {package} {version} did not complete"))?;

    Ok(DiscoveryReport {
        package: package.to_string(),
        version: version.to_string(),
        truncated: result.is_truncated(),
        dependencies: result.into_sorted_vec(),
    })
}

fn handle_feeds(config: &AppConfig) -> Result<()> {
    let descriptors = config.feed_descriptors()?;
    if descriptors.is_empty() {
        println!("No feeds configured");
        return Ok(());
    }

    for descriptor in &descriptors {
        println!("{}", FeedSummary::from_descriptor(descriptor));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    include!("commands.test.rs");
}
