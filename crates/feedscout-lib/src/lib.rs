//! # feedscout Library
//!
//! Transitive dependency discovery across NuGet v3 feeds.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Package coordinates, dependency edges, feed descriptors, shared errors
//! - [`graph`] - Depth-first discovery with literal-range deduplication
//! - [`feeds`] - Flat-container and Azure Artifacts protocol adapters
//! - [`networking`] - reqwest client with 429 backoff behind the `HttpClient` seam
//! - [`logger`] - Structured logging with progress tracking
//! - [`application`] - CLI interface and configuration management
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use feedscout_lib::{DependencyDiscovery, FeedDescriptor, FeedSet, NetworkingConfig, NetworkingManager};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let http = Arc::new(NetworkingManager::new(NetworkingConfig::default())?);
//! let feeds = FeedSet::from_descriptors(http, &[FeedDescriptor::v3("https://api.nuget.org/v3/index.json")]);
//!
//! let dependencies = DependencyDiscovery::new(feeds)
//!     .discover("Serilog.Sinks.File", "5.0.0")
//!     .await?;
//! for edge in dependencies.into_sorted_vec() {
//!     println!("{edge}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod feeds;
pub mod graph;
pub mod logger;
pub mod networking;
pub mod primitives;

// Re-export commonly used types for convenience
pub use application::{AppConfig, Cli, Commands, execute_command};
pub use feeds::{FeedError, FeedSet};
pub use graph::{
    CancellationFlag, DependencyDiscovery, DependencySet, DependencySource, DiscoveryError,
    DiscoveryLimits,
};
pub use logger::Logger;
pub use networking::{HttpClient, NetworkingConfig, NetworkingError, NetworkingManager};
pub use primitives::{
    AuthHeader, ConfigError, DependencyEdge, FeedDescriptor, LogFormat, LogLevel, LogOutput,
    LoggerError, PackageCoordinate,
};

// Private imports for the main function
use anyhow::Result;
use application::CliConfig;

pub async fn main() -> Result<()> {
    // Load CLI configuration
    let config = CliConfig::load()?;

    // Execute the command
    execute_command(config).await
}
