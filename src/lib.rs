mod config;
mod error;
pub mod jira;
pub mod resolver;
mod server;
pub mod status;

pub use config::{Config, ConfigStore, FileConfigStore, GithubConfig, JiraConfig, MemoryConfigStore};
pub use error::{Error, Result};
pub use resolver::Resolver;
pub use server::Server;
pub use status::{GithubRunSource, PipelineStatus, StatusAggregator};
