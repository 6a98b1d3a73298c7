use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

const DEFAULT_BRANCH: &str = "main";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com/";
const DEFAULT_GITHUB_WEB_URL: &str = "https://github.com";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub github: GithubConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira: Option<JiraConfig>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

/// The repository and branch whose workflow runs are reported, and the
/// credential used to read them.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GithubConfig {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    pub token: String,
    /// REST API endpoint, override for GitHub Enterprise
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Where commit pages are linked to
    #[serde(default = "default_web_url")]
    pub web_url: String,
}

impl GithubConfig {
    pub fn commit_url(&self, commit_id: &str) -> String {
        format!(
            "{}/{}/{}/commit/{}",
            self.web_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            commit_id
        )
    }
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_owned()
}

fn default_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_owned()
}

fn default_web_url() -> String {
    DEFAULT_GITHUB_WEB_URL.to_owned()
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct JiraConfig {
    /// e.g. `https://your-domain.atlassian.net/`
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

/// Owner of the panel's configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get_config(&self) -> Result<Config>;
    async fn set_config(&self, config: Config) -> Result<()>;
}

/// Keeps the configuration for the lifetime of the process only.
#[derive(Debug)]
pub struct MemoryConfigStore {
    config: RwLock<Config>,
}

impl MemoryConfigStore {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get_config(&self) -> Result<Config> {
        let config = self
            .config
            .read()
            .map_err(|_| "configuration lock poisoned")?;
        Ok(config.clone())
    }

    async fn set_config(&self, config: Config) -> Result<()> {
        let mut current = self
            .config
            .write()
            .map_err(|_| "configuration lock poisoned")?;
        *current = config;
        Ok(())
    }
}

/// Reads the TOML file on every access and rewrites it on update.
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get_config(&self) -> Result<Config> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        Config::from_toml(&contents)
    }

    async fn set_config(&self, config: Config) -> Result<()> {
        let contents = config.to_toml()?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}
