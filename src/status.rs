//! Normalizes the latest workflow runs of the configured branch into the
//! status shown by the panel.
//!
//! Every failure on the way (configuration, transport, upstream errors,
//! malformed payloads) is reported as a [`FailureStatus`] value rather than an
//! error, so callers always have something to render.

use crate::{
    config::{ConfigStore, GithubConfig},
    Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use github::{CheckStatus, Conclusion, HeadCommit, WorkflowRun};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;

/// How many of the most recent runs are requested and reported.
pub const RECENT_RUNS: usize = 3;

pub const NO_RUNS_MESSAGE: &str = "No workflow run found for this branch";

const SHORT_SHA_LEN: usize = 7;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Failed,
    Running,
    Unknown,
}

impl Status {
    /// The conclusion of a run wins over its execution status.
    pub fn of(run: &WorkflowRun) -> Self {
        match (run.conclusion, run.status) {
            (Some(Conclusion::Success), _) => Status::Success,
            (Some(Conclusion::Failure), _) => Status::Failed,
            (_, Some(CheckStatus::InProgress)) => Status::Running,
            _ => Status::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommitSummary {
    pub sha: String,
    pub message: String,
    pub author: Option<String>,
    pub url: String,
}

impl CommitSummary {
    fn new(commit: &HeadCommit, config: &GithubConfig) -> Self {
        Self {
            sha: commit.id.chars().take(SHORT_SHA_LEN).collect(),
            message: commit.message.lines().next().unwrap_or_default().to_owned(),
            author: commit.author.as_ref().and_then(|a| a.name.clone()),
            url: config.commit_url(&commit.id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub id: Option<u64>,
    pub status: Status,
    pub workflow_name: Option<String>,
    pub last_run: Option<String>,
    pub duration: Option<String>,
    pub url: Option<String>,
    pub commit: Option<CommitSummary>,
    pub error: Option<String>,
}

impl RunSummary {
    pub fn new(run: &WorkflowRun, config: &GithubConfig) -> Self {
        let started_at = run.started_at();
        let duration = started_at
            .zip(run.last_updated_at())
            .map(|(start, end)| format_duration(start, end));

        Self {
            id: run.id,
            status: Status::of(run),
            workflow_name: run.name.clone(),
            last_run: started_at.map(format_local),
            duration,
            url: run.html_url.clone(),
            commit: run
                .head_commit
                .as_ref()
                .map(|commit| CommitSummary::new(commit, config)),
            error: None,
        }
    }
}

// Halves round toward positive infinity, so a -2.5s clock skew reads "-2s".
fn format_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let millis = (end - start).num_milliseconds();
    format!("{}s", (millis as f64 / 1000.0 + 0.5).floor() as i64)
}

fn format_local(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

/// Status built from at least one run. `latest` is serialized flattened into
/// the top level and is always equal to `recent_runs[0]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunsStatus {
    #[serde(flatten)]
    pub latest: RunSummary,
    pub branch: String,
    pub recent_runs: Vec<RunSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureStatus {
    pub status: Status,
    /// `None` only when the configuration could not be read
    pub branch: Option<String>,
    pub last_run: Option<String>,
    pub environment: Option<String>,
    pub error: String,
}

impl FailureStatus {
    pub fn new<S: Into<String>>(branch: Option<String>, error: S) -> Self {
        Self {
            status: Status::Unknown,
            branch,
            last_run: None,
            environment: None,
            error: error.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PipelineStatus {
    Runs(RunsStatus),
    Failure(FailureStatus),
}

impl PipelineStatus {
    /// Summarize the runs of `config`'s branch, newest first as Github orders them.
    pub fn from_runs(config: &GithubConfig, runs: &[WorkflowRun]) -> Self {
        let recent_runs: Vec<RunSummary> = runs
            .iter()
            .take(RECENT_RUNS)
            .map(|run| RunSummary::new(run, config))
            .collect();

        match recent_runs.first() {
            Some(latest) => PipelineStatus::Runs(RunsStatus {
                latest: latest.clone(),
                branch: config.branch.clone(),
                recent_runs,
            }),
            None => FailureStatus::new(Some(config.branch.clone()), NO_RUNS_MESSAGE).into(),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            PipelineStatus::Runs(runs) => runs.latest.status,
            PipelineStatus::Failure(failure) => failure.status,
        }
    }

    pub fn branch(&self) -> Option<&str> {
        match self {
            PipelineStatus::Runs(runs) => Some(&runs.branch),
            PipelineStatus::Failure(failure) => failure.branch.as_deref(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PipelineStatus::Runs(_) => None,
            PipelineStatus::Failure(failure) => Some(&failure.error),
        }
    }

    pub fn recent_runs(&self) -> &[RunSummary] {
        match self {
            PipelineStatus::Runs(runs) => &runs.recent_runs,
            PipelineStatus::Failure(_) => &[],
        }
    }
}

impl From<FailureStatus> for PipelineStatus {
    fn from(failure: FailureStatus) -> Self {
        PipelineStatus::Failure(failure)
    }
}

/// Where workflow runs come from.
#[async_trait]
pub trait RunSource: Send + Sync {
    /// The `limit` most recent runs of the configured branch, newest first.
    async fn latest_runs(&self, config: &GithubConfig, limit: usize) -> Result<Vec<WorkflowRun>>;
}

/// Reads runs from the Github Actions API using the credential in the
/// configuration current at call time.
#[derive(Clone, Copy, Debug, Default)]
pub struct GithubRunSource;

#[async_trait]
impl RunSource for GithubRunSource {
    async fn latest_runs(&self, config: &GithubConfig, limit: usize) -> Result<Vec<WorkflowRun>> {
        let client = github::Client::builder()
            .base_url(config.api_url.as_str())
            .user_agent(USER_AGENT)
            .github_api_token(config.token.as_str())
            .build()?;

        let list = client
            .actions()
            .list_workflow_runs_for_branch(&config.owner, &config.repo, &config.branch, limit)
            .await?;

        if list.workflow_runs.is_empty() {
            debug!(
                "{}/{}: no workflow runs listed for branch {}",
                config.owner, config.repo, config.branch
            );
        }

        Ok(list.workflow_runs)
    }
}

pub struct StatusAggregator {
    store: Arc<dyn ConfigStore>,
    source: Arc<dyn RunSource>,
}

impl StatusAggregator {
    pub fn new(store: Arc<dyn ConfigStore>, source: Arc<dyn RunSource>) -> Self {
        Self { store, source }
    }

    /// Latest pipeline status for the branch associated with `issue_key`.
    ///
    /// The branch is currently the configured one for every issue.
    pub async fn pipeline_status(&self, issue_key: &str) -> PipelineStatus {
        let config = match self.store.get_config().await {
            Ok(config) => config.github,
            Err(e) => {
                warn!("{}: unable to read configuration: {}", issue_key, e);
                return FailureStatus::new(None, e.to_string()).into();
            }
        };

        info!(
            "{}: fetching workflow runs for {}/{}@{}",
            issue_key, config.owner, config.repo, config.branch
        );

        match self.source.latest_runs(&config, RECENT_RUNS).await {
            Ok(runs) => PipelineStatus::from_runs(&config, &runs),
            Err(e) => {
                warn!("{}: fetching workflow runs failed: {}", issue_key, e);
                FailureStatus::new(Some(config.branch), e.to_string()).into()
            }
        }
    }
}
