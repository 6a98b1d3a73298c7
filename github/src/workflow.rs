use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Deserializer};

/// Page of runs returned by the "list workflow runs" endpoints
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorkflowRunList {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub workflow_runs: Vec<WorkflowRun>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<WorkflowRun>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<WorkflowRun>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Execution status of a workflow run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Requested,
    Queued,
    Pending,
    Waiting,
    InProgress,
    Completed,
    #[serde(other)]
    Other,
}

/// Terminal outcome of a finished workflow run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Stale,
    StartupFailure,
    #[serde(other)]
    Other,
}

// Most of what Github sends is ignored, and nearly everything it does send is
// allowed to be missing or null.
#[derive(Clone, Debug, Deserialize)]
pub struct WorkflowRun {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub head_branch: Option<String>,
    pub head_sha: Option<String>,
    pub run_number: Option<u64>,
    pub status: Option<CheckStatus>,
    pub conclusion: Option<Conclusion>,
    pub html_url: Option<String>,
    pub run_started_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub head_commit: Option<HeadCommit>,
}

impl WorkflowRun {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.id, "run_started_at", self.run_started_at.as_deref())
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.id, "updated_at", self.updated_at.as_deref())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct HeadCommit {
    pub id: String,
    #[serde(default)]
    pub message: String,
    pub author: Option<CommitAuthor>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CommitAuthor {
    pub name: Option<String>,
    pub email: Option<String>,
}

fn parse_timestamp(run_id: Option<u64>, field: &str, value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?;
    match DateTime::parse_from_rfc3339(value) {
        Ok(timestamp) => Some(timestamp.with_timezone(&Utc)),
        Err(e) => {
            debug!("run {:?}: ignoring unparseable {} {:?}: {}", run_id, field, value, e);
            None
        }
    }
}
