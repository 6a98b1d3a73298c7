//! The operations the panel's front end invokes by name.

use crate::{
    config::{Config, ConfigStore},
    jira::JiraClient,
    status::{PipelineStatus, RunSource, StatusAggregator},
    Result,
};
use log::info;
use serde::{de, Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr, sync::Arc};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    FetchLabels,
    FetchPipelineStatus,
    GetConfig,
    SetConfig,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::FetchLabels => "fetchLabels",
            Operation::FetchPipelineStatus => "fetchPipelineStatus",
            Operation::GetConfig => "getConfig",
            Operation::SetConfig => "setConfig",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug)]
#[error("unknown operation `{0}`")]
pub struct ParseOperationError(String);

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Operation::*;

        match s {
            "fetchLabels" => Ok(FetchLabels),
            "fetchPipelineStatus" => Ok(FetchPipelineStatus),
            "getConfig" => Ok(GetConfig),
            "setConfig" => Ok(SetConfig),
            _ => Err(ParseOperationError(s.to_owned())),
        }
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let s = <String>::deserialize(deserializer)?;
        Self::from_str(&s).map_err(de::Error::custom)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub issue_key: Option<String>,
}

/// One call from the front end: which operation, on which issue, with what payload.
#[derive(Clone, Debug, Deserialize)]
pub struct Invocation {
    pub function: Operation,
    #[serde(default)]
    pub context: Context,
    #[serde(default)]
    pub payload: Value,
}

impl Invocation {
    fn issue_key(&self) -> Result<&str> {
        match self.context.issue_key.as_deref() {
            Some(key) => Ok(key),
            None => Err(format!("{} requires an issue key", self.function).into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SetConfigPayload {
    config: Config,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct SetConfigResponse {
    pub ok: bool,
}

pub struct Resolver {
    store: Arc<dyn ConfigStore>,
    aggregator: StatusAggregator,
}

impl Resolver {
    pub fn new(store: Arc<dyn ConfigStore>, source: Arc<dyn RunSource>) -> Self {
        Self {
            aggregator: StatusAggregator::new(store.clone(), source),
            store,
        }
    }

    pub async fn invoke(&self, invocation: Invocation) -> Result<Value> {
        info!(
            "invoking {} for {:?}",
            invocation.function, invocation.context.issue_key
        );

        let value = match invocation.function {
            Operation::FetchLabels => {
                serde_json::to_value(self.fetch_labels(invocation.issue_key()?).await?)?
            }
            Operation::FetchPipelineStatus => serde_json::to_value(
                self.fetch_pipeline_status(invocation.issue_key()?).await,
            )?,
            Operation::GetConfig => serde_json::to_value(self.get_config().await?)?,
            Operation::SetConfig => {
                let SetConfigPayload { config } = serde_json::from_value(invocation.payload)?;
                serde_json::to_value(self.set_config(config).await?)?
            }
        };

        Ok(value)
    }

    pub async fn fetch_labels(&self, issue_key: &str) -> Result<Vec<String>> {
        let jira = self
            .store
            .get_config()
            .await?
            .jira
            .ok_or("no Jira configuration")?;

        JiraClient::new(&jira)?.fetch_labels(issue_key).await
    }

    pub async fn fetch_pipeline_status(&self, issue_key: &str) -> PipelineStatus {
        self.aggregator.pipeline_status(issue_key).await
    }

    pub async fn get_config(&self) -> Result<Config> {
        self.store.get_config().await
    }

    pub async fn set_config(&self, config: Config) -> Result<SetConfigResponse> {
        self.store.set_config(config).await?;
        Ok(SetConfigResponse { ok: true })
    }
}
