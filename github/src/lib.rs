//! Types and a client for the parts of Github's v3 REST API used to report
//! Actions workflow run status.
//! https://docs.github.com/en/rest/actions/workflow-runs

pub mod client;
mod workflow;

pub use client::Client;
pub use workflow::*;
