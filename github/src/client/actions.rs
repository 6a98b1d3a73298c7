use crate::{
    client::{Client, PaginationOptions, Result},
    WorkflowRunList,
};
use reqwest::RequestBuilder;
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
pub struct ListWorkflowRunsOptions<'a> {
    /// Returns workflow runs associated with a branch. Use the name of the branch of the `push`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<&'a str>,

    #[serde(flatten)]
    pub pagination_options: PaginationOptions,
}

/// `ActionsClient` handles communication with the Actions related methods of the GitHub API.
///
/// GitHub API docs: https://docs.github.com/en/rest/actions
pub struct ActionsClient<'a> {
    inner: &'a Client,
}

impl<'a> ActionsClient<'a> {
    pub(super) fn new(client: &'a Client) -> Self {
        Self { inner: client }
    }

    fn list_workflow_runs_request(
        &self,
        owner: &str,
        repo: &str,
        options: &ListWorkflowRunsOptions<'_>,
    ) -> RequestBuilder {
        let url = format!("repos/{}/{}/actions/runs", owner, repo);
        self.inner.get(&url).query(options)
    }

    /// List workflow runs for a repository, newest first.
    ///
    /// GitHub API docs: https://docs.github.com/en/rest/actions/workflow-runs#list-workflow-runs-for-a-repository
    pub async fn list_workflow_runs(
        &self,
        owner: &str,
        repo: &str,
        options: &ListWorkflowRunsOptions<'_>,
    ) -> Result<WorkflowRunList> {
        let response = self
            .list_workflow_runs_request(owner, repo, options)
            .send()
            .await?;

        self.inner.json(response).await
    }

    /// List the `limit` most recent workflow runs of a single branch.
    pub async fn list_workflow_runs_for_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        limit: usize,
    ) -> Result<WorkflowRunList> {
        let options = ListWorkflowRunsOptions {
            branch: Some(branch),
            pagination_options: PaginationOptions {
                per_page: Some(limit),
            },
        };

        self.list_workflow_runs(owner, repo, &options).await
    }
}

#[cfg(test)]
mod test {
    use super::ListWorkflowRunsOptions;
    use crate::client::{Client, PaginationOptions};

    #[test]
    fn branch_runs_request() {
        let client = Client::builder()
            .base_url("https://github.example.com/api/v3/")
            .github_api_token("s3cr3t")
            .build()
            .unwrap();
        let options = ListWorkflowRunsOptions {
            branch: Some("feature/login"),
            pagination_options: PaginationOptions { per_page: Some(3) },
        };

        let request = client
            .actions()
            .list_workflow_runs_request("octo", "widgets", &options)
            .build()
            .unwrap();

        assert_eq!(
            request.url().path(),
            "/api/v3/repos/octo/widgets/actions/runs"
        );
        let query: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert_eq!(
            query,
            vec![
                ("branch".to_owned(), "feature/login".to_owned()),
                ("per_page".to_owned(), "3".to_owned()),
            ]
        );
    }

    #[test]
    fn unset_options_are_omitted() {
        let client = Client::builder().build().unwrap();
        let request = client
            .actions()
            .list_workflow_runs_request("octo", "widgets", &ListWorkflowRunsOptions::default())
            .build()
            .unwrap();

        assert_eq!(request.url().query(), None);
    }
}
