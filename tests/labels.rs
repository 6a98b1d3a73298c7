mod common;

use common::MockUpstream;
use hyper::StatusCode;
use pipeline_panel::{jira::JiraClient, JiraConfig};

fn client(upstream: &MockUpstream) -> JiraClient {
    JiraClient::new(&JiraConfig {
        base_url: upstream.base_url.clone(),
        email: "dev@example.com".to_owned(),
        api_token: "jira-token".to_owned(),
    })
    .unwrap()
}

#[tokio::test]
async fn fetches_labels() {
    let upstream = MockUpstream::start(
        StatusCode::OK,
        r#"{"id": "10002", "key": "PROJ-7", "fields": {"labels": ["backend", "ci"]}}"#,
    )
    .await;

    let labels = client(&upstream).fetch_labels("PROJ-7").await.unwrap();
    assert_eq!(labels, vec!["backend".to_owned(), "ci".to_owned()]);

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path_and_query, "/rest/api/3/issue/PROJ-7?fields=labels");
    // base64("dev@example.com:jira-token")
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Basic ZGV2QGV4YW1wbGUuY29tOmppcmEtdG9rZW4=")
    );
}

#[tokio::test]
async fn missing_labels_field_is_empty() {
    let upstream = MockUpstream::start(StatusCode::OK, r#"{"key": "PROJ-7", "fields": {}}"#).await;

    let labels = client(&upstream).fetch_labels("PROJ-7").await.unwrap();
    assert!(labels.is_empty());
}

#[tokio::test]
async fn error_status_is_reported() {
    let upstream = MockUpstream::start(
        StatusCode::NOT_FOUND,
        r#"{"errorMessages": ["Issue does not exist or you do not have permission to see it."]}"#,
    )
    .await;

    let err = client(&upstream).fetch_labels("PROJ-404").await.unwrap_err();
    assert_eq!(err.to_string(), "Jira API error: 404");
}
