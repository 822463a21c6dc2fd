use pretty_assertions::assert_eq;
use repo_analyst::error::AnalystError;
use repo_analyst::github::{GitHubClient, RepoRef};
use repo_analyst::models::{NO_DESCRIPTION, NO_README, UNKNOWN_LANGUAGE};
use serde_json::json;

mod common;
use common::test_helpers::*;

fn target() -> RepoRef {
    RepoRef::parse("https://github.com/rust-lang/rust").unwrap()
}

#[tokio::test]
async fn test_metadata_is_normalized() {
    setup_test_logger();
    let mut server = setup_test_server().await;
    let mock = mock_repo(
        &mut server,
        "rust-lang",
        "rust",
        repo_json("rust-lang", "rust", 95_000, 12_000, 9_000, Some("Rust")),
    )
    .await;

    let client = GitHubClient::new(&create_test_config(&server)).unwrap();
    let meta = client.get_repository(&target()).await.unwrap();

    assert_eq!(meta.full_name, "rust-lang/rust");
    assert_eq!(meta.owner, "rust-lang");
    assert_eq!(meta.language, "Rust");
    assert_eq!(meta.stars, 95_000);
    assert_eq!(meta.forks, 12_000);
    assert_eq!(meta.open_issues, 9_000);
    assert_eq!(meta.created_at, "2019-04-01");
    assert_eq!(meta.updated_at, "2024-02-29");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_description_and_language_get_defaults() {
    let mut server = setup_test_server().await;
    let body = json!({
        "name": "rust",
        "full_name": "rust-lang/rust",
        "html_url": "https://github.com/rust-lang/rust",
        "description": null,
        "stargazers_count": 1,
        "forks_count": 0,
        "open_issues_count": 0,
        "created_at": "2010-06-16T20:39:03Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
    .to_string();
    mock_repo(&mut server, "rust-lang", "rust", body).await;

    let client = GitHubClient::new(&create_test_config(&server)).unwrap();
    let meta = client.get_repository(&target()).await.unwrap();

    assert_eq!(meta.description, NO_DESCRIPTION);
    assert_eq!(meta.language, UNKNOWN_LANGUAGE);
}

#[tokio::test]
async fn test_non_200_carries_status_and_body() {
    let mut server = setup_test_server().await;
    server
        .mock("GET", "/repos/invalid/repo")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;

    let client = GitHubClient::new(&create_test_config(&server)).unwrap();
    let result = client.get_repo_info("https://github.com/invalid/repo").await;

    match result {
        Err(AnalystError::UpstreamApi { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("Not Found"));
        }
        other => panic!("expected UpstreamApi, got {:?}", other),
    }
}

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let mut server = setup_test_server().await;
    let mock = server
        .mock("GET", "/repos/rust-lang/rust")
        .match_header("authorization", "Bearer test-token")
        .match_header("accept", "application/vnd.github.v3+json")
        .with_status(200)
        .with_body(repo_json("rust-lang", "rust", 1, 1, 1, None))
        .create_async()
        .await;

    let mut config = create_test_config(&server);
    config.api_keys.github_token = Some("test-token".into());
    let client = GitHubClient::new(&config).unwrap();

    assert!(client.get_repository(&target()).await.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    let server = setup_test_server().await;
    let mut config = create_test_config(&server);
    config.github.api_base = "http://127.0.0.1:1".into();

    let client = GitHubClient::new(&config).unwrap();
    let result = client.get_repository(&target()).await;

    assert!(matches!(result, Err(AnalystError::Network(_))), "{:?}", result);
}

#[tokio::test]
async fn test_silent_upstream_times_out() {
    // Accepts connections through the backlog but never answers.
    let silent = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let server = setup_test_server().await;
    let mut config = create_test_config(&server);
    config.github.api_base = format!("http://{}", silent.local_addr().unwrap());
    config.github.timeout_secs = 1;

    let client = GitHubClient::new(&config).unwrap();
    let result = client.get_repository(&target()).await;

    assert!(matches!(result, Err(AnalystError::UpstreamTimeout)), "{:?}", result);
}

#[tokio::test]
async fn test_readme_is_decoded() {
    let mut server = setup_test_server().await;
    let text = "# Rust\n\nEmpowering everyone to build reliable software. ".repeat(5);
    mock_readme(&mut server, "rust-lang", "rust", 200, readme_json(&text)).await;

    let client = GitHubClient::new(&create_test_config(&server)).unwrap();
    assert_eq!(client.get_readme(&target()).await, text);
}

#[tokio::test]
async fn test_missing_readme_yields_sentinel() {
    let mut server = setup_test_server().await;
    mock_readme(&mut server, "rust-lang", "rust", 404, r#"{"message":"Not Found"}"#.into()).await;

    let client = GitHubClient::new(&create_test_config(&server)).unwrap();
    assert_eq!(client.get_readme(&target()).await, NO_README);
}

#[tokio::test]
async fn test_undecodable_readme_yields_sentinel() {
    let mut server = setup_test_server().await;
    mock_readme(&mut server, "rust-lang", "rust", 200, r#"{"content":"***not base64***"}"#.into()).await;

    let client = GitHubClient::new(&create_test_config(&server)).unwrap();
    assert_eq!(client.get_readme(&target()).await, NO_README);
}
