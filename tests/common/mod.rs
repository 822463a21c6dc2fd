#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mockito::{Mock, Server, ServerGuard};
use repo_analyst::config::Config;
use serde_json::json;

pub mod test_helpers {
    use super::*;

    pub async fn setup_test_server() -> ServerGuard {
        Server::new_async().await
    }

    /// Default config with every outbound client pointed at `server`
    pub fn create_test_config(server: &ServerGuard) -> Config {
        let mut config = Config::default();
        config.github.api_base = server.url();
        config.llm.api_base = server.url();
        config.github.timeout_secs = 5;
        config
    }

    pub fn setup_test_logger() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    pub fn repo_json(owner: &str, repo: &str, stars: u64, forks: u64, issues: u64, language: Option<&str>) -> String {
        json!({
            "name": repo,
            "full_name": format!("{}/{}", owner, repo),
            "owner": { "login": owner },
            "description": "A test repository",
            "html_url": format!("https://github.com/{}/{}", owner, repo),
            "language": language,
            "stargazers_count": stars,
            "forks_count": forks,
            "open_issues_count": issues,
            "created_at": "2019-04-01T12:30:00Z",
            "updated_at": "2024-02-29T08:00:00Z"
        })
        .to_string()
    }

    /// README payload the way GitHub returns it: base64 wrapped at 60 columns
    pub fn readme_json(text: &str) -> String {
        let encoded = STANDARD.encode(text);
        let wrapped = encoded
            .as_bytes()
            .chunks(60)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("\n");
        json!({ "name": "README.md", "encoding": "base64", "content": wrapped }).to_string()
    }

    pub fn chat_completion_json(content: &str) -> String {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1_700_000_000u32,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
        .to_string()
    }

    pub async fn mock_repo(server: &mut ServerGuard, owner: &str, repo: &str, body: String) -> Mock {
        server
            .mock("GET", format!("/repos/{}/{}", owner, repo).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    pub async fn mock_readme(server: &mut ServerGuard, owner: &str, repo: &str, status: usize, body: String) -> Mock {
        server
            .mock("GET", format!("/repos/{}/{}/readme", owner, repo).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }
}
