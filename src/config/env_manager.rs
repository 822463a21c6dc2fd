use std::fmt;

/// Credentials for the forge and the optional text-generation service
///
/// Both are optional. Without a GitHub token requests go out anonymously and
/// are subject to the lower unauthenticated rate limit; without an LLM key the
/// model-backed narrative strategy is disabled.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKeys {
    /// GitHub API token for authenticated requests
    pub github_token: Option<String>,
    /// API key for the OpenAI-compatible chat-completion endpoint
    pub llm_api_key: Option<String>,
}

impl ApiKeys {
    /// Reads the keys from `GITHUB_TOKEN` and `OPENAI_API_KEY`
    pub fn from_env() -> Self {
        Self {
            github_token: get_env_value("GITHUB_TOKEN"),
            llm_api_key: get_env_value("OPENAI_API_KEY"),
        }
    }

    /// Short, display-safe description of a secret
    pub fn mask(secret: Option<&str>) -> String {
        match secret {
            None => "not set".to_string(),
            Some(value) => {
                let prefix: String = value.chars().take(4).collect();
                format!("set ({} chars, {}...)", value.chars().count(), prefix)
            }
        }
    }
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeys")
            .field("github_token", &self.github_token.as_ref().map(|_| "***"))
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Returns the variable's value, treating empty strings as unset
pub fn get_env_value(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
