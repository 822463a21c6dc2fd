use crate::config::Config;
use crate::error::{AnalystError, Result};
use crate::models::RepositoryMetadata;
use crate::prompts::REPOSITORY_ANALYSIS;
use async_openai::config::OpenAIConfig;
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_openai::Client;
use backoff::ExponentialBackoffBuilder;
use log::info;
use std::time::Duration;

/// Narrative generated by an OpenAI-compatible chat-completion model
#[derive(Clone)]
pub struct LlmNarrator {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    top_p: f32,
    excerpt_chars: usize,
}

impl LlmNarrator {
    /// Builds the client; fails when no API key is configured
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_keys
            .llm_api_key
            .as_deref()
            .ok_or_else(|| AnalystError::Config("OPENAI_API_KEY is not set".into()))?;

        let openai = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(config.llm.api_base.trim_end_matches('/'));

        // Failures surface immediately instead of being retried with backoff.
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Ok(Self {
            client: Client::with_config(openai).with_backoff(no_retry),
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            top_p: config.llm.top_p,
            excerpt_chars: config.llm.readme_excerpt_chars,
        })
    }

    /// Sends the fixed prompt and returns the model's answer verbatim
    pub async fn generate(&self, meta: &RepositoryMetadata, readme: &str) -> Result<String> {
        let prompt = build_prompt(meta, readme, self.excerpt_chars);
        info!("Requesting model analysis of {} from {}", meta.full_name, self.model);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into()])
            .temperature(self.temperature)
            .top_p(self.top_p)
            .build()?;

        let response = self.client.chat().create(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AnalystError::AnalysisService("model returned an empty answer".into()))
    }
}

/// Fills the analysis prompt with metadata and the first `excerpt_chars` README characters
pub fn build_prompt(meta: &RepositoryMetadata, readme: &str, excerpt_chars: usize) -> String {
    let excerpt: String = readme.chars().take(excerpt_chars).collect();
    REPOSITORY_ANALYSIS
        .replace("{full_name}", &meta.full_name)
        .replace("{description}", &meta.description)
        .replace("{language}", &meta.language)
        .replace("{stars}", &meta.stars.to_string())
        .replace("{forks}", &meta.forks.to_string())
        .replace("{readme}", &excerpt)
}
