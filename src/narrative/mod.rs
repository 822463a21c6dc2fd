//! Narrative report generation
//!
//! Two strategies share one contract: metadata plus README text in, report
//! text out. The rule-based one is always available; the model-backed one is
//! selected when an LLM API key is configured.

/// Model-backed narrative
pub mod llm;
/// Threshold rules narrative
pub mod rules;

use crate::config::Config;
use crate::error::Result;
use crate::models::RepositoryMetadata;

pub use llm::LlmNarrator;
pub use rules::{Activity, Assessment, Insight, LearningValue, Popularity, Recommendation, RuleNarrator};

/// The available narrative strategies
#[derive(Clone)]
pub enum NarrativeStrategy {
    /// Deterministic threshold rules
    RuleBased(RuleNarrator),
    /// External chat-completion model
    ExternalModel(LlmNarrator),
}

impl NarrativeStrategy {
    /// Picks the model-backed strategy when an API key is present
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.llm_enabled() {
            Ok(Self::ExternalModel(LlmNarrator::new(config)?))
        } else {
            Ok(Self::RuleBased(RuleNarrator::new(config.thresholds.clone())))
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::RuleBased(_) => "rule-based",
            Self::ExternalModel(_) => "external-model",
        }
    }

    /// Produces the narrative for one repository
    pub async fn generate(&self, meta: &RepositoryMetadata, readme: &str) -> Result<String> {
        match self {
            Self::RuleBased(narrator) => Ok(narrator.generate(meta, readme)),
            Self::ExternalModel(narrator) => narrator.generate(meta, readme).await,
        }
    }
}
