use crate::config::Config;
use crate::error::{AnalystError, Result};
use crate::github::{GitHubClient, RepoRef};
use crate::models::{new_report_id, ReportBundle, RepositoryMetadata};
use crate::narrative::{NarrativeStrategy, RuleNarrator};
use log::{debug, info, warn};
use std::fmt;
use std::time::Instant;

/// Stages a single analysis request moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// URL accepted for processing
    Received,
    /// URL passed validation
    Validated,
    /// URL failed validation; no network call made
    Rejected,
    /// Repository metadata retrieved
    MetadataFetched,
    /// README retrieved or replaced by the sentinel
    ReadmeFetched,
    /// Narrative text produced
    NarrativeGenerated,
    /// Bundle assembled and returned
    Responded,
    /// Aborted after validation
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Rejected => "rejected",
            Self::MetadataFetched => "metadata_fetched",
            Self::ReadmeFetched => "readme_fetched",
            Self::NarrativeGenerated => "narrative_generated",
            Self::Responded => "responded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Checks that `url` looks like a repository URL on the configured forge
///
/// Runs before any network call.
pub fn validate_repo_url(url: &str, web_prefix: &str) -> Result<RepoRef> {
    let trimmed = url.trim();
    if trimmed.is_empty()
        || !trimmed.starts_with(web_prefix)
        || trimmed.trim_end_matches('/').matches('/').count() < 4
    {
        return Err(AnalystError::MalformedUrl(trimmed.to_string()));
    }
    RepoRef::parse(trimmed)
}

/// Runs one analysis end to end: validate, fetch, narrate, assemble
///
/// Built per request from the shared configuration; holds no state between
/// requests.
pub struct RepoAnalyzer {
    github: GitHubClient,
    narrative: NarrativeStrategy,
    fallback: Option<RuleNarrator>,
    web_prefix: String,
}

impl RepoAnalyzer {
    /// Creates the fetcher and the narrative strategy chosen by `config`
    pub fn new(config: &Config) -> Result<Self> {
        let fallback = config
            .llm
            .fallback_to_rules
            .then(|| RuleNarrator::new(config.thresholds.clone()));

        Ok(Self {
            github: GitHubClient::new(config)?,
            narrative: NarrativeStrategy::from_config(config)?,
            fallback,
            web_prefix: config.github.web_prefix.clone(),
        })
    }

    /// Name of the active narrative strategy
    pub fn strategy(&self) -> &'static str {
        self.narrative.name()
    }

    /// Analyzes the repository behind `repo_url`
    pub async fn analyze(&self, repo_url: &str) -> Result<ReportBundle> {
        let started = Instant::now();
        let report_id = new_report_id();
        trace_stage(&report_id, Stage::Received);

        let target = match validate_repo_url(repo_url, &self.web_prefix) {
            Ok(target) => target,
            Err(e) => {
                trace_stage(&report_id, Stage::Rejected);
                return Err(e);
            }
        };
        trace_stage(&report_id, Stage::Validated);
        info!("[{}] Analyzing {}", report_id, target.full_name());

        match self.run(&report_id, &target).await {
            Ok((metadata, narrative)) => {
                let bundle = ReportBundle::new(report_id, metadata, narrative, started.elapsed());
                trace_stage(&bundle.report_id, Stage::Responded);
                info!(
                    "[{}] Finished {} in {:.2}s",
                    bundle.report_id, bundle.repo_info.full_name, bundle.processing_time
                );
                Ok(bundle)
            }
            Err(e) => {
                trace_stage(&report_id, Stage::Failed);
                warn!("[{}] Analysis of {} failed: {}", report_id, target.full_name(), e);
                Err(e)
            }
        }
    }

    async fn run(&self, report_id: &str, target: &RepoRef) -> Result<(RepositoryMetadata, String)> {
        let metadata = self.github.get_repository(target).await?;
        trace_stage(report_id, Stage::MetadataFetched);

        let readme = self.github.get_readme(target).await;
        trace_stage(report_id, Stage::ReadmeFetched);

        let narrative = self.narrate(report_id, &metadata, &readme).await?;
        trace_stage(report_id, Stage::NarrativeGenerated);

        Ok((metadata, narrative))
    }

    async fn narrate(&self, report_id: &str, metadata: &RepositoryMetadata, readme: &str) -> Result<String> {
        match self.narrative.generate(metadata, readme).await {
            Ok(text) => Ok(text),
            Err(AnalystError::AnalysisService(reason)) => match &self.fallback {
                Some(rules) => {
                    warn!(
                        "[{}] {} narrative failed ({}), falling back to rule-based",
                        report_id,
                        self.narrative.name(),
                        reason
                    );
                    Ok(rules.generate(metadata, readme))
                }
                None => Err(AnalystError::AnalysisService(reason)),
            },
            Err(e) => Err(e),
        }
    }
}

fn trace_stage(report_id: &str, stage: Stage) {
    debug!("[{}] stage={}", report_id, stage);
}
