use chrono::Local;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder used when the forge has no description for a repository
pub const NO_DESCRIPTION: &str = "No description";
/// Placeholder used when the forge reports no primary language
pub const UNKNOWN_LANGUAGE: &str = "unknown";
/// Placeholder for missing timestamps
pub const UNKNOWN_DATE: &str = "unknown";
/// Sentinel returned by the README fetcher whenever no README could be read
pub const NO_README: &str = "No README available";

/// Format of `ReportBundle::analyzed_at`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalized repository metadata
///
/// Every field is populated: values missing upstream are replaced with the
/// placeholders above so report text never interpolates an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    /// Repository name
    pub name: String,
    /// Owner login
    #[serde(default)]
    pub owner: String,
    /// `owner/name`
    pub full_name: String,
    /// Free-text description
    #[serde(default = "default_description")]
    pub description: String,
    /// Canonical web URL
    #[serde(default)]
    pub html_url: String,
    /// Primary language label
    #[serde(default = "default_language")]
    pub language: String,
    /// Stargazer count
    #[serde(default)]
    pub stars: u64,
    /// Fork count
    #[serde(default)]
    pub forks: u64,
    /// Open issue count
    #[serde(default)]
    pub open_issues: u64,
    /// Creation date, `YYYY-MM-DD`
    #[serde(default = "default_date")]
    pub created_at: String,
    /// Last update date, `YYYY-MM-DD`
    #[serde(default = "default_date")]
    pub updated_at: String,
}

fn default_description() -> String {
    NO_DESCRIPTION.to_string()
}

fn default_language() -> String {
    UNKNOWN_LANGUAGE.to_string()
}

fn default_date() -> String {
    UNKNOWN_DATE.to_string()
}

/// The result of one analysis request
///
/// The service keeps no copy. Callers send the whole bundle back to export it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBundle {
    /// Short request identifier
    #[serde(default)]
    pub report_id: String,
    /// Repository metadata the report was built from
    pub repo_info: RepositoryMetadata,
    /// Narrative report text
    #[serde(rename = "ai_analysis")]
    pub narrative: String,
    /// Local time the report was assembled
    pub analyzed_at: String,
    /// Processing time in seconds
    #[serde(default)]
    pub processing_time: f64,
}

impl ReportBundle {
    /// Assembles a bundle stamped with the current local time
    pub fn new(report_id: String, repo_info: RepositoryMetadata, narrative: String, elapsed: Duration) -> Self {
        Self {
            report_id,
            repo_info,
            narrative,
            analyzed_at: now_timestamp(),
            processing_time: round_secs(elapsed),
        }
    }
}

/// Generates a short request identifier: the first 8 hex digits of a v4 UUID
pub fn new_report_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Current local time in `TIMESTAMP_FORMAT`
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn round_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_id_shape() {
        let id = new_report_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_report_id());
    }

    #[test]
    fn test_processing_time_rounded() {
        assert_eq!(round_secs(Duration::from_millis(1234)), 1.23);
        assert_eq!(round_secs(Duration::from_millis(5)), 0.01);
    }

    #[test]
    fn test_bundle_wire_names() -> serde_json::Result<()> {
        let bundle = ReportBundle {
            report_id: "abcd1234".into(),
            repo_info: serde_json::from_str(r#"{"name":"repo","full_name":"owner/repo"}"#)?,
            narrative: "text".into(),
            analyzed_at: "2024-01-01 00:00:00".into(),
            processing_time: 0.5,
        };
        let value = serde_json::to_value(&bundle)?;
        assert_eq!(value["ai_analysis"], "text");
        assert_eq!(value["repo_info"]["language"], UNKNOWN_LANGUAGE);
        assert_eq!(value["repo_info"]["description"], NO_DESCRIPTION);
        assert_eq!(value["repo_info"]["created_at"], UNKNOWN_DATE);
        Ok(())
    }
}
