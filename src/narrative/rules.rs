//! Deterministic narrative built from threshold rules
//!
//! Nothing here performs I/O. The same metadata and README always produce the
//! same assessment; only the footer timestamp changes between runs.

use crate::config::NarrativeThresholds;
use crate::models::{now_timestamp, RepositoryMetadata, NO_README};
use std::fmt;

/// How widely starred a repository is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popularity {
    /// Above `popularity_extreme` stars
    ExtremelyHigh,
    /// Above `popularity_very_high` stars
    VeryHigh,
    /// Above `popularity_moderate` stars
    Moderate,
    /// Anything smaller
    Ordinary,
}

/// How much the community forks a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Above `activity_very_active` forks
    VeryActive,
    /// Above `activity_active` forks
    Active,
    /// Above `activity_moderate` forks
    Moderate,
    /// Few forks
    Low,
}

/// How worthwhile a repository is as study material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningValue {
    /// Many stars and many forks
    ExtremelyHigh,
    /// Many stars
    VeryHigh,
    /// Some stars
    Moderate,
    /// Beginner material
    Basic,
}

/// Observations derived from the counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insight {
    /// Stars far outnumber forks
    FewContributors,
    /// Open issues above `issue_backlog`
    IssueBacklog,
    /// Open issues under control
    WellMaintained,
}

/// Suggestions on how to use the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    /// Flagship project worth reading end to end
    StudyArchitecture,
    /// Written in a front-end language
    LearnFrontend,
    /// Enough forks to suggest an active contributor base
    Contribute,
}

impl Popularity {
    /// Text used in the report
    pub fn label(self) -> &'static str {
        match self {
            Self::ExtremelyHigh => "extremely high",
            Self::VeryHigh => "very high",
            Self::Moderate => "moderate",
            Self::Ordinary => "ordinary",
        }
    }
}

impl Activity {
    /// Text used in the report
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryActive => "very active",
            Self::Active => "active",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }
}

impl LearningValue {
    /// Text used in the report
    pub fn label(self) -> &'static str {
        match self {
            Self::ExtremelyHigh => "extremely high value",
            Self::VeryHigh => "very high value",
            Self::Moderate => "moderate value",
            Self::Basic => "basic value",
        }
    }

    fn detail(self) -> &'static str {
        match self {
            Self::ExtremelyHigh => "a widely known project; studying it teaches established best practice and current techniques",
            Self::VeryHigh => "a strong open-source project whose code quality and architecture are worth learning from",
            Self::Moderate => "useful for seeing how a specific technique is implemented",
            Self::Basic => "suitable for beginners getting to know how a project is laid out",
        }
    }
}

impl Insight {
    /// Bullet text
    pub fn text(self) -> &'static str {
        match self {
            Self::FewContributors => "attracts attention but draws comparatively few contributors",
            Self::IssueBacklog => "many unresolved issues, possibly under-maintained",
            Self::WellMaintained => "well maintained, issues handled promptly",
        }
    }
}

impl Recommendation {
    /// Bullet text
    pub fn text(self) -> &'static str {
        match self {
            Self::StudyArchitecture => "suitable for studying architecture and conventions",
            Self::LearnFrontend => "good for learning modern front-end practice",
            Self::Contribute => "consider contributing, many collaboration opportunities",
        }
    }
}

macro_rules! display_via {
    ($ty:ty, $method:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.$method())
            }
        }
    };
}

display_via!(Popularity, label);
display_via!(Activity, label);
display_via!(LearningValue, label);
display_via!(Insight, text);
display_via!(Recommendation, text);

/// Full classification of one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    /// Star-based tier
    pub popularity: Popularity,
    /// Fork-based tier
    pub activity: Activity,
    /// Study value tier
    pub learning_value: LearningValue,
    /// Observations in report order
    pub insights: Vec<Insight>,
    /// Suggestions in report order, possibly empty
    pub recommendations: Vec<Recommendation>,
}

/// Rule-based narrative generator
#[derive(Debug, Clone, Default)]
pub struct RuleNarrator {
    thresholds: NarrativeThresholds,
}

impl RuleNarrator {
    /// Creates a narrator using `thresholds`
    pub fn new(thresholds: NarrativeThresholds) -> Self {
        Self { thresholds }
    }

    /// Classifies the repository against the configured thresholds
    pub fn assess(&self, meta: &RepositoryMetadata) -> Assessment {
        let t = &self.thresholds;
        let (stars, forks) = (meta.stars, meta.forks);

        let popularity = if stars > t.popularity_extreme {
            Popularity::ExtremelyHigh
        } else if stars > t.popularity_very_high {
            Popularity::VeryHigh
        } else if stars > t.popularity_moderate {
            Popularity::Moderate
        } else {
            Popularity::Ordinary
        };

        let activity = if forks > t.activity_very_active {
            Activity::VeryActive
        } else if forks > t.activity_active {
            Activity::Active
        } else if forks > t.activity_moderate {
            Activity::Moderate
        } else {
            Activity::Low
        };

        let learning_value = if stars > t.learning_extreme_stars && forks > t.learning_extreme_forks {
            LearningValue::ExtremelyHigh
        } else if stars > t.learning_very_high_stars {
            LearningValue::VeryHigh
        } else if stars > t.learning_moderate_stars {
            LearningValue::Moderate
        } else {
            LearningValue::Basic
        };

        let mut insights = Vec::new();
        if stars > forks.saturating_mul(t.star_fork_ratio) {
            insights.push(Insight::FewContributors);
        }
        if meta.open_issues > t.issue_backlog {
            insights.push(Insight::IssueBacklog);
        } else {
            insights.push(Insight::WellMaintained);
        }

        let mut recommendations = Vec::new();
        if stars > t.flagship_stars {
            recommendations.push(Recommendation::StudyArchitecture);
        }
        if t.frontend_languages.iter().any(|lang| lang == &meta.language) {
            recommendations.push(Recommendation::LearnFrontend);
        }
        if forks > t.collaboration_forks {
            recommendations.push(Recommendation::Contribute);
        }

        Assessment {
            popularity,
            activity,
            learning_value,
            insights,
            recommendations,
        }
    }

    /// Renders the report, stamped with the current time
    pub fn generate(&self, meta: &RepositoryMetadata, readme: &str) -> String {
        self.render(meta, readme, &now_timestamp())
    }

    /// Renders the Markdown report with an explicit footer timestamp
    pub fn render(&self, meta: &RepositoryMetadata, readme: &str, generated_at: &str) -> String {
        let assessment = self.assess(meta);
        let domain = language_domain(&meta.language);

        let insights = bullet_list(assessment.insights.iter().map(|i| i.text()));
        let recommendations = if assessment.recommendations.is_empty() {
            "- No specific recommendations; browse the code at your own pace".to_string()
        } else {
            bullet_list(assessment.recommendations.iter().map(|r| r.text()))
        };

        format!(
            "# {full_name} Analysis Report

## Overview
{description}

An open-source project written primarily in **{language}**, with **{stars}** stars and **{forks}** forks on GitHub.

## Assessment
- **Popularity**: {popularity}
- **Community activity**: {activity}
- **Open issues**: {issues}

## Tech Stack
- **Primary language**: {language} - {domain}
- **Typical domains**: {domain}
- **README**: {readme_status}

## Learning Value
**{learning}** - {learning_detail}

## Insights
{insights}

## Recommendations
{recommendations}

## Repository Details
- **Created**: {created}
- **Last updated**: {updated}
- **URL**: {url}

---
*Generated by rule-based analysis at {generated_at}*
",
            full_name = meta.full_name,
            description = meta.description,
            language = meta.language,
            stars = group_thousands(meta.stars),
            forks = group_thousands(meta.forks),
            popularity = assessment.popularity,
            activity = assessment.activity,
            issues = meta.open_issues,
            domain = domain,
            readme_status = readme_status(readme),
            learning = assessment.learning_value,
            learning_detail = assessment.learning_value.detail(),
            insights = insights,
            recommendations = recommendations,
            created = meta.created_at,
            updated = meta.updated_at,
            url = meta.html_url,
            generated_at = generated_at,
        )
    }
}

/// Typical application domain of a primary language
pub fn language_domain(language: &str) -> &'static str {
    match language {
        "JavaScript" => "front-end development and web applications",
        "Python" => "data analysis, machine learning and web back ends",
        "Java" => "enterprise applications and Android development",
        "TypeScript" => "large front-end projects and type-safe JavaScript",
        "Go" => "high-performance back ends and microservices",
        "Rust" => "systems programming and high-performance applications",
        "C++" => "game development and systems software",
        "PHP" => "web development and content management systems",
        _ => "general-purpose software development",
    }
}

fn readme_status(readme: &str) -> String {
    if readme == NO_README || readme.trim().is_empty() {
        "not available".to_string()
    } else {
        format!("available ({} characters)", group_thousands(readme.chars().count() as u64))
    }
}

fn bullet_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.map(|item| format!("- {}", item)).collect::<Vec<_>>().join("\n")
}

/// `12345` -> `12,345`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NO_DESCRIPTION, UNKNOWN_LANGUAGE};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn meta(stars: u64, forks: u64, issues: u64, language: &str) -> RepositoryMetadata {
        RepositoryMetadata {
            name: "repo".into(),
            owner: "owner".into(),
            full_name: "owner/repo".into(),
            description: NO_DESCRIPTION.into(),
            html_url: "https://github.com/owner/repo".into(),
            language: language.into(),
            stars,
            forks,
            open_issues: issues,
            created_at: "2020-01-01".into(),
            updated_at: "2024-06-30".into(),
        }
    }

    fn narrator() -> RuleNarrator {
        RuleNarrator::new(NarrativeThresholds::default())
    }

    #[test_case(15_000, Popularity::ExtremelyHigh ; "above ten thousand")]
    #[test_case(10_000, Popularity::VeryHigh ; "exactly ten thousand")]
    #[test_case(1_001, Popularity::VeryHigh ; "above one thousand")]
    #[test_case(101, Popularity::Moderate ; "above one hundred")]
    #[test_case(50, Popularity::Ordinary ; "small")]
    fn test_popularity(stars: u64, expected: Popularity) {
        assert_eq!(narrator().assess(&meta(stars, 0, 0, "Go")).popularity, expected);
    }

    #[test_case(800, Activity::VeryActive ; "above five hundred")]
    #[test_case(500, Activity::Active ; "exactly five hundred")]
    #[test_case(11, Activity::Moderate ; "above ten")]
    #[test_case(2, Activity::Low ; "few forks")]
    fn test_activity(forks: u64, expected: Activity) {
        assert_eq!(narrator().assess(&meta(0, forks, 0, "Go")).activity, expected);
    }

    #[test_case(6_000, 1_200, LearningValue::ExtremelyHigh ; "stars and forks")]
    #[test_case(6_000, 900, LearningValue::VeryHigh ; "stars without forks")]
    #[test_case(12_000, 600, LearningValue::VeryHigh ; "popular but few forks")]
    #[test_case(500, 1_200, LearningValue::Moderate ; "forks without stars")]
    #[test_case(50, 2, LearningValue::Basic ; "small project")]
    fn test_learning_value(stars: u64, forks: u64, expected: LearningValue) {
        assert_eq!(narrator().assess(&meta(stars, forks, 0, "Go")).learning_value, expected);
    }

    #[test]
    fn test_spot_values() {
        let big = narrator().assess(&meta(15_000, 800, 0, "Go"));
        assert_eq!(big.popularity.label(), "extremely high");
        assert_eq!(big.activity.label(), "very active");

        let small = narrator().assess(&meta(50, 2, 0, "Go"));
        assert_eq!(small.popularity.label(), "ordinary");
        assert_eq!(small.learning_value.label(), "basic value");
    }

    #[test]
    fn test_few_contributors_insight() {
        let watched = narrator().assess(&meta(1_000, 50, 0, "Go"));
        assert!(watched.insights.contains(&Insight::FewContributors));

        let forked = narrator().assess(&meta(1_000, 200, 0, "Go"));
        assert!(!forked.insights.contains(&Insight::FewContributors));
    }

    #[test]
    fn test_maintenance_insight() {
        let backlog = narrator().assess(&meta(10, 10, 101, "Go"));
        assert_eq!(backlog.insights, vec![Insight::IssueBacklog]);

        let tidy = narrator().assess(&meta(10, 10, 100, "Go"));
        assert_eq!(tidy.insights, vec![Insight::WellMaintained]);
    }

    #[test]
    fn test_recommendations() {
        let all = narrator().assess(&meta(20_000, 600, 0, "TypeScript"));
        assert_eq!(
            all.recommendations,
            vec![
                Recommendation::StudyArchitecture,
                Recommendation::LearnFrontend,
                Recommendation::Contribute
            ]
        );
        assert!(narrator().assess(&meta(5, 1, 0, "Go")).recommendations.is_empty());
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let strict = RuleNarrator::new(NarrativeThresholds {
            popularity_extreme: 100_000,
            ..NarrativeThresholds::default()
        });
        assert_eq!(strict.assess(&meta(15_000, 0, 0, "Go")).popularity, Popularity::VeryHigh);
    }

    #[test]
    fn test_render_is_deterministic() {
        let m = meta(12_345, 678, 3, "Rust");
        let a = narrator().render(&m, "# readme", "2024-01-01 00:00:00");
        let b = narrator().render(&m, "# readme", "2024-01-01 00:00:00");
        assert_eq!(a, b);
        assert!(a.contains("**12,345** stars"));
        assert!(a.contains("systems programming"));
        assert!(a.contains("available (8 characters)"));
        assert!(a.ends_with("*Generated by rule-based analysis at 2024-01-01 00:00:00*\n"));
    }

    #[test]
    fn test_render_tolerates_placeholders() {
        let report = narrator().render(&meta(0, 0, 0, UNKNOWN_LANGUAGE), "", "now");
        assert!(report.contains(NO_DESCRIPTION));
        assert!(report.contains("general-purpose software development"));
        assert!(report.contains("**README**: not available"));
        assert!(report.contains("No specific recommendations"));

        let sentinel = narrator().render(&meta(0, 0, 0, "Go"), NO_README, "now");
        assert!(sentinel.contains("**README**: not available"));
    }

    #[test_case(0, "0")]
    #[test_case(999, "999")]
    #[test_case(1_000, "1,000")]
    #[test_case(1_234_567, "1,234,567")]
    fn test_group_thousands(n: u64, expected: &str) {
        assert_eq!(group_thousands(n), expected);
    }
}
