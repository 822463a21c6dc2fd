use crate::models::ReportBundle;

/// Renders the bundle as a Markdown document
pub fn render_markdown(bundle: &ReportBundle) -> String {
    let repo = &bundle.repo_info;
    format!(
        "# GitHub Repository Analysis Report - {full_name}

## Basic Information

- **Repository**: {full_name}
- **Description**: {description}
- **Primary language**: {language}
- **Stars**: {stars}
- **Forks**: {forks}
- **Open issues**: {issues}
- **Created**: {created}
- **Last updated**: {updated}
- **URL**: {url}
- **Analyzed at**: {analyzed_at}

## Analysis

{narrative}

---

*Analyzed at: {analyzed_at}*
",
        full_name = repo.full_name,
        description = repo.description,
        language = repo.language,
        stars = repo.stars,
        forks = repo.forks,
        issues = repo.open_issues,
        created = repo.created_at,
        updated = repo.updated_at,
        url = repo.html_url,
        analyzed_at = bundle.analyzed_at,
        narrative = bundle.narrative.trim_end(),
    )
}
