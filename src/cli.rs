//! Console rendering for the interactive front end

use crate::config::{ApiKeys, Config};
use crate::models::ReportBundle;
use colored::*;

/// Words that end the interactive loop
pub const QUIT_COMMANDS: &[&str] = &["quit", "q", "exit"];

/// Whether `input` asks to leave the loop
pub fn is_quit(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    QUIT_COMMANDS.contains(&input.as_str())
}

/// Prints the greeting shown when the loop starts
pub fn print_banner(strategy: &str) {
    println!("\n{}", "=== GitHub Repo Analyst ===".bright_green().bold());
    println!("{}", "Paste a repository link to get a narrative report.".bright_blue());
    println!("{} {}", "Narrative strategy:".bright_white().bold(), strategy);
    println!("{}", "=".repeat(50).bright_yellow());
}

/// Prints the metadata fields followed by the narrative
pub fn print_report(bundle: &ReportBundle) {
    let repo = &bundle.repo_info;
    println!("\n{}", format!("Analysis result {}", "=".repeat(34)).bright_green().bold());
    print_field("Repository", &repo.full_name);
    print_field("Description", &repo.description);
    print_field("Language", &repo.language);
    print_field("Stars", &repo.stars.to_string());
    print_field("Forks", &repo.forks.to_string());
    print_field("Open issues", &repo.open_issues.to_string());
    print_field("Created", &repo.created_at);
    print_field("Updated", &repo.updated_at);
    println!("\n{}", "Report:".bright_cyan().bold());
    println!("{}", "-".repeat(30));
    println!("{}", bundle.narrative);
    println!(
        "{}",
        format!(
            "report {} - {} - {:.2}s",
            bundle.report_id, bundle.analyzed_at, bundle.processing_time
        )
        .dimmed()
    );
    println!("{}", "=".repeat(50));
}

fn print_field(label: &str, value: &str) {
    println!("{:>12}: {}", label.bright_white().bold(), value);
}

/// Prints which credentials are configured, masked
pub fn print_env_check(config: &Config) {
    println!("{}", "=== Environment check ===".bright_green().bold());
    println!(
        "GITHUB_TOKEN:   {}",
        ApiKeys::mask(config.api_keys.github_token.as_deref())
    );
    println!(
        "OPENAI_API_KEY: {}",
        ApiKeys::mask(config.api_keys.llm_api_key.as_deref())
    );
    println!("GitHub API:     {}", config.github.api_base);
    println!("LLM endpoint:   {} ({})", config.llm.api_base, config.llm.model);
    println!("Export dir:     {}", config.export_dir.display());
}

/// Prints an informational message
pub fn print_info(message: &str) {
    println!("{}", message.green());
}

/// Prints an error message
pub fn print_error(message: &str) {
    eprintln!("{}", message.red());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_quit() {
        assert!(is_quit("quit"));
        assert!(is_quit("  QUIT \n"));
        assert!(is_quit("q"));
        assert!(!is_quit("https://github.com/owner/repo"));
    }
}
