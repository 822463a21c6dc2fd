/// Prompt sent to the external model. Placeholders are `{name}` tokens
/// substituted by `narrative::llm::build_prompt`.
pub const REPOSITORY_ANALYSIS: &str = r#"
Act as a senior software engineer and analyze this GitHub repository:

Repository: {full_name}
Description: {description}
Primary language: {language}
Stars: {stars}
Forks: {forks}
README excerpt: {readme}

Please answer the following questions:
1. What does this project do? (one sentence)
2. What technology stack does it likely use?
3. Judging by the numbers, is this project popular?
4. Is this project worth studying for a beginner?

Answer in plain, approachable language and avoid heavy jargon.
"#;
