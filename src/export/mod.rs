//! Report export to downloadable documents

mod markdown;
mod pdf;

use crate::error::{AnalystError, Result};
use crate::models::ReportBundle;
use log::info;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use markdown::render_markdown;
pub use pdf::render_pdf;

/// Document formats a report can be exported to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Paged A4 document
    Pdf,
    /// Markdown text document
    Markdown,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Markdown => "md",
        }
    }

    /// MIME type of the generated document
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Markdown => "text/markdown; charset=utf-8",
        }
    }

    fn render(self, bundle: &ReportBundle) -> Result<Vec<u8>> {
        match self {
            Self::Pdf => render_pdf(bundle),
            Self::Markdown => Ok(render_markdown(bundle).into_bytes()),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AnalystError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(AnalystError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => f.write_str("pdf"),
            Self::Markdown => f.write_str("markdown"),
        }
    }
}

/// A document written to disk by `export_report`
#[derive(Debug, Clone)]
pub struct ExportedReport {
    /// Where the artifact was written
    pub path: PathBuf,
    /// Suggested attachment name, `github_report_<name>.<ext>`
    pub download_name: String,
    /// Format of the artifact
    pub format: ExportFormat,
}

/// Renders `bundle` and writes it to a uniquely named file in `dir`
///
/// The file is persisted; the caller owns it and is responsible for removing
/// it once it has been delivered.
pub fn export_report(bundle: &ReportBundle, format: ExportFormat, dir: &Path) -> Result<ExportedReport> {
    let bytes = format.render(bundle)?;

    let mut file = tempfile::Builder::new()
        .prefix("github_report_")
        .suffix(&format!(".{}", format.extension()))
        .tempfile_in(dir)?;
    file.write_all(&bytes)?;
    let (_, path) = file.keep().map_err(|e| e.error)?;

    info!(
        "Exported report {} for {} as {} to {}",
        bundle.report_id,
        bundle.repo_info.full_name,
        format,
        path.display()
    );

    Ok(ExportedReport {
        path,
        download_name: download_name(bundle, format),
        format,
    })
}

/// Parses `format` first, so an unsupported identifier never touches the disk
pub fn export_as(bundle: &ReportBundle, format: &str, dir: &Path) -> Result<ExportedReport> {
    let format: ExportFormat = format.parse()?;
    export_report(bundle, format, dir)
}

fn download_name(bundle: &ReportBundle, format: ExportFormat) -> String {
    format!(
        "github_report_{}.{}",
        sanitize_filename(&bundle.repo_info.name),
        format.extension()
    )
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use test_case::test_case;

    #[test_case("pdf", ExportFormat::Pdf)]
    #[test_case("PDF", ExportFormat::Pdf)]
    #[test_case("markdown", ExportFormat::Markdown)]
    #[test_case("md", ExportFormat::Markdown)]
    fn test_parse_format(input: &str, expected: ExportFormat) {
        assert_eq!(input.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_unsupported_format_writes_nothing() -> Result<()> {
        let dir = TempDir::new()?;
        let result = export_as(&test_support::bundle(), "docx", dir.path());

        assert!(matches!(result, Err(AnalystError::UnsupportedFormat(ref f)) if f == "docx"));
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_markdown_export_writes_file() -> Result<()> {
        let dir = TempDir::new()?;
        let bundle = test_support::bundle();
        let exported = export_as(&bundle, "markdown", dir.path())?;

        assert_eq!(exported.download_name, "github_report_tokio.md");
        assert!(exported.path.starts_with(dir.path()));
        let written = std::fs::read_to_string(&exported.path)?;
        assert_eq!(written, render_markdown(&bundle));
        Ok(())
    }

    #[test]
    fn test_each_export_gets_its_own_file() -> Result<()> {
        let dir = TempDir::new()?;
        let bundle = test_support::bundle();
        let first = export_report(&bundle, ExportFormat::Pdf, dir.path())?;
        let second = export_report(&bundle, ExportFormat::Pdf, dir.path())?;

        assert_ne!(first.path, second.path);
        assert!(std::fs::read(&first.path)?.starts_with(b"%PDF"));
        Ok(())
    }

    #[test]
    fn test_download_name_is_sanitized() {
        let mut bundle = test_support::bundle();
        bundle.repo_info.name = "my repo/../x".into();
        assert_eq!(download_name(&bundle, ExportFormat::Pdf), "github_report_my_repo____x.pdf");
    }
}
