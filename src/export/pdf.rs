use crate::error::{AnalystError, Result};
use crate::models::ReportBundle;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const LINE_HEIGHT: f32 = 5.5;
/// Characters per body line at 10pt Helvetica within the margins
const WRAP_COLUMNS: usize = 92;

/// Renders the bundle as a paged A4 PDF
pub fn render_pdf(bundle: &ReportBundle) -> Result<Vec<u8>> {
    let repo = &bundle.repo_info;
    let title = format!("GitHub Repository Analysis Report - {}", repo.full_name);

    let mut writer = PageWriter::new(&title)?;
    writer.line(&title, TITLE_SIZE, true);
    writer.gap();

    writer.line("Basic Information", HEADING_SIZE, true);
    let fields = [
        ("Repository", repo.full_name.clone()),
        ("Description", repo.description.clone()),
        ("Primary language", repo.language.clone()),
        ("Stars", repo.stars.to_string()),
        ("Forks", repo.forks.to_string()),
        ("Open issues", repo.open_issues.to_string()),
        ("Created", repo.created_at.clone()),
        ("Last updated", repo.updated_at.clone()),
        ("URL", repo.html_url.clone()),
        ("Analyzed at", bundle.analyzed_at.clone()),
    ];
    for (label, value) in fields {
        writer.paragraph(&format!("{}: {}", label, value));
    }
    writer.gap();

    writer.line("Analysis", HEADING_SIZE, true);
    for line in bundle.narrative.lines() {
        writer.paragraph(line);
    }

    writer.finish()
}

/// Writes lines top to bottom, opening a new page when the current one is full
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            sanitize(title).as_str(),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "Layer 1",
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) {
        if self.y < MARGIN {
            self.new_page();
        }
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(sanitize(text), size, Mm(MARGIN), Mm(self.y), font);
        self.y -= if size > BODY_SIZE { size * 0.6 } else { LINE_HEIGHT };
    }

    fn paragraph(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.gap();
            return;
        }
        for line in wrap(text, WRAP_COLUMNS) {
            self.line(&line, BODY_SIZE, false);
        }
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT / 2.0;
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

fn pdf_error(err: impl std::fmt::Display) -> AnalystError {
    AnalystError::Export(format!("PDF rendering failed: {}", err))
}

/// Built-in PDF fonts only cover Latin-1; anything else becomes `?`
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' => ' ',
            c if c.is_control() => ' ',
            c if (c as u32) < 0x100 => c,
            _ => '?',
        })
        .collect()
}

/// Greedy word wrap on whitespace; words longer than `width` are split
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current.is_empty() { word.len() } else { current.chars().count() + 1 + word.len() };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
