//! Exportação de uma análise salva em TXT, CSV ou PDF.

use crate::{models::Analysis, utils::AppError};
use chrono::{TimeZone, Utc};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Txt,
    Csv,
    Pdf,
}

impl FromStr for ReportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" | "text" => Ok(ReportFormat::Txt),
            "csv" => Ok(ReportFormat::Csv),
            "pdf" => Ok(ReportFormat::Pdf),
            other => Err(AppError::bad_request(format!(
                "Unsupported report format '{}' (expected txt, csv or pdf)",
                other
            ))),
        }
    }
}

impl ReportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Txt => "text/plain; charset=utf-8",
            ReportFormat::Csv => "text/csv; charset=utf-8",
            ReportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Txt => "txt",
            ReportFormat::Csv => "csv",
            ReportFormat::Pdf => "pdf",
        }
    }
}

fn format_date(timestamp: i64) -> String {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// `skill-gap-data-scientist-2026-01-31.pdf`
pub fn report_filename(analysis: &Analysis, format: ReportFormat) -> String {
    let slug = analysis
        .role_title
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let slug = if slug.is_empty() { "report".to_string() } else { slug };
    let date = Utc
        .timestamp_opt(analysis.created_at, 0)
        .single()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    format!("skill-gap-{}-{}.{}", slug, date, format.extension())
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

/// Linhas do relatório, compartilhadas entre TXT e PDF
fn report_lines(analysis: &Analysis) -> Vec<String> {
    let mut lines = vec![
        "SKILL GAP REPORT".to_string(),
        String::new(),
        format!("Role: {}", analysis.role_title),
        format!("Date: {}", format_date(analysis.created_at)),
        format!("Skills source: {}", analysis.source.as_str()),
        String::new(),
        format!("Match: {:.2}% ({})", analysis.match_percentage, analysis.verdict),
        format!("Weighted match: {:.2}%", analysis.weighted_percentage),
        format!("Jaccard similarity: {:.2}", analysis.jaccard),
        format!("Cosine similarity: {:.2}", analysis.cosine),
        String::new(),
        format!("Matched skills ({}): {}", analysis.matched_skills.len(), list_or_none(&analysis.matched_skills)),
        format!("Missing skills ({}): {}", analysis.missing_skills.len(), list_or_none(&analysis.missing_skills)),
        format!("Other skills ({}): {}", analysis.extra_skills.len(), list_or_none(&analysis.extra_skills)),
    ];

    if !analysis.suggestions.is_empty() {
        lines.push(String::new());
        lines.push("Suggestions:".to_string());
        for (i, s) in analysis.suggestions.iter().enumerate() {
            lines.push(format!("{}. [{}] {}", i + 1, s.priority.as_str(), s.message));
        }
    }

    lines
}

pub fn render_txt(analysis: &Analysis) -> Vec<u8> {
    let mut text = report_lines(analysis).join("\n");
    text.push('\n');
    text.into_bytes()
}

/// `section,skill,detail`: métricas primeiro, depois uma linha por skill
pub fn render_csv(analysis: &Analysis) -> Result<Vec<u8>, AppError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    let csv_error = |e: csv::Error| AppError::internal(format!("CSV error: {}", e));

    wtr.write_record(["section", "skill", "detail"]).map_err(csv_error)?;

    let metrics = [
        ("role", analysis.role_title.clone()),
        ("date", format_date(analysis.created_at)),
        ("match_percentage", format!("{:.2}", analysis.match_percentage)),
        ("weighted_percentage", format!("{:.2}", analysis.weighted_percentage)),
        ("jaccard", format!("{:.2}", analysis.jaccard)),
        ("cosine", format!("{:.2}", analysis.cosine)),
        ("verdict", analysis.verdict.clone()),
    ];
    for (name, value) in metrics {
        wtr.write_record(["metric", name, value.as_str()]).map_err(csv_error)?;
    }

    for skill in &analysis.matched_skills {
        wtr.write_record(["matched", skill.as_str(), ""]).map_err(csv_error)?;
    }
    for skill in &analysis.missing_skills {
        let detail = analysis
            .suggestions
            .iter()
            .find(|s| &s.skill == skill)
            .map(|s| s.message.as_str())
            .unwrap_or("");
        wtr.write_record(["missing", skill.as_str(), detail]).map_err(csv_error)?;
    }
    for skill in &analysis.extra_skills {
        wtr.write_record(["extra", skill.as_str(), ""]).map_err(csv_error)?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::internal(format!("CSV error: {}", e)))
}

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 6.0;
const FONT_SIZE: f32 = 11.0;
const TITLE_SIZE: f32 = 16.0;
const WRAP_AT: usize = 90;

/// Quebra por palavras; Helvetica embutida só cobre Latin-1, o resto vira `?`
fn wrap(line: &str, width: usize) -> Vec<String> {
    let line: String = line
        .chars()
        .map(|c| if (c as u32) < 256 { c } else { '?' })
        .collect();

    if line.is_empty() {
        return vec![String::new()];
    }

    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if !current.is_empty() && current.len() + word.len() + 1 > width {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, AppError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::internal(format!("PDF font error: {}", e)))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::internal(format!("PDF font error: {}", e)))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(PdfWriter {
            doc,
            layer,
            font,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) {
        if self.y < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }

        let font = if bold { &self.bold } else { &self.font };
        self.layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
        self.y -= if size > FONT_SIZE { LINE_HEIGHT * 1.5 } else { LINE_HEIGHT };
    }

    fn finish(self) -> Result<Vec<u8>, AppError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| AppError::internal(format!("PDF render error: {}", e)))
    }
}

pub fn render_pdf(analysis: &Analysis) -> Result<Vec<u8>, AppError> {
    let lines = report_lines(analysis);
    let mut pdf = PdfWriter::new(&format!("Skill Gap Report - {}", analysis.role_title))?;

    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            pdf.line(line, TITLE_SIZE, true);
            continue;
        }
        for part in wrap(line, WRAP_AT) {
            pdf.line(&part, FONT_SIZE, false);
        }
    }

    pdf.finish()
}

/// Renderiza no formato pedido; PDF roda fora do worker do actix
pub async fn render(analysis: Analysis, format: ReportFormat) -> Result<Vec<u8>, AppError> {
    match format {
        ReportFormat::Txt => Ok(render_txt(&analysis)),
        ReportFormat::Csv => render_csv(&analysis),
        ReportFormat::Pdf => tokio::task::spawn_blocking(move || render_pdf(&analysis))
            .await
            .map_err(|e| AppError::internal(format!("Task join error: {}", e)))?,
    }
}
