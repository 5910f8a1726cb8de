//! Extração de texto de currículos (PDF, DOCX, TXT)

use std::io::{Cursor, Read};
use std::path::Path;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::utils::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Text,
}

/// Decide o formato pelos magic bytes e, na falta deles, pela extensão
pub fn detect_format(filename: Option<&str>, bytes: &[u8]) -> Result<DocumentFormat, AppError> {
    if bytes.is_empty() {
        return Err(AppError::bad_request("Uploaded file is empty"));
    }

    let extension = filename
        .and_then(|f| Path::new(f).extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    if bytes.starts_with(b"%PDF") {
        return Ok(DocumentFormat::Pdf);
    }
    if bytes.starts_with(b"PK\x03\x04") {
        return match extension.as_deref() {
            None | Some("docx") => Ok(DocumentFormat::Docx),
            Some(other) => Err(AppError::Unprocessable(format!(
                "Unsupported archive type: .{}",
                other
            ))),
        };
    }

    match extension.as_deref() {
        Some("txt") | Some("text") | Some("md") => Ok(DocumentFormat::Text),
        Some("pdf") | Some("docx") => Err(AppError::Unprocessable(
            "File content does not match its extension".to_string(),
        )),
        Some("doc") => Err(AppError::Unprocessable(
            "Legacy .doc files are not supported, please upload PDF, DOCX or TXT".to_string(),
        )),
        None if std::str::from_utf8(bytes).is_ok() => Ok(DocumentFormat::Text),
        Some(other) => Err(AppError::Unprocessable(format!(
            "Unsupported file type: .{} (expected pdf, docx or txt)",
            other
        ))),
        None => Err(AppError::Unprocessable(
            "Unsupported file type (expected pdf, docx or txt)".to_string(),
        )),
    }
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, AppError>;
}

/// Roda a extração no pool bloqueante. Um panic do parser (arquivo malformado)
/// vira 422 em vez de derrubar o worker.
async fn run_blocking<F>(label: &str, f: F) -> Result<String, AppError>
where
    F: FnOnce() -> Result<String, AppError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => {
            log::warn!("⚠️  {} parser panicked on upload", label);
            Err(AppError::Unprocessable(format!("Could not read text from {}", label)))
        }
        Err(e) => Err(AppError::internal(format!("Task join error: {}", e))),
    }
}

pub struct PdfExtractor;

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, AppError> {
        run_blocking("PDF", move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
                log::warn!("⚠️  PDF extraction failed: {}", e);
                AppError::Unprocessable("Could not read text from PDF".to_string())
            })
        })
        .await
    }
}

pub struct DocxExtractor;

#[async_trait]
impl DocumentExtractor for DocxExtractor {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, AppError> {
        run_blocking("DOCX", move || read_docx(&bytes)).await
    }
}

pub struct PlainTextExtractor;

#[async_trait]
impl DocumentExtractor for PlainTextExtractor {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, AppError> {
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub fn extractor_for(format: DocumentFormat) -> Box<dyn DocumentExtractor> {
    match format {
        DocumentFormat::Pdf => Box::new(PdfExtractor),
        DocumentFormat::Docx => Box::new(DocxExtractor),
        DocumentFormat::Text => Box::new(PlainTextExtractor),
    }
}

/// Detecta o formato e extrai o texto. Texto vazio é erro 422.
pub async fn extract_text(filename: Option<&str>, bytes: Vec<u8>) -> Result<(DocumentFormat, String), AppError> {
    let format = detect_format(filename, &bytes)?;
    let text = extractor_for(format).extract(bytes).await?;

    if text.trim().is_empty() {
        return Err(AppError::Unprocessable(
            "No text could be extracted from the document".to_string(),
        ));
    }

    Ok((format, text))
}

fn read_docx(bytes: &[u8]) -> Result<String, AppError> {
    let invalid = |e: String| {
        log::warn!("⚠️  DOCX extraction failed: {}", e);
        AppError::Unprocessable("Could not read text from DOCX".to_string())
    };

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| invalid(e.to_string()))?;
    let mut document = archive
        .by_name("word/document.xml")
        .map_err(|e| invalid(e.to_string()))?;

    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .map_err(|e| invalid(e.to_string()))?;

    Ok(docx_xml_to_text(&xml))
}

lazy_static! {
    static ref DOCX_TOKEN: Regex =
        Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|</w:p>|<w:tab/>|<w:br/>").unwrap();
}

/// Junta os runs `<w:t>`; cada parágrafo vira uma linha
pub fn docx_xml_to_text(xml: &str) -> String {
    let mut out = String::new();

    for cap in DOCX_TOKEN.captures_iter(xml) {
        match cap.get(1) {
            Some(text) => out.push_str(&decode_entities(text.as_str())),
            None => match &cap[0] {
                "<w:tab/>" => out.push('\t'),
                _ => out.push('\n'),
            },
        }
    }

    out.trim().to_string()
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_detect_format_by_magic_bytes() {
        assert_eq!(detect_format(Some("cv.bin"), b"%PDF-1.7 ...").unwrap(), DocumentFormat::Pdf);
        assert_eq!(detect_format(None, b"PK\x03\x04rest").unwrap(), DocumentFormat::Docx);
        assert_eq!(detect_format(Some("cv.txt"), b"John Doe").unwrap(), DocumentFormat::Text);
        assert_eq!(detect_format(None, b"plain text resume").unwrap(), DocumentFormat::Text);
    }

    #[test]
    fn test_detect_format_rejections() {
        assert!(matches!(detect_format(Some("cv.pdf"), b""), Err(AppError::BadRequest(_))));
        assert!(matches!(
            detect_format(Some("cv.pdf"), b"not really a pdf"),
            Err(AppError::Unprocessable(_))
        ));
        assert!(matches!(
            detect_format(Some("cv.doc"), b"\xd0\xcf\x11\xe0"),
            Err(AppError::Unprocessable(_))
        ));
        assert!(matches!(
            detect_format(Some("photo.png"), b"\x89PNG"),
            Err(AppError::Unprocessable(_))
        ));
    }

    #[test]
    fn test_docx_xml_to_text() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Skills</w:t></w:r></w:p>
            <w:p><w:r><w:t xml:space="preserve">Python, </w:t></w:r><w:r><w:t>R&amp;D</w:t></w:r><w:r><w:tab/><w:t>SQL</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(docx_xml_to_text(xml), "Skills\nPython, R&D\tSQL");
    }

    #[tokio::test]
    async fn test_extract_text_from_docx() {
        let bytes = build_docx(
            "<w:document><w:body><w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Skills: Rust, Docker</w:t></w:r></w:p></w:body></w:document>",
        );
        let (format, text) = extract_text(Some("jane.docx"), bytes).await.unwrap();
        assert_eq!(format, DocumentFormat::Docx);
        assert_eq!(text, "Jane Doe\nSkills: Rust, Docker");
    }

    #[tokio::test]
    async fn test_extract_text_rejects_blank_text() {
        let result = extract_text(Some("blank.txt"), b"   \n\t ".to_vec()).await;
        assert!(matches!(result, Err(AppError::Unprocessable(_))));
    }

    /// PDF com xref válido mas página sem /MediaBox
    fn pdf_without_media_box() -> Vec<u8> {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>",
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>",
            "<< /Type /Page /Parent 2 0 R /Contents 4 0 R >>",
            "<< /Length 0 >>\nstream\n\nendstream",
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_at = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
        for offset in offsets {
            pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_at
            )
            .as_bytes(),
        );
        pdf
    }

    #[tokio::test]
    async fn test_pdf_without_media_box_is_unprocessable() {
        let result = extract_text(Some("cv.pdf"), pdf_without_media_box()).await;
        assert!(matches!(result, Err(AppError::Unprocessable(_))));
    }

    #[tokio::test]
    async fn test_parser_panic_becomes_unprocessable() {
        let result = run_blocking("PDF", || panic!("MediaBox")).await;
        assert!(matches!(result, Err(AppError::Unprocessable(_))));
    }

    #[tokio::test]
    async fn test_broken_docx_is_unprocessable() {
        let result = extract_text(Some("broken.docx"), b"PK\x03\x04garbage".to_vec()).await;
        assert!(matches!(result, Err(AppError::Unprocessable(_))));
    }
}
