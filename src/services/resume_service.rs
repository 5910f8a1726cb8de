use crate::{
    database::MongoDB,
    models::{AnalysisResponse, JobRole, SkillSource},
    resume::{ats_score, extract_skills, extract_text, AtsScore, DocumentFormat, ExtractedSkill},
    services::{analysis_service, role_service, skill_service},
    utils::AppError,
};
use base64::Engine;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone)]
pub struct ResumeOptions {
    /// Grava as skills encontradas como skills do usuário (source `resume`)
    pub save: bool,
    /// Cargo alvo: pontua o ATS contra ele e gera uma análise
    pub role_id: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct Base64ResumeRequest {
    pub filename: Option<String>,
    /// Conteúdo em base64 (aceita prefixo `data:...;base64,`)
    pub content_base64: String,
    pub save: Option<bool>,
    pub role_id: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ResumeTextRequest {
    pub text: String,
    pub save: Option<bool>,
    pub role_id: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AtsRequest {
    pub text: String,
    pub role_id: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ResumeResult {
    pub success: bool,
    pub format: DocumentFormat,
    pub word_count: usize,
    pub skills_section_found: bool,
    pub skills: Vec<ExtractedSkill>,
    pub saved_count: usize,
    pub ats: AtsScore,
    pub analysis: Option<AnalysisResponse>,
}

/// Decodifica o upload em base64
pub fn decode_base64(content: &str) -> Result<Vec<u8>, AppError> {
    let payload = match content.find("base64,") {
        Some(idx) if content.starts_with("data:") => &content[idx + "base64,".len()..],
        _ => content,
    };
    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    base64::engine::general_purpose::STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| AppError::bad_request(format!("Invalid base64 content: {}", e)))
}

async fn target_role(db: &MongoDB, role_id: Option<&str>) -> Result<Option<JobRole>, AppError> {
    match role_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => Ok(Some(role_service::get_role(db, id).await?)),
        None => Ok(None),
    }
}

/// Upload de arquivo: detecta formato, extrai texto e segue como texto
pub async fn process_upload(
    db: &MongoDB,
    user_id: &str,
    filename: Option<&str>,
    bytes: Vec<u8>,
    options: &ResumeOptions,
) -> Result<ResumeResult, AppError> {
    let size = bytes.len();
    let (format, text) = extract_text(filename, bytes).await?;
    log::info!("📄 Extracted {} chars from {:?} resume ({} bytes)", text.len(), format, size);

    process_text(db, user_id, format, &text, options).await
}

pub async fn process_text(
    db: &MongoDB,
    user_id: &str,
    format: DocumentFormat,
    text: &str,
    options: &ResumeOptions,
) -> Result<ResumeResult, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::bad_request("Resume text must not be empty"));
    }

    let role = target_role(db, options.role_id.as_deref()).await?;
    let vocabulary = skill_service::vocabulary(db).await?;
    let extracted = extract_skills(text, &vocabulary);
    let names = extracted.names();

    let ats = ats_score(text, &names, &vocabulary, role.as_ref().map(|r| r.skills.as_slice()));

    let mut saved_count = 0;
    if options.save && !extracted.skills.is_empty() {
        let pairs: Vec<(String, String)> = extracted
            .skills
            .iter()
            .map(|s| (s.name.clone(), s.display_name.clone()))
            .collect();
        saved_count = skill_service::upsert_user_skills(db, user_id, &pairs, SkillSource::Resume, None, None)
            .await?
            .len();
    }

    let analysis = match &role {
        Some(role) if !names.is_empty() => {
            let user = names.iter().cloned().collect();
            let analysis =
                analysis_service::run_analysis(db, user_id, role, user, SkillSource::Resume, options.save).await?;
            Some(AnalysisResponse::from(analysis))
        }
        _ => None,
    };

    log::info!(
        "🧠 Resume parsed for user {}: {} skills, ATS {}",
        user_id,
        names.len(),
        ats.score
    );

    Ok(ResumeResult {
        success: true,
        format,
        word_count: ats.word_count,
        skills_section_found: extracted.skills_section_found,
        skills: extracted.skills,
        saved_count,
        ats,
        analysis,
    })
}

/// Só a pontuação ATS, opcionalmente contra um cargo
pub async fn ats_for_text(db: &MongoDB, request: &AtsRequest) -> Result<AtsScore, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::bad_request("Resume text must not be empty"));
    }

    let role = target_role(db, request.role_id.as_deref()).await?;
    let vocabulary = skill_service::vocabulary(db).await?;
    let names = extract_skills(&request.text, &vocabulary).names();

    Ok(ats_score(&request.text, &names, &vocabulary, role.as_ref().map(|r| r.skills.as_slice())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        let bytes = decode_base64("SGVsbG8sIHJlc3VtZQ==").unwrap();
        assert_eq!(bytes, b"Hello, resume");
    }

    #[test]
    fn test_decode_data_url_with_newlines() {
        let bytes = decode_base64("data:application/pdf;base64,JVBE\nRi0x").unwrap();
        assert!(bytes.starts_with(b"%PDF-1"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_base64("not base64 !!"), Err(AppError::BadRequest(_))));
    }
}
