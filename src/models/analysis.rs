use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::matching::{GapReport, Suggestion};
use crate::models::SkillSource;

/// Análise salva (histórico do usuário)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub role_id: String,
    pub role_title: String,
    pub source: SkillSource,
    /// Skills submetidas (normalizadas)
    pub user_skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub extra_skills: Vec<String>,
    pub match_percentage: f64,
    pub weighted_percentage: f64,
    pub jaccard: f64,
    pub cosine: f64,
    pub verdict: String,
    pub suggestions: Vec<Suggestion>,
    pub created_at: i64,
}

impl Analysis {
    pub fn from_report(
        user_id: &str,
        role_id: String,
        role_title: String,
        source: SkillSource,
        user_skills: Vec<String>,
        report: GapReport,
        created_at: i64,
    ) -> Self {
        Analysis {
            id: None,
            user_id: user_id.to_string(),
            role_id,
            role_title,
            source,
            user_skills,
            matched_skills: report.matched_skills,
            missing_skills: report.missing_skills,
            extra_skills: report.extra_skills,
            match_percentage: report.match_percentage,
            weighted_percentage: report.weighted_percentage,
            jaccard: report.jaccard,
            cosine: report.cosine,
            verdict: report.verdict,
            suggestions: report.suggestions,
            created_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AnalysisResponse {
    pub id: Option<String>,
    pub role_id: String,
    pub role_title: String,
    pub source: SkillSource,
    pub user_skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub extra_skills: Vec<String>,
    pub match_percentage: f64,
    pub weighted_percentage: f64,
    pub jaccard: f64,
    pub cosine: f64,
    pub verdict: String,
    pub suggestions: Vec<Suggestion>,
    pub created_at: i64,
}

impl From<Analysis> for AnalysisResponse {
    fn from(a: Analysis) -> Self {
        AnalysisResponse {
            id: a.id.map(|id| id.to_hex()),
            role_id: a.role_id,
            role_title: a.role_title,
            source: a.source,
            user_skills: a.user_skills,
            matched_skills: a.matched_skills,
            missing_skills: a.missing_skills,
            extra_skills: a.extra_skills,
            match_percentage: a.match_percentage,
            weighted_percentage: a.weighted_percentage,
            jaccard: a.jaccard,
            cosine: a.cosine,
            verdict: a.verdict,
            suggestions: a.suggestions,
            created_at: a.created_at,
        }
    }
}

/// Item compacto para a listagem do histórico
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AnalysisListItem {
    pub id: String,
    pub role_title: String,
    pub match_percentage: f64,
    pub verdict: String,
    pub missing_count: usize,
    pub created_at: i64,
}

impl From<Analysis> for AnalysisListItem {
    fn from(a: Analysis) -> Self {
        AnalysisListItem {
            id: a.id.map(|id| id.to_hex()).unwrap_or_default(),
            role_title: a.role_title,
            match_percentage: a.match_percentage,
            verdict: a.verdict,
            missing_count: a.missing_skills.len(),
            created_at: a.created_at,
        }
    }
}
