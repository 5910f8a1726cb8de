use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SkillSource {
    Manual,
    Resume,
}

impl SkillSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillSource::Manual => "manual",
            SkillSource::Resume => "resume",
        }
    }
}

/// Skill declarada pelo usuário (armazenada no MongoDB)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSkill {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    /// Nome normalizado, único por usuário
    pub skill: String,
    pub display_name: String,
    pub proficiency: Option<Proficiency>,
    pub years_experience: Option<f32>,
    pub source: SkillSource,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Request para adicionar uma ou várias skills
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddSkillsRequest {
    /// Skill única (alternativa a `skills`)
    pub skill: Option<String>,
    /// Lista de skills ou texto livre separado por vírgulas
    pub skills: Option<Vec<String>>,
    pub proficiency: Option<Proficiency>,
    pub years_experience: Option<f32>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateSkillRequest {
    pub proficiency: Option<Proficiency>,
    pub years_experience: Option<f32>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserSkillResponse {
    pub id: String,
    pub skill: String,
    pub display_name: String,
    pub proficiency: Option<Proficiency>,
    pub years_experience: Option<f32>,
    pub source: SkillSource,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<UserSkill> for UserSkillResponse {
    fn from(s: UserSkill) -> Self {
        UserSkillResponse {
            id: s.id.map(|id| id.to_hex()).unwrap_or_default(),
            skill: s.skill,
            display_name: s.display_name,
            proficiency: s.proficiency,
            years_experience: s.years_experience,
            source: s.source,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}
