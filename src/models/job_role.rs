use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::matching::RoleProfile;

/// Cargo com seus requisitos (armazenado no MongoDB)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRole {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub title: String,

    /// Título em minúsculas, índice único
    pub normalized_title: String,

    pub category: String,

    pub description: Option<String>,

    /// Skills normalizadas, sem duplicados, nunca vazia
    pub skills: Vec<String>,

    /// Veio do dataset (seed) em vez de ter sido criado via API
    pub is_default: bool,

    pub created_at: i64,
    pub updated_at: i64,
}

impl JobRole {
    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    pub fn profile(&self) -> RoleProfile {
        RoleProfile {
            id: self.id_hex(),
            title: self.title.clone(),
            category: self.category.clone(),
            skills: self.skills.clone(),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateRoleRequest {
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JobRoleResponse {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub skills: Vec<String>,
    pub is_default: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<JobRole> for JobRoleResponse {
    fn from(r: JobRole) -> Self {
        JobRoleResponse {
            id: r.id_hex(),
            title: r.title,
            category: r.category,
            description: r.description,
            skills: r.skills,
            is_default: r.is_default,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
