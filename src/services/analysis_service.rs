use crate::{
    database::{MongoDB, ANALYSES},
    matching::{analyze, rank_roles, skill_set, split_skill_list, GapReport, RankOptions, RoleMatch, SkillWeights},
    models::{Analysis, JobRole, SkillSource},
    services::{role_service, skill_service},
    utils::AppError,
};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::FindOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::parse_object_id;

pub const DEFAULT_HISTORY_LIMIT: i64 = 20;
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Comparação avulsa, sem conta e sem dataset
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CompareRequest {
    pub user_skills: Vec<String>,
    pub role_skills: Vec<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AnalyzeRequest {
    /// Id do cargo (tem prioridade sobre `role_title`)
    pub role_id: Option<String>,
    pub role_title: Option<String>,
    /// Skills a comparar; sem elas usa as skills salvas do usuário
    pub skills: Option<Vec<String>>,
    /// Salva no histórico (padrão: true)
    pub save: Option<bool>,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct RecommendationsRequest {
    pub skills: Option<Vec<String>>,
    pub limit: Option<usize>,
    pub min_percentage: Option<f64>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RecommendationsResponse {
    pub success: bool,
    pub skills: Vec<String>,
    pub roles: Vec<RoleMatch>,
    pub total_roles: usize,
}

/// Skills não vazias depois da normalização, ou 400
fn required_set(items: &[String], what: &str) -> Result<HashSet<String>, AppError> {
    let set = skill_set(items.iter().flat_map(|item| split_skill_list(item)));
    if set.is_empty() {
        return Err(AppError::bad_request(format!("{} must contain at least one skill", what)));
    }
    Ok(set)
}

/// Comparação pura entre duas listas, pesos uniformes
pub fn compare(request: &CompareRequest) -> Result<GapReport, AppError> {
    let user = required_set(&request.user_skills, "user_skills")?;
    let role = required_set(&request.role_skills, "role_skills")?;
    Ok(analyze(&user, &role, &SkillWeights::uniform()))
}

async fn resolve_role(db: &MongoDB, request: &AnalyzeRequest) -> Result<JobRole, AppError> {
    if let Some(id) = request.role_id.as_deref().filter(|id| !id.trim().is_empty()) {
        return role_service::get_role(db, id).await;
    }
    if let Some(title) = request.role_title.as_deref().filter(|t| !t.trim().is_empty()) {
        return role_service::find_role_by_title(db, title).await;
    }
    Err(AppError::bad_request("role_id or role_title is required"))
}

/// Skills enviadas no request ou, sem elas, as salvas do usuário
async fn user_skills(db: &MongoDB, user_id: &str, submitted: Option<&Vec<String>>) -> Result<HashSet<String>, AppError> {
    match submitted {
        Some(items) if !items.is_empty() => required_set(items, "skills"),
        _ => {
            let stored = skill_service::user_skill_names(db, user_id).await?;
            if stored.is_empty() {
                return Err(AppError::bad_request(
                    "No skills provided and no saved skills found; add skills or upload a resume first",
                ));
            }
            Ok(stored.into_iter().collect())
        }
    }
}

/// Analisa as skills do usuário contra um cargo do dataset
pub async fn analyze_for_user(
    db: &MongoDB,
    user_id: &str,
    request: &AnalyzeRequest,
) -> Result<Analysis, AppError> {
    let role = resolve_role(db, request).await?;
    let user = user_skills(db, user_id, request.skills.as_ref()).await?;

    run_analysis(db, user_id, &role, user, SkillSource::Manual, request.save.unwrap_or(true)).await
}

/// Compara com os pesos IDF do dataset atual e, se pedido, grava no histórico
pub async fn run_analysis(
    db: &MongoDB,
    user_id: &str,
    role: &JobRole,
    user: HashSet<String>,
    source: SkillSource,
    save: bool,
) -> Result<Analysis, AppError> {
    let (_, weights) = role_service::load_profiles_and_weights(db).await?;
    let required: HashSet<String> = role.skills.iter().cloned().collect();
    let report = analyze(&user, &required, &weights);

    let mut snapshot: Vec<String> = user.into_iter().collect();
    snapshot.sort();

    let mut analysis = Analysis::from_report(
        user_id,
        role.id_hex(),
        role.title.clone(),
        source,
        snapshot,
        report,
        chrono::Utc::now().timestamp(),
    );

    if save {
        let result = db.collection::<Analysis>(ANALYSES).insert_one(&analysis).await?;
        analysis.id = result.inserted_id.as_object_id();
        log::info!("💾 Analysis saved for user {} ({}, {})", user_id, role.title, source.as_str());
    }

    Ok(analysis)
}

/// Ranqueia todos os cargos para as skills do usuário
pub async fn recommendations(
    db: &MongoDB,
    user_id: &str,
    request: &RecommendationsRequest,
) -> Result<RecommendationsResponse, AppError> {
    let user = user_skills(db, user_id, request.skills.as_ref()).await?;
    let (profiles, weights) = role_service::load_profiles_and_weights(db).await?;

    let options = RankOptions {
        limit: request.limit,
        min_percentage: request.min_percentage,
        category: request.category.clone().filter(|c| !c.trim().is_empty()),
    };
    let roles = rank_roles(&user, &profiles, &weights, &options);

    let mut skills: Vec<String> = user.into_iter().collect();
    skills.sort();

    Ok(RecommendationsResponse {
        success: true,
        skills,
        roles,
        total_roles: profiles.len(),
    })
}

// ==================== HISTORY ====================

pub async fn list_history(
    db: &MongoDB,
    user_id: &str,
    limit: Option<i64>,
    offset: Option<u64>,
) -> Result<(Vec<Analysis>, u64), AppError> {
    let collection = db.collection::<Analysis>(ANALYSES);
    let filter = doc! { "user_id": user_id };

    let total = collection.count_documents(filter.clone()).await?;

    let options = FindOptions::builder()
        .sort(doc! { "created_at": -1, "_id": -1 })
        .skip(offset.unwrap_or(0))
        .limit(limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT))
        .build();

    let analyses: Vec<Analysis> = collection
        .find(filter)
        .with_options(options)
        .await?
        .try_collect()
        .await?;

    Ok((analyses, total))
}

/// Análise do próprio usuário; de outro usuário responde 404
pub async fn get_analysis(db: &MongoDB, user_id: &str, analysis_id: &str) -> Result<Analysis, AppError> {
    let oid = parse_object_id(analysis_id, "analysis")?;

    db.collection::<Analysis>(ANALYSES)
        .find_one(doc! { "_id": oid, "user_id": user_id })
        .await?
        .ok_or_else(|| AppError::not_found(format!("Analysis {} not found", analysis_id)))
}

pub async fn delete_analysis(db: &MongoDB, user_id: &str, analysis_id: &str) -> Result<(), AppError> {
    let oid = parse_object_id(analysis_id, "analysis")?;

    let result = db
        .collection::<Analysis>(ANALYSES)
        .delete_one(doc! { "_id": oid, "user_id": user_id })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::not_found(format!("Analysis {} not found", analysis_id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compare_reports_gap() {
        let report = compare(&CompareRequest {
            user_skills: strings(&["Python", "JS, Docker"]),
            role_skills: strings(&["python", "javascript", "kubernetes", "sql"]),
        })
        .unwrap();

        assert_eq!(report.match_percentage, 50.0);
        assert_eq!(report.weighted_percentage, 50.0);
        assert_eq!(report.matched_skills, vec!["javascript", "python"]);
        assert_eq!(report.missing_skills, vec!["kubernetes", "sql"]);
        assert_eq!(report.extra_skills, vec!["docker"]);
        assert_eq!(report.verdict, "partial match");
    }

    #[test]
    fn test_compare_rejects_empty_lists() {
        let empty_user = compare(&CompareRequest {
            user_skills: strings(&[" ", ","]),
            role_skills: strings(&["python"]),
        });
        assert!(matches!(empty_user, Err(AppError::BadRequest(_))));

        let empty_role = compare(&CompareRequest {
            user_skills: strings(&["python"]),
            role_skills: vec![],
        });
        assert!(matches!(empty_role, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_compare_full_match() {
        let report = compare(&CompareRequest {
            user_skills: strings(&["k8s", "Golang", "AWS"]),
            role_skills: strings(&["kubernetes", "go"]),
        })
        .unwrap();
        assert_eq!(report.match_percentage, 100.0);
        assert_eq!(report.verdict, "strong match");
        assert!(report.suggestions.is_empty());
    }
}
