use crate::{
    database::{MongoDB, SKILLS, USER_SKILLS},
    matching::{display_name, normalize_skill, split_skill_list, RoleProfile, SkillWeights},
    models::{AddSkillsRequest, Proficiency, Skill, SkillSource, UpdateSkillRequest, UserSkill, UserSkillResponse},
    utils::AppError,
};
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};

use super::parse_object_id;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use serde::Serialize;
use std::collections::HashSet;

pub const DEFAULT_CATALOG_LIMIT: i64 = 50;
pub const MAX_CATALOG_LIMIT: i64 = 500;
const MAX_YEARS_EXPERIENCE: f32 = 60.0;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SkillsCatalogResponse {
    pub success: bool,
    pub skills: Vec<Skill>,
    pub count: usize,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserSkillsResponse {
    pub success: bool,
    pub skills: Vec<UserSkillResponse>,
    pub count: usize,
}

// ==================== CATALOG ====================

/// Recria o catálogo `skills` a partir dos cargos atuais
pub async fn rebuild_catalog(db: &MongoDB, roles: &[RoleProfile]) -> Result<usize, AppError> {
    let weights = SkillWeights::from_roles(roles);

    let mut catalog: Vec<Skill> = weights
        .skills()
        .map(|name| Skill {
            name: name.clone(),
            display_name: display_name(name),
            demand: weights.frequency(name) as u32,
            weight: crate::matching::similarity::round2(weights.weight(name)),
        })
        .collect();
    catalog.sort_by(|a, b| a.name.cmp(&b.name));

    let collection = db.collection::<Skill>(SKILLS);
    collection.delete_many(doc! {}).await?;

    if !catalog.is_empty() {
        collection.insert_many(&catalog).await?;
    }

    log::info!(
        "📚 Skills catalog rebuilt: {} skills from {} roles",
        weights.skill_count(),
        weights.role_count()
    );
    log::debug!("   Top skills: {:?}", weights.top_skills(5));
    Ok(catalog.len())
}

/// Lista o catálogo (mais demandadas primeiro), com busca opcional por nome
pub async fn list_catalog(
    db: &MongoDB,
    search: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<Skill>, AppError> {
    let filter = match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(query) => {
            let pattern = regex::escape(&query.to_lowercase());
            doc! {
                "$or": [
                    { "name": { "$regex": &pattern, "$options": "i" } },
                    { "display_name": { "$regex": &pattern, "$options": "i" } }
                ]
            }
        }
        None => doc! {},
    };

    let options = FindOptions::builder()
        .sort(doc! { "demand": -1, "name": 1 })
        .limit(limit.unwrap_or(DEFAULT_CATALOG_LIMIT).clamp(1, MAX_CATALOG_LIMIT))
        .build();

    let skills: Vec<Skill> = db
        .collection::<Skill>(SKILLS)
        .find(filter)
        .with_options(options)
        .await?
        .try_collect()
        .await?;

    Ok(skills)
}

/// Vocabulário de skills conhecidas (usado na leitura de currículos)
pub async fn vocabulary(db: &MongoDB) -> Result<HashSet<String>, AppError> {
    let skills: Vec<Skill> = db
        .collection::<Skill>(SKILLS)
        .find(doc! {})
        .await?
        .try_collect()
        .await?;

    Ok(skills.into_iter().map(|s| s.name).collect())
}

// ==================== USER SKILLS ====================

/// Junta `skill` e `skills` do request; cada item pode ser uma lista em texto
fn requested_skills(request: &AddSkillsRequest) -> Vec<(String, String)> {
    let mut raw: Vec<&str> = Vec::new();
    if let Some(skill) = &request.skill {
        raw.extend(split_skill_list(skill));
    }
    if let Some(skills) = &request.skills {
        for item in skills {
            raw.extend(split_skill_list(item));
        }
    }

    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|r| normalize_skill(r).map(|name| (name, display_name(r))))
        .filter(|(name, _)| seen.insert(name.clone()))
        .collect()
}

fn validate_years(years: Option<f32>) -> Result<(), AppError> {
    match years {
        Some(y) if !(0.0..=MAX_YEARS_EXPERIENCE).contains(&y) => Err(AppError::bad_request(format!(
            "years_experience must be between 0 and {}",
            MAX_YEARS_EXPERIENCE
        ))),
        _ => Ok(()),
    }
}

fn proficiency_bson(proficiency: Proficiency) -> Result<mongodb::bson::Bson, AppError> {
    mongodb::bson::to_bson(&proficiency).map_err(|e| AppError::internal(format!("BSON error: {}", e)))
}

pub async fn list_user_skills(db: &MongoDB, user_id: &str) -> Result<Vec<UserSkill>, AppError> {
    let options = FindOptions::builder().sort(doc! { "skill": 1 }).build();

    let skills: Vec<UserSkill> = db
        .collection::<UserSkill>(USER_SKILLS)
        .find(doc! { "user_id": user_id })
        .with_options(options)
        .await?
        .try_collect()
        .await?;

    Ok(skills)
}

/// Nomes normalizados das skills do usuário
pub async fn user_skill_names(db: &MongoDB, user_id: &str) -> Result<Vec<String>, AppError> {
    Ok(list_user_skills(db, user_id)
        .await?
        .into_iter()
        .map(|s| s.skill)
        .collect())
}

/// Upsert por `(user_id, skill)`. Proficiência e anos só são sobrescritos
/// quando informados.
pub async fn upsert_user_skills(
    db: &MongoDB,
    user_id: &str,
    skills: &[(String, String)],
    source: SkillSource,
    proficiency: Option<Proficiency>,
    years_experience: Option<f32>,
) -> Result<Vec<UserSkill>, AppError> {
    let collection = db.collection::<UserSkill>(USER_SKILLS);
    let now = chrono::Utc::now().timestamp();

    for (name, shown) in skills {
        let mut set = doc! {
            "display_name": shown,
            "source": source.as_str(),
            "updated_at": now,
        };
        if let Some(p) = proficiency {
            set.insert("proficiency", proficiency_bson(p)?);
        }
        if let Some(years) = years_experience {
            set.insert("years_experience", years as f64);
        }

        collection
            .update_one(
                doc! { "user_id": user_id, "skill": name },
                doc! {
                    "$set": set,
                    "$setOnInsert": { "created_at": now }
                },
            )
            .upsert(true)
            .await?;
    }

    let names: Vec<&str> = skills.iter().map(|(name, _)| name.as_str()).collect();
    let saved: Vec<UserSkill> = collection
        .find(doc! { "user_id": user_id, "skill": { "$in": names } })
        .sort(doc! { "skill": 1 })
        .await?
        .try_collect()
        .await?;

    log::info!("💾 Upserted {} skills ({}) for user {}", saved.len(), source.as_str(), user_id);
    Ok(saved)
}

pub async fn add_user_skills(
    db: &MongoDB,
    user_id: &str,
    request: &AddSkillsRequest,
) -> Result<Vec<UserSkill>, AppError> {
    validate_years(request.years_experience)?;

    let skills = requested_skills(request);
    if skills.is_empty() {
        return Err(AppError::bad_request("At least one non-empty skill is required"));
    }

    upsert_user_skills(
        db,
        user_id,
        &skills,
        SkillSource::Manual,
        request.proficiency,
        request.years_experience,
    )
    .await
}

pub async fn update_user_skill(
    db: &MongoDB,
    user_id: &str,
    skill_id: &str,
    request: &UpdateSkillRequest,
) -> Result<UserSkill, AppError> {
    let oid = parse_object_id(skill_id, "skill")?;
    validate_years(request.years_experience)?;

    let mut set = Document::new();
    if let Some(p) = request.proficiency {
        set.insert("proficiency", proficiency_bson(p)?);
    }
    if let Some(years) = request.years_experience {
        set.insert("years_experience", years as f64);
    }
    if set.is_empty() {
        return Err(AppError::bad_request("Nothing to update: send proficiency or years_experience"));
    }
    set.insert("updated_at", chrono::Utc::now().timestamp());

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();

    db.collection::<UserSkill>(USER_SKILLS)
        .find_one_and_update(doc! { "_id": oid, "user_id": user_id }, doc! { "$set": set })
        .with_options(options)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Skill {} not found", skill_id)))
}

pub async fn delete_user_skill(db: &MongoDB, user_id: &str, skill_id: &str) -> Result<(), AppError> {
    let oid = parse_object_id(skill_id, "skill")?;

    let result = db
        .collection::<UserSkill>(USER_SKILLS)
        .delete_one(doc! { "_id": oid, "user_id": user_id })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::not_found(format!("Skill {} not found", skill_id)));
    }
    Ok(())
}

pub async fn clear_user_skills(db: &MongoDB, user_id: &str) -> Result<u64, AppError> {
    let result = db
        .collection::<UserSkill>(USER_SKILLS)
        .delete_many(doc! { "user_id": user_id })
        .await?;
    Ok(result.deleted_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_requested_skills_merges_and_dedupes() {
        let request = AddSkillsRequest {
            skill: Some("ReactJS".to_string()),
            skills: Some(vec!["Python, JS".to_string(), "react".to_string(), "  ".to_string()]),
            proficiency: None,
            years_experience: None,
        };

        let names: Vec<String> = requested_skills(&request).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["react", "python", "javascript"]);
    }

    #[test]
    fn test_requested_skills_keeps_display_name() {
        let request = AddSkillsRequest {
            skill: Some("  Machine   Learning ".to_string()),
            skills: None,
            proficiency: None,
            years_experience: None,
        };
        let skills = requested_skills(&request);
        assert_eq!(skills[0].0, "machine learning");
        assert_eq!(skills[0].1, "Machine Learning");
    }

    #[test]
    fn test_validate_years() {
        assert!(validate_years(None).is_ok());
        assert!(validate_years(Some(3.5)).is_ok());
        assert!(matches!(validate_years(Some(-1.0)), Err(AppError::BadRequest(_))));
        assert!(validate_years(Some(99.0)).is_err());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_user_skill_upsert_roundtrip() {
        dotenv::dotenv().ok();
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/skill_gap_analyzer_test".to_string());
        let db = MongoDB::new(&url).await.unwrap();
        let user_id = ObjectId::new().to_hex();

        let skills = vec![("python".to_string(), "Python".to_string())];
        upsert_user_skills(&db, &user_id, &skills, SkillSource::Manual, Some(Proficiency::Advanced), None)
            .await
            .unwrap();
        let saved = upsert_user_skills(&db, &user_id, &skills, SkillSource::Resume, None, Some(2.0))
            .await
            .unwrap();

        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].proficiency, Some(Proficiency::Advanced));
        assert_eq!(saved[0].source, SkillSource::Resume);
        assert_eq!(clear_user_skills(&db, &user_id).await.unwrap(), 1);
    }
}
