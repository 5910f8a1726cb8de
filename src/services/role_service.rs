use crate::{
    database::{MongoDB, JOB_ROLES},
    dataset::{normalize_title, RoleRecord},
    matching::{normalize_skills, RoleProfile, SkillWeights},
    models::{CreateRoleRequest, JobRole},
    services::skill_service,
    utils::{is_duplicate_key, AppError},
};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::FindOptions;

use super::parse_object_id;

pub const DEFAULT_ROLE_LIMIT: i64 = 50;
pub const MAX_ROLE_LIMIT: i64 = 200;
const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Default, Clone)]
pub struct RoleQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

impl RoleQuery {
    fn filter(&self) -> Document {
        let mut filter = Document::new();

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            filter.insert(
                "title",
                doc! { "$regex": regex::escape(search), "$options": "i" },
            );
        }

        if let Some(category) = self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            filter.insert(
                "category",
                doc! { "$regex": format!("^{}$", regex::escape(category)), "$options": "i" },
            );
        }

        filter
    }

    fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_ROLE_LIMIT).clamp(1, MAX_ROLE_LIMIT)
    }
}

/// Página de cargos + total sem paginação
pub async fn list_roles(db: &MongoDB, query: &RoleQuery) -> Result<(Vec<JobRole>, u64), AppError> {
    let collection = db.collection::<JobRole>(JOB_ROLES);
    let filter = query.filter();

    let total = collection.count_documents(filter.clone()).await?;

    let options = FindOptions::builder()
        .sort(doc! { "title": 1 })
        .skip(query.offset.unwrap_or(0))
        .limit(query.limit())
        .build();

    let roles: Vec<JobRole> = collection
        .find(filter)
        .with_options(options)
        .await?
        .try_collect()
        .await?;

    Ok((roles, total))
}

pub async fn get_role(db: &MongoDB, role_id: &str) -> Result<JobRole, AppError> {
    let oid = parse_object_id(role_id, "role")?;

    db.collection::<JobRole>(JOB_ROLES)
        .find_one(doc! { "_id": oid })
        .await?
        .ok_or_else(|| AppError::not_found(format!("Role {} not found", role_id)))
}

/// Busca por título, ignorando caixa e espaços extras
pub async fn find_role_by_title(db: &MongoDB, title: &str) -> Result<JobRole, AppError> {
    let normalized = normalize_title(title);
    if normalized.is_empty() {
        return Err(AppError::bad_request("Role title must not be empty"));
    }

    db.collection::<JobRole>(JOB_ROLES)
        .find_one(doc! { "normalized_title": &normalized })
        .await?
        .ok_or_else(|| AppError::not_found(format!("Role '{}' not found", title.trim())))
}

pub async fn list_categories(db: &MongoDB) -> Result<Vec<String>, AppError> {
    let values = db
        .collection::<JobRole>(JOB_ROLES)
        .distinct("category", doc! {})
        .await?;

    let mut categories: Vec<String> = values
        .into_iter()
        .filter_map(|v| match v {
            Bson::String(s) => Some(s),
            _ => None,
        })
        .collect();
    categories.sort();
    Ok(categories)
}

/// Todos os cargos na forma usada pelo matching
pub async fn load_profiles(db: &MongoDB) -> Result<Vec<RoleProfile>, AppError> {
    let roles: Vec<JobRole> = db
        .collection::<JobRole>(JOB_ROLES)
        .find(doc! {})
        .sort(doc! { "title": 1 })
        .await?
        .try_collect()
        .await?;

    Ok(roles.iter().map(JobRole::profile).collect())
}

/// Cargos + pesos IDF calculados sobre o dataset atual
pub async fn load_profiles_and_weights(db: &MongoDB) -> Result<(Vec<RoleProfile>, SkillWeights), AppError> {
    let profiles = load_profiles(db).await?;
    let weights = SkillWeights::from_roles(&profiles);
    Ok((profiles, weights))
}

fn new_role(record: RoleRecord, is_default: bool) -> JobRole {
    let now = chrono::Utc::now().timestamp();
    JobRole {
        id: None,
        normalized_title: normalize_title(&record.title),
        title: record.title,
        category: record.category,
        description: record.description,
        skills: record.skills,
        is_default,
        created_at: now,
        updated_at: now,
    }
}

/// Valida o request e monta o registro (título, categoria e skills limpos)
fn role_record(request: &CreateRoleRequest) -> Result<RoleRecord, AppError> {
    let title = request.title.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        return Err(AppError::bad_request("Role title must not be empty"));
    }

    let skills = normalize_skills(&request.skills);
    if skills.is_empty() {
        return Err(AppError::Unprocessable("A role needs at least one skill".to_string()));
    }

    let category = request
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string();

    Ok(RoleRecord {
        title,
        category,
        description: request
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        skills,
    })
}

async fn refresh_catalog(db: &MongoDB) -> Result<(), AppError> {
    let profiles = load_profiles(db).await?;
    skill_service::rebuild_catalog(db, &profiles).await?;
    Ok(())
}

pub async fn create_role(db: &MongoDB, request: &CreateRoleRequest) -> Result<JobRole, AppError> {
    let mut role = new_role(role_record(request)?, false);

    match db.collection::<JobRole>(JOB_ROLES).insert_one(&role).await {
        Ok(result) => role.id = result.inserted_id.as_object_id(),
        Err(e) if is_duplicate_key(&e) => {
            return Err(AppError::Conflict(format!("Role '{}' already exists", role.title)));
        }
        Err(e) => return Err(e.into()),
    }

    log::info!("✅ Role created: {} ({} skills)", role.title, role.skills.len());
    refresh_catalog(db).await?;

    Ok(role)
}

pub async fn delete_role(db: &MongoDB, role_id: &str) -> Result<(), AppError> {
    let oid = parse_object_id(role_id, "role")?;

    let result = db
        .collection::<JobRole>(JOB_ROLES)
        .delete_one(doc! { "_id": oid })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::not_found(format!("Role {} not found", role_id)));
    }

    log::info!("🗑️ Role {} deleted", role_id);
    refresh_catalog(db).await?;

    Ok(())
}

/// Insere os cargos do dataset que ainda não existem (por título)
pub async fn import_records(db: &MongoDB, records: Vec<RoleRecord>) -> Result<usize, AppError> {
    let collection = db.collection::<JobRole>(JOB_ROLES);

    let existing: Vec<JobRole> = collection.find(doc! {}).await?.try_collect().await?;
    let known: std::collections::HashSet<String> =
        existing.into_iter().map(|r| r.normalized_title).collect();

    let roles: Vec<JobRole> = records
        .into_iter()
        .map(|record| new_role(record, true))
        .filter(|role| !known.contains(&role.normalized_title))
        .collect();

    if roles.is_empty() {
        return Ok(0);
    }

    let inserted = collection.insert_many(&roles).await?.inserted_ids.len();
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, skills: &[&str]) -> CreateRoleRequest {
        CreateRoleRequest {
            title: title.to_string(),
            category: None,
            description: Some("  ".to_string()),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_role_record_normalizes_input() {
        let record = role_record(&request("  Platform   Engineer ", &["K8s", "kubernetes", "Go"])).unwrap();
        assert_eq!(record.title, "Platform Engineer");
        assert_eq!(record.category, "General");
        assert_eq!(record.description, None);
        assert_eq!(record.skills, vec!["kubernetes", "go"]);
    }

    #[test]
    fn test_role_record_rejects_empty_input() {
        assert!(matches!(role_record(&request(" ", &["python"])), Err(AppError::BadRequest(_))));
        assert!(matches!(role_record(&request("Analyst", &[" ", ""])), Err(AppError::Unprocessable(_))));
    }

    #[test]
    fn test_role_query_filter_and_limit() {
        let query = RoleQuery {
            search: Some("data (sr)".to_string()),
            category: Some("Data".to_string()),
            limit: Some(1000),
            offset: None,
        };
        let filter = query.filter();
        let title = filter.get_document("title").unwrap();
        assert_eq!(title.get_str("$regex").unwrap(), r"data \(sr\)");
        assert_eq!(filter.get_document("category").unwrap().get_str("$regex").unwrap(), "^Data$");
        assert_eq!(query.limit(), MAX_ROLE_LIMIT);

        let empty = RoleQuery::default();
        assert!(empty.filter().is_empty());
        assert_eq!(empty.limit(), DEFAULT_ROLE_LIMIT);
    }

    #[test]
    fn test_new_role_sets_normalized_title() {
        let role = new_role(
            RoleRecord {
                title: "Data  Scientist".to_string(),
                category: "Data".to_string(),
                description: None,
                skills: vec!["python".to_string()],
            },
            true,
        );
        assert_eq!(role.normalized_title, "data scientist");
        assert!(role.is_default);
    }
}
