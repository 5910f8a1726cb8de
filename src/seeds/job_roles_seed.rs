use crate::config::AppConfig;
use crate::database::{MongoDB, JOB_ROLES};
use crate::dataset;
use crate::models::JobRole;
use crate::services::{role_service, skill_service};
use crate::utils::AppError;
use mongodb::bson::doc;

/// Carrega o dataset de cargos no MongoDB e recria o catálogo de skills.
/// Cargos já existentes (mesmo título) são mantidos como estão.
pub async fn seed_job_roles(db: &MongoDB, config: &AppConfig) -> Result<(), AppError> {
    let collection = db.collection::<JobRole>(JOB_ROLES);

    let defaults = collection
        .count_documents(doc! { "is_default": true })
        .await?;

    if defaults == 0 {
        let records = dataset::load(config.dataset_path.as_deref())?;
        log::info!("🌱 Job roles: seeding {} roles from dataset...", records.len());

        let inserted = role_service::import_records(db, records).await?;
        log::info!("   ✅ Inserted {} job roles", inserted);
    } else {
        log::info!("📋 Job roles: {} defaults already in DB, skipping seed", defaults);
    }

    let profiles = role_service::load_profiles(db).await?;
    skill_service::rebuild_catalog(db, &profiles).await?;

    Ok(())
}
