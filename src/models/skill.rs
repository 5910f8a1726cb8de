use serde::{Deserialize, Serialize};

/// Entrada do catálogo de skills (derivado do dataset de cargos)
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Skill {
    /// Nome normalizado (chave)
    pub name: String,
    pub display_name: String,
    /// Quantos cargos exigem a skill
    pub demand: u32,
    /// Peso IDF no dataset
    pub weight: f64,
}
