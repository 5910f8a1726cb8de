//! Comparação de skills do usuário com os requisitos dos cargos.

pub mod analyzer;
pub mod normalize;
pub mod similarity;
pub mod suggestions;
pub mod weights;

pub use analyzer::{analyze, rank_roles, GapReport, RankOptions, RoleMatch};
pub use normalize::{display_name, normalize_skill, normalize_skills, parse_skill_list, skill_set, split_skill_list};
pub use suggestions::{Priority, Suggestion};
pub use weights::SkillWeights;

/// Visão mínima de um cargo usada pelo matching (skills já normalizadas)
#[derive(Debug, Clone)]
pub struct RoleProfile {
    pub id: String,
    pub title: String,
    pub category: String,
    pub skills: Vec<String>,
}
