use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::similarity::{cosine, jaccard, match_percentage, round2, skill_vector, weighted_match_percentage};
use super::suggestions::{suggest, Suggestion};
use super::weights::SkillWeights;
use super::RoleProfile;

pub const DEFAULT_RANK_LIMIT: usize = 10;
pub const MAX_RANK_LIMIT: usize = 100;

/// Resultado da comparação entre as skills do usuário e um cargo
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GapReport {
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub extra_skills: Vec<String>,
    pub match_percentage: f64,
    pub weighted_percentage: f64,
    pub jaccard: f64,
    pub cosine: f64,
    pub verdict: String,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RoleMatch {
    pub role_id: String,
    pub title: String,
    pub category: String,
    pub match_percentage: f64,
    pub weighted_percentage: f64,
    pub matched_count: usize,
    pub required_count: usize,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RankOptions {
    pub limit: Option<usize>,
    pub min_percentage: Option<f64>,
    pub category: Option<String>,
}

pub fn verdict(match_percentage: f64) -> &'static str {
    if match_percentage >= 80.0 {
        "strong match"
    } else if match_percentage >= 50.0 {
        "partial match"
    } else {
        "significant gap"
    }
}

/// Faltantes ordenadas por peso desc, nome asc
fn order_by_weight(mut skills: Vec<String>, weights: &SkillWeights) -> Vec<String> {
    skills.sort_by(|a, b| {
        weights
            .weight(b)
            .partial_cmp(&weights.weight(a))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cmp(b))
    });
    skills
}

fn sorted(set: impl Iterator<Item = String>) -> Vec<String> {
    let mut v: Vec<String> = set.collect();
    v.sort();
    v
}

pub fn analyze(user: &HashSet<String>, role_skills: &HashSet<String>, weights: &SkillWeights) -> GapReport {
    let matched = sorted(role_skills.intersection(user).cloned());
    let missing = order_by_weight(role_skills.difference(user).cloned().collect(), weights);
    let extra = sorted(user.difference(role_skills).cloned());

    let percentage = match_percentage(user, role_skills);
    let weighted = weighted_match_percentage(user, role_skills, weights);
    let cos = cosine(&skill_vector(user, weights), &skill_vector(role_skills, weights));

    GapReport {
        suggestions: suggest(&missing, weights),
        matched_skills: matched,
        missing_skills: missing,
        extra_skills: extra,
        match_percentage: round2(percentage),
        weighted_percentage: round2(weighted),
        jaccard: round2(jaccard(user, role_skills)),
        cosine: round2(cos),
        verdict: verdict(percentage).to_string(),
    }
}

/// Ranqueia os cargos: % desc, % ponderado desc, título asc
pub fn rank_roles(
    user: &HashSet<String>,
    roles: &[RoleProfile],
    weights: &SkillWeights,
    options: &RankOptions,
) -> Vec<RoleMatch> {
    let limit = options
        .limit
        .unwrap_or(DEFAULT_RANK_LIMIT)
        .clamp(1, MAX_RANK_LIMIT);
    let min = options.min_percentage.unwrap_or(0.0);
    let category = options.category.as_ref().map(|c| c.to_lowercase());

    let mut matches: Vec<(f64, f64, RoleMatch)> = roles
        .iter()
        .filter(|role| match &category {
            Some(c) => role.category.to_lowercase() == *c,
            None => true,
        })
        .filter_map(|role| {
            let required: HashSet<String> = role.skills.iter().cloned().collect();
            let pct = match_percentage(user, &required);
            if pct < min {
                return None;
            }
            let weighted = weighted_match_percentage(user, &required, weights);
            let missing = order_by_weight(required.difference(user).cloned().collect(), weights);

            Some((
                pct,
                weighted,
                RoleMatch {
                    role_id: role.id.clone(),
                    title: role.title.clone(),
                    category: role.category.clone(),
                    match_percentage: round2(pct),
                    weighted_percentage: round2(weighted),
                    matched_count: required.intersection(user).count(),
                    required_count: required.len(),
                    missing_skills: missing,
                },
            ))
        })
        .collect();

    matches.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.2.title.cmp(&b.2.title))
    });

    matches.into_iter().take(limit).map(|(_, _, m)| m).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::normalize::skill_set;

    fn role(title: &str, category: &str, skills: &[&str]) -> RoleProfile {
        RoleProfile {
            id: title.to_lowercase().replace(' ', "-"),
            title: title.to_string(),
            category: category.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_analyze_partitions_skills() {
        let user = skill_set(["Python", "SQL", "Excel"]);
        let role_skills = skill_set(["python", "sql", "docker", "aws"]);
        let report = analyze(&user, &role_skills, &SkillWeights::uniform());

        assert_eq!(report.matched_skills, vec!["python", "sql"]);
        assert_eq!(report.missing_skills, vec!["aws", "docker"]);
        assert_eq!(report.extra_skills, vec!["excel"]);
        assert_eq!(report.match_percentage, 50.0);
        assert_eq!(report.weighted_percentage, 50.0);
        assert_eq!(report.verdict, "partial match");
        assert_eq!(report.suggestions.len(), 2);
    }

    #[test]
    fn test_analyze_full_match() {
        let user = skill_set(["python", "sql", "git"]);
        let role_skills = skill_set(["python", "sql"]);
        let report = analyze(&user, &role_skills, &SkillWeights::uniform());

        assert_eq!(report.match_percentage, 100.0);
        assert!(report.missing_skills.is_empty());
        assert!(report.suggestions.is_empty());
        assert_eq!(report.verdict, "strong match");
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(verdict(80.0), "strong match");
        assert_eq!(verdict(79.99), "partial match");
        assert_eq!(verdict(50.0), "partial match");
        assert_eq!(verdict(0.0), "significant gap");
    }

    #[test]
    fn test_rank_roles_ordering_and_ties() {
        let roles = vec![
            role("Zeta Engineer", "Engineering", &["python", "sql"]),
            role("Alpha Engineer", "Engineering", &["python", "sql"]),
            role("Designer", "Design", &["figma", "css"]),
            role("Data Analyst", "Data", &["python", "sql", "excel", "tableau"]),
        ];
        let weights = SkillWeights::from_roles(&roles);
        let user = skill_set(["python", "sql"]);

        let ranked = rank_roles(&user, &roles, &weights, &RankOptions::default());
        let titles: Vec<&str> = ranked.iter().map(|r| r.title.as_str()).collect();

        assert_eq!(titles, vec!["Alpha Engineer", "Zeta Engineer", "Data Analyst", "Designer"]);
        assert_eq!(ranked[0].match_percentage, 100.0);
        assert_eq!(ranked[2].match_percentage, 50.0);
        assert_eq!(ranked[3].match_percentage, 0.0);
    }

    #[test]
    fn test_rank_roles_filters() {
        let roles = vec![
            role("Backend", "Engineering", &["python", "sql"]),
            role("Frontend", "Engineering", &["javascript", "css"]),
            role("Analyst", "Data", &["sql", "excel"]),
        ];
        let weights = SkillWeights::from_roles(&roles);
        let user = skill_set(["python", "sql"]);

        let options = RankOptions {
            limit: Some(5),
            min_percentage: Some(50.0),
            category: Some("engineering".into()),
        };
        let ranked = rank_roles(&user, &roles, &weights, &options);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "Backend");

        let limited = rank_roles(
            &user,
            &roles,
            &weights,
            &RankOptions { limit: Some(1), ..Default::default() },
        );
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_rank_roles_limit_is_clamped() {
        let roles: Vec<RoleProfile> = (0..150)
            .map(|i| role(&format!("Role {:03}", i), "Engineering", &["python"]))
            .collect();
        let weights = SkillWeights::from_roles(&roles);
        let user = skill_set(["python"]);
        let rank = |limit: Option<usize>| rank_roles(&user, &roles, &weights, &RankOptions { limit, ..Default::default() });

        assert_eq!(rank(None).len(), DEFAULT_RANK_LIMIT);
        assert_eq!(rank(Some(0)).len(), 1);
        assert_eq!(rank(Some(500)).len(), MAX_RANK_LIMIT);
        // empate total: ordem por título
        assert_eq!(rank(None)[0].title, "Role 000");
    }
}
