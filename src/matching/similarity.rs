//! Fórmulas de similaridade entre conjuntos de skills.
//!
//! Todas recebem conjuntos já normalizados; ordem e duplicados não afetam o
//! resultado.

use std::collections::{HashMap, HashSet};

use super::weights::SkillWeights;

/// |U ∩ R| / |R| × 100. Cargo sem requisitos retorna 0.
pub fn match_percentage(user: &HashSet<String>, role: &HashSet<String>) -> f64 {
    if role.is_empty() {
        return 0.0;
    }
    let matched = role.intersection(user).count();
    matched as f64 / role.len() as f64 * 100.0
}

/// Σ w(s) das skills atendidas / Σ w(s) de todas as exigidas × 100
pub fn weighted_match_percentage(
    user: &HashSet<String>,
    role: &HashSet<String>,
    weights: &SkillWeights,
) -> f64 {
    let total: f64 = role.iter().map(|s| weights.weight(s)).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let matched: f64 = role
        .intersection(user)
        .map(|s| weights.weight(s))
        .sum();
    matched / total * 100.0
}

/// |A ∩ B| / |A ∪ B|
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Vetor bag-of-skills ponderado
pub fn skill_vector(skills: &HashSet<String>, weights: &SkillWeights) -> HashMap<String, f64> {
    skills
        .iter()
        .map(|s| (s.clone(), weights.weight(s)))
        .collect()
}

pub fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(k, v)| large.get(k).map(|w| v * w))
        .sum();

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Arredonda para duas casas na fronteira de apresentação
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::normalize::skill_set;

    #[test]
    fn test_match_percentage_formula() {
        let user = skill_set(["python", "sql"]);
        let role = skill_set(["python", "sql", "docker", "aws"]);
        assert_eq!(match_percentage(&user, &role), 50.0);
    }

    #[test]
    fn test_match_percentage_order_and_duplicates_independent() {
        let a = skill_set(["SQL", "python", "Python", "docker"]);
        let b = skill_set(["docker", "python", "sql"]);
        let role = skill_set(["aws", "python", "docker"]);
        assert_eq!(match_percentage(&a, &role), match_percentage(&b, &role));
    }

    #[test]
    fn test_match_percentage_bounds() {
        let role = skill_set(["python", "sql"]);
        let superset = skill_set(["python", "sql", "rust"]);
        let disjoint = skill_set(["java"]);

        assert_eq!(match_percentage(&superset, &role), 100.0);
        assert_eq!(match_percentage(&disjoint, &role), 0.0);
        assert_eq!(match_percentage(&superset, &HashSet::new()), 0.0);
    }

    #[test]
    fn test_weighted_equals_plain_under_uniform_weights() {
        let user = skill_set(["python", "git"]);
        let role = skill_set(["python", "git", "docker"]);
        let plain = match_percentage(&user, &role);
        let weighted = weighted_match_percentage(&user, &role, &SkillWeights::uniform());
        assert!((plain - weighted).abs() < 1e-9);
    }

    #[test]
    fn test_jaccard_symmetric_and_bounded() {
        let a = skill_set(["python", "sql", "git"]);
        let b = skill_set(["python", "docker"]);
        let j = jaccard(&a, &b);
        assert!((j - 0.25).abs() < 1e-9);
        assert_eq!(j, jaccard(&b, &a));
        assert_eq!(jaccard(&HashSet::new(), &HashSet::new()), 0.0);
    }

    #[test]
    fn test_cosine_identical_and_disjoint() {
        let weights = SkillWeights::uniform();
        let a = skill_vector(&skill_set(["python", "sql"]), &weights);
        let b = skill_vector(&skill_set(["sql", "python"]), &weights);
        let c = skill_vector(&skill_set(["java"]), &weights);

        assert!((cosine(&a, &b) - 1.0).abs() < 1e-9);
        assert_eq!(cosine(&a, &c), 0.0);
        assert_eq!(cosine(&a, &HashMap::new()), 0.0);
    }

    #[test]
    fn test_cosine_partial_overlap() {
        let weights = SkillWeights::uniform();
        let a = skill_vector(&skill_set(["python", "sql"]), &weights);
        let b = skill_vector(&skill_set(["python", "docker"]), &weights);
        // 1 / (sqrt(2) * sqrt(2))
        assert!((cosine(&a, &b) - 0.5).abs() < 1e-9);
        assert_eq!(cosine(&a, &b), cosine(&b, &a));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666666), 66.67);
        assert_eq!(round2(33.333333), 33.33);
    }
}
