use std::collections::{HashMap, HashSet};

use super::RoleProfile;

/// Importância de cada skill no dataset: frequência por documento (quantos
/// cargos exigem a skill) e IDF suavizado.
#[derive(Debug, Clone, Default)]
pub struct SkillWeights {
    role_count: usize,
    frequencies: HashMap<String, usize>,
    idf: HashMap<String, f64>,
}

impl SkillWeights {
    pub fn from_roles(roles: &[RoleProfile]) -> Self {
        let mut frequencies: HashMap<String, usize> = HashMap::new();

        for role in roles {
            // cada cargo conta no máximo uma vez por skill
            let unique: HashSet<&String> = role.skills.iter().collect();
            for skill in unique {
                *frequencies.entry(skill.clone()).or_insert(0) += 1;
            }
        }

        let n = roles.len() as f64;
        let idf = frequencies
            .iter()
            .map(|(skill, df)| (skill.clone(), ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0))
            .collect();

        Self {
            role_count: roles.len(),
            frequencies,
            idf,
        }
    }

    /// Pesos uniformes (todas as skills valem 1.0)
    pub fn uniform() -> Self {
        Self::default()
    }

    pub fn weight(&self, skill: &str) -> f64 {
        self.idf.get(skill).copied().unwrap_or(1.0)
    }

    pub fn frequency(&self, skill: &str) -> usize {
        self.frequencies.get(skill).copied().unwrap_or(0)
    }

    pub fn role_count(&self) -> usize {
        self.role_count
    }

    pub fn skill_count(&self) -> usize {
        self.frequencies.len()
    }

    /// Skills mais demandadas: frequência desc, nome asc
    pub fn top_skills(&self, n: usize) -> Vec<(String, usize)> {
        let mut all: Vec<(String, usize)> = self
            .frequencies
            .iter()
            .map(|(s, f)| (s.clone(), *f))
            .collect();
        all.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        all.truncate(n);
        all
    }

    pub fn skills(&self) -> impl Iterator<Item = &String> {
        self.frequencies.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(title: &str, skills: &[&str]) -> RoleProfile {
        RoleProfile {
            id: title.to_lowercase(),
            title: title.to_string(),
            category: "Engineering".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_frequency_counts_roles_not_mentions() {
        let roles = vec![
            role("Backend", &["python", "sql", "docker"]),
            role("Data", &["python", "sql", "statistics"]),
            role("Frontend", &["javascript", "css"]),
        ];
        let weights = SkillWeights::from_roles(&roles);

        assert_eq!(weights.role_count(), 3);
        assert_eq!(weights.frequency("python"), 2);
        assert_eq!(weights.frequency("css"), 1);
        assert_eq!(weights.frequency("rust"), 0);
    }

    #[test]
    fn test_rare_skills_weigh_more() {
        let roles = vec![
            role("Backend", &["python", "sql", "docker"]),
            role("Data", &["python", "sql", "statistics"]),
            role("ML", &["python", "pytorch"]),
        ];
        let weights = SkillWeights::from_roles(&roles);

        assert!(weights.weight("pytorch") > weights.weight("sql"));
        assert!(weights.weight("sql") > weights.weight("python"));
        // skill presente em todos os cargos ainda tem peso positivo
        assert!((weights.weight("python") - 1.0).abs() < 1e-9);
        // desconhecida usa o padrão
        assert_eq!(weights.weight("cobol"), 1.0);
    }

    #[test]
    fn test_smoothed_idf_values() {
        let roles = vec![
            role("A", &["python", "sql"]),
            role("B", &["python"]),
            role("C", &["python", "rust"]),
            role("D", &["go"]),
        ];
        let weights = SkillWeights::from_roles(&roles);

        // ln((1 + 4) / (1 + df)) + 1
        assert!((weights.weight("python") - ((5.0f64 / 4.0).ln() + 1.0)).abs() < 1e-9);
        assert!((weights.weight("rust") - ((5.0f64 / 2.0).ln() + 1.0)).abs() < 1e-9);
        assert_eq!(weights.skill_count(), 4);
    }

    #[test]
    fn test_top_skills_ordering() {
        let roles = vec![
            role("A", &["sql", "python"]),
            role("B", &["sql", "python", "git"]),
            role("C", &["git", "aws"]),
        ];
        let top = SkillWeights::from_roles(&roles).top_skills(3);
        assert_eq!(
            top,
            vec![
                ("git".to_string(), 2),
                ("python".to_string(), 2),
                ("sql".to_string(), 2)
            ]
        );
    }
}
