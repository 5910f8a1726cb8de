use serde::{Deserialize, Serialize};

use super::weights::SkillWeights;

const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Suggestion {
    pub skill: String,
    pub priority: Priority,
    pub message: String,
}

/// Família da skill, usada para escolher a dica
fn family_hint(skill: &str) -> Option<&'static str> {
    const LANGUAGES: &[&str] = &[
        "python", "java", "javascript", "typescript", "go", "rust", "c++", "c#", "kotlin",
        "swift", "ruby", "php", "scala", "r", "sql",
    ];
    const CLOUD: &[&str] = &["aws", "azure", "gcp", "terraform", "serverless"];
    const DEVOPS: &[&str] = &["docker", "kubernetes", "ci/cd", "jenkins", "ansible", "linux", "git"];
    const DATA: &[&str] = &[
        "machine learning", "deep learning", "statistics", "pandas", "numpy", "tensorflow",
        "pytorch", "scikit-learn", "data visualization", "tableau", "power bi", "spark",
        "excel", "natural language processing", "computer vision",
    ];
    const FRONTEND: &[&str] = &["react", "vue", "angular", "html", "css", "next.js", "redux"];
    const SOFT: &[&str] = &[
        "communication", "leadership", "teamwork", "problem solving", "stakeholder management",
        "project management", "agile", "scrum", "negotiation",
    ];

    if LANGUAGES.contains(&skill) {
        Some("build a small project end to end and solve practice exercises daily")
    } else if CLOUD.contains(&skill) {
        Some("use the provider's free tier to deploy a service and study for an associate-level certification")
    } else if DEVOPS.contains(&skill) {
        Some("containerize and automate the build of one of your existing projects")
    } else if DATA.contains(&skill) {
        Some("work through a public dataset and publish the analysis as a notebook")
    } else if FRONTEND.contains(&skill) {
        Some("rebuild a page you use often and publish it with a live demo")
    } else if SOFT.contains(&skill) {
        Some("look for opportunities to practice it at work or in volunteer projects and ask for feedback")
    } else {
        None
    }
}

/// Uma sugestão por skill faltante. O terço superior dos pesos vira `high`,
/// o terço do meio `medium`, o resto `low`.
pub fn suggest(missing: &[String], weights: &SkillWeights) -> Vec<Suggestion> {
    if missing.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(&String, f64)> = missing.iter().map(|s| (s, weights.weight(s))).collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(b.0)));

    let max = ranked.first().map(|r| r.1).unwrap_or(1.0);
    let min = ranked.last().map(|r| r.1).unwrap_or(1.0);
    let span = max - min;

    let mut suggestions: Vec<Suggestion> = ranked
        .into_iter()
        .map(|(skill, weight)| {
            let priority = if span <= f64::EPSILON {
                Priority::High
            } else {
                let position = (weight - min) / span;
                if position >= 2.0 / 3.0 {
                    Priority::High
                } else if position >= 1.0 / 3.0 {
                    Priority::Medium
                } else {
                    Priority::Low
                }
            };

            let message = match family_hint(skill) {
                Some(hint) => format!("Learn {}: {}.", skill, hint),
                None => format!("Learn {}: follow an introductory course and apply it in a portfolio project.", skill),
            };

            Suggestion {
                skill: skill.clone(),
                priority,
                message,
            }
        })
        .collect();

    suggestions.sort_by(|a, b| a.priority.cmp(&b.priority));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::RoleProfile;

    #[test]
    fn test_empty_missing_list() {
        assert!(suggest(&[], &SkillWeights::uniform()).is_empty());
    }

    #[test]
    fn test_uniform_weights_are_all_high() {
        let missing = vec!["docker".to_string(), "aws".to_string()];
        let suggestions = suggest(&missing, &SkillWeights::uniform());
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions.iter().all(|s| s.priority == Priority::High));
        assert!(suggestions[0].message.starts_with("Learn aws"));
    }

    #[test]
    fn test_rare_skill_gets_high_priority() {
        let roles: Vec<RoleProfile> = vec![
            ("A", vec!["git", "sql", "kubernetes"]),
            ("B", vec!["git", "sql"]),
            ("C", vec!["git"]),
        ]
        .into_iter()
        .map(|(t, s)| RoleProfile {
            id: t.into(),
            title: t.into(),
            category: String::new(),
            skills: s.into_iter().map(String::from).collect(),
        })
        .collect();
        let weights = SkillWeights::from_roles(&roles);

        let missing = vec!["git".to_string(), "sql".to_string(), "kubernetes".to_string()];
        let suggestions = suggest(&missing, &weights);

        assert_eq!(suggestions[0].skill, "kubernetes");
        assert_eq!(suggestions[0].priority, Priority::High);
        assert_eq!(suggestions.last().map(|s| s.priority), Some(Priority::Low));
    }

    #[test]
    fn test_suggestions_are_capped() {
        let missing: Vec<String> = (0..25).map(|i| format!("skill-{}", i)).collect();
        assert_eq!(suggest(&missing, &SkillWeights::uniform()).len(), MAX_SUGGESTIONS);
    }
}
