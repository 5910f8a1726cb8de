//! Pontuação estilo ATS (Applicant Tracking System) de um currículo.
//!
//! score = 50% cobertura de palavras-chave + 30% seções + 20% tamanho

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::parser::{detect_sections, SectionKind};
use crate::matching::similarity::{match_percentage, round2};

const KEYWORD_WEIGHT: f64 = 50.0;
const SECTION_WEIGHT: f64 = 30.0;
const LENGTH_WEIGHT: f64 = 20.0;

/// Sem cargo alvo, este número de skills reconhecidas conta como cobertura total
const FULL_COVERAGE_SKILLS: f64 = 15.0;

const MIN_WORDS: usize = 300;
const MAX_WORDS: usize = 1000;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap();
    static ref PHONE: Regex = Regex::new(r"\+?\d[\d \t().-]{7,}\d").unwrap();
}

/// Telefones têm entre 9 e 15 dígitos; "2019 - 2023" não conta
const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 9..=15;

fn has_phone(text: &str) -> bool {
    PHONE
        .find_iter(text)
        .any(|m| PHONE_DIGITS.contains(&m.as_str().chars().filter(char::is_ascii_digit).count()))
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SectionPresence {
    pub contact: bool,
    pub experience: bool,
    pub education: bool,
    pub skills: bool,
}

impl SectionPresence {
    fn ratio(&self) -> f64 {
        [self.contact, self.experience, self.education, self.skills]
            .iter()
            .filter(|p| **p)
            .count() as f64
            / 4.0
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AtsScore {
    /// 0 – 100
    pub score: u32,
    pub keyword_score: f64,
    pub section_score: f64,
    pub length_score: f64,
    pub word_count: usize,
    pub sections: SectionPresence,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub tips: Vec<String>,
}

fn length_ratio(words: usize) -> f64 {
    if words < MIN_WORDS {
        words as f64 / MIN_WORDS as f64
    } else if words <= MAX_WORDS {
        1.0
    } else {
        (MAX_WORDS as f64 / words as f64).max(0.0)
    }
}

/// `skills`: skills extraídas do currículo (normalizadas).
/// `vocabulary`: catálogo; sem cargo alvo, só skills dele contam como cobertura.
/// `role_skills`: requisitos do cargo alvo, quando houver.
pub fn ats_score(
    text: &str,
    skills: &[String],
    vocabulary: &HashSet<String>,
    role_skills: Option<&[String]>,
) -> AtsScore {
    let found: HashSet<String> = skills.iter().cloned().collect();

    let (keyword_ratio, matched, missing) = match role_skills {
        Some(required) if !required.is_empty() => {
            let required_set: HashSet<String> = required.iter().cloned().collect();
            let mut matched: Vec<String> = required_set.intersection(&found).cloned().collect();
            let mut missing: Vec<String> = required_set.difference(&found).cloned().collect();
            matched.sort();
            missing.sort();
            (match_percentage(&found, &required_set) / 100.0, matched, missing)
        }
        _ => {
            let mut matched: Vec<String> = found.intersection(vocabulary).cloned().collect();
            matched.sort();
            ((matched.len() as f64 / FULL_COVERAGE_SKILLS).min(1.0), matched, Vec::new())
        }
    };

    let detected = detect_sections(text);
    let sections = SectionPresence {
        contact: EMAIL.is_match(text) || has_phone(text),
        experience: detected.contains(&SectionKind::Experience),
        education: detected.contains(&SectionKind::Education),
        skills: detected.contains(&SectionKind::Skills),
    };

    let word_count = text.split_whitespace().count();

    let keyword_score = keyword_ratio * KEYWORD_WEIGHT;
    let section_score = sections.ratio() * SECTION_WEIGHT;
    let length_score = length_ratio(word_count) * LENGTH_WEIGHT;
    let score = (keyword_score + section_score + length_score).round().clamp(0.0, 100.0) as u32;

    let mut tips = Vec::new();
    if !sections.contact {
        tips.push("Add an email address or phone number at the top of your resume.".to_string());
    }
    if !sections.skills {
        tips.push("Add a dedicated \"Skills\" section so ATS parsers can find your skills.".to_string());
    }
    if !sections.experience {
        tips.push("Add an \"Experience\" section describing your work history.".to_string());
    }
    if !sections.education {
        tips.push("Add an \"Education\" section.".to_string());
    }
    if word_count < MIN_WORDS {
        tips.push(format!(
            "Your resume has {} words; aim for {}-{} words with concrete achievements.",
            word_count, MIN_WORDS, MAX_WORDS
        ));
    } else if word_count > MAX_WORDS {
        tips.push(format!(
            "Your resume has {} words; consider trimming it below {}.",
            word_count, MAX_WORDS
        ));
    }
    if !missing.is_empty() {
        let top: Vec<&str> = missing.iter().take(5).map(String::as_str).collect();
        tips.push(format!("Add evidence of these required skills: {}.", top.join(", ")));
    }

    AtsScore {
        score,
        keyword_score: round2(keyword_score),
        section_score: round2(section_score),
        length_score: round2(length_score),
        word_count,
        sections,
        matched_keywords: matched,
        missing_keywords: missing,
        tips,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn vocabulary(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_complete_resume_scores_high() {
        let text = format!(
            "Jane Doe\njane@example.com\nSkills\nPython, SQL\nExperience\n{}\nEducation\nBSc",
            words(400)
        );
        let role = skills(&["python", "sql"]);
        let score = ats_score(&text, &skills(&["python", "sql"]), &HashSet::new(), Some(&role));

        assert_eq!(score.score, 100);
        assert!(score.sections.contact);
        assert!(score.missing_keywords.is_empty());
        assert!(score.tips.is_empty());
    }

    #[test]
    fn test_missing_role_keywords_lower_score() {
        let text = format!("jane@example.com\nSkills\nPython\nExperience\nEducation\n{}", words(500));
        let role = skills(&["python", "sql", "docker", "aws"]);
        let score = ats_score(&text, &skills(&["python"]), &HashSet::new(), Some(&role));

        // 25% de 50 + 30 + 20
        assert_eq!(score.keyword_score, 12.5);
        assert_eq!(score.score, 63);
        assert_eq!(score.missing_keywords, vec!["aws", "docker", "sql"]);
        assert!(score.tips.iter().any(|t| t.contains("aws, docker, sql")));
    }

    #[test]
    fn test_short_resume_without_sections() {
        let score = ats_score("python developer", &skills(&["python"]), &vocabulary(&["python"]), None);

        assert!(!score.sections.contact);
        assert_eq!(score.section_score, 0.0);
        assert!(score.score < 20);
        assert_eq!(score.tips.len(), 5);
    }

    #[test]
    fn test_year_ranges_are_not_phone_numbers() {
        let score = ats_score("Experience\nAcme 2019 - 2023\nEducation\n", &[], &HashSet::new(), None);
        assert!(!score.sections.contact);
        assert!(score.tips.iter().any(|t| t.contains("email address or phone")));

        assert!(has_phone("Call +1 (555) 123-4567"));
        assert!(has_phone("Tel: 11 98765 4321"));
        assert!(!has_phone("2015-2017 and 2018 - 2020"));
    }

    #[test]
    fn test_coverage_without_role_counts_only_vocabulary() {
        let vocab = vocabulary(&["python", "sql"]);
        let base = ats_score("Skills\nPython, SQL", &skills(&["python", "sql"]), &vocab, None);
        let padded = ats_score(
            "Skills\nPython, SQL, acme corp 2019, built dashboards",
            &skills(&["python", "sql", "acme corp 2019", "built dashboards"]),
            &vocab,
            None,
        );

        assert_eq!(base.keyword_score, padded.keyword_score);
        assert_eq!(padded.matched_keywords, vec!["python", "sql"]);
    }

    #[test]
    fn test_length_ratio() {
        assert_eq!(length_ratio(150), 0.5);
        assert_eq!(length_ratio(600), 1.0);
        assert_eq!(length_ratio(2000), 0.5);
    }
}
