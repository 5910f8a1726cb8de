//! Identificação de seções e extração de skills do texto do currículo.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matching::{display_name, normalize_skill};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Skills,
    Experience,
    Education,
    Projects,
    Certifications,
    Summary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSource {
    Section,
    Keyword,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExtractedSkill {
    pub name: String,
    pub display_name: String,
    pub source: ExtractionSource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExtractedSkills {
    pub skills: Vec<ExtractedSkill>,
    pub skills_section_found: bool,
}

impl ExtractedSkills {
    pub fn names(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.name.clone()).collect()
    }
}

const SKILL_HEADINGS: &[&str] = &[
    "skills",
    "technical skills",
    "key skills",
    "core skills",
    "core competencies",
    "competencies",
    "technologies",
    "tech stack",
    "skills & tools",
    "skills and tools",
    "technical proficiencies",
    "tools & technologies",
    "tools and technologies",
];

const SECTION_HEADINGS: &[(&str, SectionKind)] = &[
    ("experience", SectionKind::Experience),
    ("work experience", SectionKind::Experience),
    ("professional experience", SectionKind::Experience),
    ("employment history", SectionKind::Experience),
    ("work history", SectionKind::Experience),
    ("internships", SectionKind::Experience),
    ("education", SectionKind::Education),
    ("academic background", SectionKind::Education),
    ("qualifications", SectionKind::Education),
    ("projects", SectionKind::Projects),
    ("personal projects", SectionKind::Projects),
    ("academic projects", SectionKind::Projects),
    ("certifications", SectionKind::Certifications),
    ("certificates", SectionKind::Certifications),
    ("licenses & certifications", SectionKind::Certifications),
    ("summary", SectionKind::Summary),
    ("professional summary", SectionKind::Summary),
    ("profile", SectionKind::Summary),
    ("objective", SectionKind::Summary),
    ("career objective", SectionKind::Summary),
    ("about me", SectionKind::Summary),
    ("awards", SectionKind::Other),
    ("achievements", SectionKind::Other),
    ("publications", SectionKind::Other),
    ("languages", SectionKind::Other),
    ("interests", SectionKind::Other),
    ("hobbies", SectionKind::Other),
    ("references", SectionKind::Other),
    ("volunteer", SectionKind::Other),
    ("volunteering", SectionKind::Other),
    ("contact", SectionKind::Other),
];

/// Palavras curtas demais para busca por palavra-chave no texto corrido
const AMBIGUOUS: &[&str] = &["go", "r", "c"];

const MAX_NGRAM: usize = 4;
const MAX_ITEM_WORDS: usize = 5;
const MAX_ITEM_CHARS: usize = 40;

/// Se a linha é um título de seção, retorna o tipo e o conteúdo após ":"
fn heading_of(line: &str) -> Option<(SectionKind, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (head, rest) = match trimmed.find(':') {
        Some(idx) => (&trimmed[..idx], trimmed[idx + 1..].trim()),
        None => (trimmed, ""),
    };

    let head = head
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '&')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if head.is_empty() || head.split(' ').count() > 4 {
        return None;
    }

    if SKILL_HEADINGS.contains(&head.as_str()) {
        return Some((SectionKind::Skills, rest));
    }

    SECTION_HEADINGS
        .iter()
        .find(|(name, _)| *name == head)
        .map(|(_, kind)| (*kind, rest))
}

/// Tipos de seção presentes no texto
pub fn detect_sections(text: &str) -> HashSet<SectionKind> {
    text.lines()
        .filter_map(heading_of)
        .map(|(kind, _)| kind)
        .collect()
}

/// Linhas pertencentes às seções de skills
fn skills_section_lines(text: &str) -> (bool, Vec<&str>) {
    let mut found = false;
    let mut inside = false;
    let mut lines = Vec::new();

    for line in text.lines() {
        match heading_of(line) {
            Some((SectionKind::Skills, rest)) => {
                found = true;
                inside = true;
                if !rest.is_empty() {
                    lines.push(rest);
                }
            }
            // "Languages: Python, Java" dentro da seção é um sub-rótulo;
            // Experience, Education etc. sempre encerram a seção
            Some((SectionKind::Other, rest)) if inside && !rest.is_empty() => lines.push(line),
            Some(_) => inside = false,
            None if inside => lines.push(line),
            None => {}
        }
    }

    (found, lines)
}

/// Itens de uma linha da seção; "Languages: Python, Java" usa só o que vem
/// após o rótulo curto
fn section_items(line: &str) -> Vec<(String, String)> {
    let content = match line.find(':') {
        Some(idx) if line[..idx].split_whitespace().count() <= 3 => &line[idx + 1..],
        _ => line,
    };

    content
        .split(|c: char| matches!(c, ',' | ';' | '|' | '•' | '·'))
        .filter_map(|raw| {
            let shown = display_name(raw);
            if shown.is_empty()
                || shown.chars().count() > MAX_ITEM_CHARS
                || shown.split_whitespace().count() > MAX_ITEM_WORDS
            {
                return None;
            }
            normalize_skill(raw).map(|name| (name, shown))
        })
        .collect()
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| {
        c.is_whitespace()
            || matches!(
                c,
                ',' | ';' | ':' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '"' | '!' | '?' | '•' | '·'
            )
    })
    .filter(|t| !t.is_empty())
    .collect()
}

/// Skills do vocabulário mencionadas no texto, em ordem de aparição.
/// Usa n-gramas normalizados, então aliases ("JS", "k8s") também contam.
pub fn keyword_skills(text: &str, vocabulary: &HashSet<String>) -> Vec<(String, String)> {
    let tokens = tokenize(text);
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for start in 0..tokens.len() {
        for n in (1..=MAX_NGRAM).rev() {
            if start + n > tokens.len() {
                continue;
            }
            let phrase = tokens[start..start + n].join(" ");
            let Some(name) = normalize_skill(&phrase) else {
                continue;
            };
            if AMBIGUOUS.contains(&name.as_str()) || !vocabulary.contains(&name) {
                continue;
            }
            if seen.insert(name.clone()) {
                found.push((name, display_name(&phrase)));
            }
            break;
        }
    }

    found
}

/// Seção "Skills" primeiro (itens declarados, mesmo fora do vocabulário),
/// depois as palavras-chave do vocabulário encontradas no texto todo
pub fn extract_skills(text: &str, vocabulary: &HashSet<String>) -> ExtractedSkills {
    let (section_found, lines) = skills_section_lines(text);

    let mut seen = HashSet::new();
    let mut skills = Vec::new();

    for line in lines {
        for (name, shown) in section_items(line) {
            if seen.insert(name.clone()) {
                skills.push(ExtractedSkill {
                    name,
                    display_name: shown,
                    source: ExtractionSource::Section,
                });
            }
        }
    }

    for (name, shown) in keyword_skills(text, vocabulary) {
        if seen.insert(name.clone()) {
            skills.push(ExtractedSkill {
                name,
                display_name: shown,
                source: ExtractionSource::Keyword,
            });
        }
    }

    ExtractedSkills {
        skills,
        skills_section_found: section_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\n\
        jane@example.com | +1 555 123 4567\n\
        \n\
        SUMMARY\n\
        Backend engineer who likes to go fast with JS and k8s.\n\
        \n\
        Technical Skills:\n\
        Languages: Python, Rust, SQL\n\
        • Docker • CI/CD\n\
        Tools: Git, Jira\n\
        \n\
        Experience\n\
        Built REST APIs with Node.js and PostgreSQL on AWS.\n\
        \n\
        Education\n\
        B.Sc. Computer Science\n";

    fn vocabulary() -> HashSet<String> {
        [
            "python", "sql", "docker", "git", "javascript", "kubernetes", "node.js",
            "postgresql", "aws", "rest api", "go", "machine learning",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_heading_detection() {
        assert_eq!(heading_of("SKILLS").map(|h| h.0), Some(SectionKind::Skills));
        assert_eq!(heading_of("Technical Skills:").map(|h| h.0), Some(SectionKind::Skills));
        assert_eq!(heading_of("Work Experience").map(|h| h.0), Some(SectionKind::Experience));
        assert_eq!(heading_of("## Education ##").map(|h| h.0), Some(SectionKind::Education));
        assert_eq!(heading_of("Skills: Python, SQL").map(|h| h.1), Some("Python, SQL"));
        assert!(heading_of("I have many skills in programming").is_none());
    }

    #[test]
    fn test_detect_sections() {
        let sections = detect_sections(RESUME);
        assert!(sections.contains(&SectionKind::Skills));
        assert!(sections.contains(&SectionKind::Experience));
        assert!(sections.contains(&SectionKind::Education));
        assert!(sections.contains(&SectionKind::Summary));
        assert!(!sections.contains(&SectionKind::Projects));
    }

    #[test]
    fn test_extract_skills_section_then_keywords() {
        let extracted = extract_skills(RESUME, &vocabulary());
        assert!(extracted.skills_section_found);

        let section: Vec<&str> = extracted
            .skills
            .iter()
            .filter(|s| s.source == ExtractionSource::Section)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(section, vec!["python", "rust", "sql", "docker", "ci/cd", "git", "jira"]);

        let keywords: Vec<&str> = extracted
            .skills
            .iter()
            .filter(|s| s.source == ExtractionSource::Keyword)
            .map(|s| s.name.as_str())
            .collect();
        // "go" é ambíguo e fica de fora; aliases resolvidos
        assert_eq!(
            keywords,
            vec!["javascript", "kubernetes", "rest api", "node.js", "postgresql", "aws"]
        );
    }

    #[test]
    fn test_extract_without_skills_section() {
        let text = "Experienced in Machine Learning and Python.\nLoves docker.";
        let extracted = extract_skills(text, &vocabulary());
        assert!(!extracted.skills_section_found);
        assert_eq!(extracted.names(), vec!["machine learning", "python", "docker"]);
    }

    #[test]
    fn test_labeled_heading_closes_skills_section() {
        let text = "Skills\nPython, SQL\nExperience: Acme Corp 2019\nBuilt dashboards\nEducation: BSc Physics\n";
        let extracted = extract_skills(text, &HashSet::new());
        assert_eq!(extracted.names(), vec!["python", "sql"]);
    }

    #[test]
    fn test_other_label_stays_inside_skills_section() {
        let text = "Skills\nLanguages: Python, Rust\nTools: Git\nProjects\nTodo app\n";
        let extracted = extract_skills(text, &HashSet::new());
        assert_eq!(extracted.names(), vec!["python", "rust", "git"]);
    }

    #[test]
    fn test_long_sentences_are_not_items() {
        let items = section_items("I am passionate about building scalable distributed systems at scale");
        assert!(items.is_empty());
    }
}
