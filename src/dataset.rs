//! Leitura do dataset de cargos (CSV ou JSON).

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::matching::{display_name, parse_skill_list};
use crate::utils::AppError;

/// Dataset padrão embutido no binário
const BUNDLED_CSV: &str = include_str!("../data/job_roles.csv");

/// Linha do dataset já normalizada
#[derive(Debug, Clone, PartialEq)]
pub struct RoleRecord {
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub skills: Vec<String>,
}

pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().to_lowercase().replace(' ', "_");
        names.contains(&h.as_str())
    })
}

pub fn parse_csv(content: &str) -> Result<Vec<RoleRecord>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::Unprocessable(format!("Invalid dataset header: {}", e)))?
        .clone();

    let title_col = find_column(&headers, &["title", "job_title", "role", "job_role"])
        .ok_or_else(|| AppError::Unprocessable("Dataset has no title column".to_string()))?;
    let skills_col = find_column(&headers, &["skills", "required_skills", "key_skills"])
        .ok_or_else(|| AppError::Unprocessable("Dataset has no skills column".to_string()))?;
    let category_col = find_column(&headers, &["category", "industry", "field"]);
    let description_col = find_column(&headers, &["description", "job_description"]);

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                log::warn!("⚠️  Skipping dataset row {}: {}", line + 2, e);
                continue;
            }
        };

        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).map(str::trim).unwrap_or("");

        records.push(RoleRecord {
            title: display_name(cell(Some(title_col))),
            category: display_name(cell(category_col)),
            description: Some(cell(description_col).to_string()).filter(|d| !d.is_empty()),
            skills: parse_skill_list(cell(Some(skills_col))),
        });
    }

    Ok(clean(records))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonSkills {
    List(Vec<String>),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct JsonRole {
    #[serde(alias = "job_title", alias = "Job Title")]
    title: String,
    #[serde(default, alias = "industry")]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(alias = "required_skills")]
    skills: JsonSkills,
}

pub fn parse_json(content: &str) -> Result<Vec<RoleRecord>, AppError> {
    let roles: Vec<JsonRole> = serde_json::from_str(content)
        .map_err(|e| AppError::Unprocessable(format!("Invalid dataset JSON: {}", e)))?;

    let records = roles
        .into_iter()
        .map(|r| RoleRecord {
            title: display_name(&r.title),
            category: r.category.map(|c| display_name(&c)).unwrap_or_default(),
            description: r.description.filter(|d| !d.trim().is_empty()),
            skills: match r.skills {
                JsonSkills::List(items) => crate::matching::normalize_skills(items),
                JsonSkills::Text(text) => parse_skill_list(&text),
            },
        })
        .collect();

    Ok(clean(records))
}

/// Remove linhas sem título ou sem skills e funde títulos repetidos (união
/// das skills, mantendo a ordem de aparição)
fn clean(records: Vec<RoleRecord>) -> Vec<RoleRecord> {
    let mut merged: Vec<RoleRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        if record.title.is_empty() {
            log::warn!("⚠️  Skipping dataset row without title");
            continue;
        }
        if record.skills.is_empty() {
            log::warn!("⚠️  Skipping role '{}' without skills", record.title);
            continue;
        }

        let key = normalize_title(&record.title);
        match index.get(&key) {
            Some(&i) => {
                let existing = &mut merged[i];
                for skill in record.skills {
                    if !existing.skills.contains(&skill) {
                        existing.skills.push(skill);
                    }
                }
                if existing.description.is_none() {
                    existing.description = record.description;
                }
                if existing.category.is_empty() {
                    existing.category = record.category;
                }
            }
            None => {
                index.insert(key, merged.len());
                merged.push(record);
            }
        }
    }

    merged
}

/// Carrega o dataset do caminho configurado (extensão decide o formato) ou o
/// dataset embutido
pub fn load(path: Option<&str>) -> Result<Vec<RoleRecord>, AppError> {
    let Some(path) = path else {
        log::info!("📂 Using bundled job role dataset");
        return parse_csv(BUNDLED_CSV);
    };

    log::info!("📂 Loading job role dataset from {}", path);

    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::internal(format!("Failed to read dataset {}: {}", path, e)))?;

    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => parse_json(&content),
        "csv" => parse_csv(&content),
        other => Err(AppError::Unprocessable(format!(
            "Unsupported dataset format: '{}' (expected csv or json)",
            other
        ))),
    }
}
