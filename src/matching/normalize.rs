//! Normalização de listas de skills em texto livre.
//!
//! Toda comparação é feita sobre a forma canônica: minúsculas, espaços
//! colapsados, pontuação de borda removida e aliases resolvidos.

use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

lazy_static! {
    static ref ALIASES: HashMap<&'static str, &'static str> = {
        let pairs: &[(&str, &str)] = &[
            ("js", "javascript"),
            ("ecmascript", "javascript"),
            ("ts", "typescript"),
            ("reactjs", "react"),
            ("react.js", "react"),
            ("react js", "react"),
            ("vuejs", "vue"),
            ("vue.js", "vue"),
            ("angularjs", "angular"),
            ("nodejs", "node.js"),
            ("node", "node.js"),
            ("node js", "node.js"),
            ("nextjs", "next.js"),
            ("expressjs", "express"),
            ("golang", "go"),
            ("py", "python"),
            ("python3", "python"),
            ("c sharp", "c#"),
            ("csharp", "c#"),
            ("cpp", "c++"),
            ("k8s", "kubernetes"),
            ("postgres", "postgresql"),
            ("psql", "postgresql"),
            ("mongo", "mongodb"),
            ("ms sql", "sql server"),
            ("mssql", "sql server"),
            ("amazon web services", "aws"),
            ("google cloud platform", "gcp"),
            ("google cloud", "gcp"),
            ("microsoft azure", "azure"),
            ("ml", "machine learning"),
            ("dl", "deep learning"),
            ("ai", "artificial intelligence"),
            ("nlp", "natural language processing"),
            ("cv", "computer vision"),
            ("sklearn", "scikit-learn"),
            ("scikit learn", "scikit-learn"),
            ("tf", "tensorflow"),
            ("ci-cd", "ci/cd"),
            ("cicd", "ci/cd"),
            ("ci cd", "ci/cd"),
            ("restful", "rest api"),
            ("rest", "rest api"),
            ("restful api", "rest api"),
            ("restful apis", "rest api"),
            ("rest apis", "rest api"),
            ("html5", "html"),
            ("css3", "css"),
            ("problem-solving", "problem solving"),
            ("ux", "ux design"),
            ("ui", "ui design"),
            ("powerbi", "power bi"),
            ("ms excel", "excel"),
            ("dotnet", ".net"),
            ("dot net", ".net"),
            ("microsoft excel", "excel"),
        ];
        pairs.iter().copied().collect()
    };
}

/// Marcadores e aspas, removidos das duas pontas
const EDGE_CHARS: &[char] = &['•', '·', '-', '*', '–', '—', '"', '\'', '`', '(', ')', '[', ']'];

/// Pontuação de fim de frase, removida só no final (".NET" mantém o ponto)
const TRAILING_CHARS: &[char] = &['.', ':', '!', '?'];

/// Forma canônica de uma skill; `None` para entrada vazia
pub fn normalize_skill(raw: &str) -> Option<String> {
    let collapsed = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    // só as bordas: "node.js" e "ci/cd" mantêm a pontuação interna
    let trimmed = collapsed
        .trim_start_matches(|c: char| EDGE_CHARS.contains(&c) || c.is_whitespace())
        .trim_end_matches(|c: char| {
            EDGE_CHARS.contains(&c) || TRAILING_CHARS.contains(&c) || c.is_whitespace()
        });
    if trimmed.is_empty() {
        return None;
    }

    let canonical = ALIASES.get(trimmed).copied().unwrap_or(trimmed);
    Some(canonical.to_string())
}

/// Nome para exibição: mantém a grafia original, só limpa espaços e marcadores
pub fn display_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| matches!(c, '•' | '·' | '-' | '*' | '–' | '—' | ','))
        .trim()
        .to_string()
}

/// Normaliza uma lista já separada, removendo vazios e duplicados (mantém a
/// primeira ocorrência)
pub fn normalize_skills<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for item in items {
        if let Some(skill) = normalize_skill(item.as_ref()) {
            if seen.insert(skill.clone()) {
                out.push(skill);
            }
        }
    }

    out
}

/// Pedaços crus de uma lista em texto livre. Nunca separa em `/` para
/// preservar "ci/cd".
pub fn split_skill_list(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| matches!(c, ',' | ';' | '|' | '\n' | '\r' | '•' | '·'))
        .filter(|piece| !piece.trim().is_empty())
}

/// Separa texto livre em skills normalizadas
pub fn parse_skill_list(text: &str) -> Vec<String> {
    normalize_skills(split_skill_list(text))
}

/// Conjunto normalizado, útil para as operações de conjunto
pub fn skill_set<I, S>(items: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    normalize_skills(items).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize_skill("  Python  ").as_deref(), Some("python"));
        assert_eq!(normalize_skill("Machine   Learning").as_deref(), Some("machine learning"));
        assert_eq!(normalize_skill("• Docker.").as_deref(), Some("docker"));
        assert_eq!(normalize_skill("   ").as_deref(), None);
        assert_eq!(normalize_skill("--").as_deref(), None);
    }

    #[test]
    fn test_aliases_resolve_to_one_key() {
        for raw in ["React", "ReactJS", "react.js", "React JS"] {
            assert_eq!(normalize_skill(raw).as_deref(), Some("react"), "{}", raw);
        }
        assert_eq!(normalize_skill("K8s").as_deref(), Some("kubernetes"));
        assert_eq!(normalize_skill("Golang").as_deref(), Some("go"));
        assert_eq!(normalize_skill("Postgres").as_deref(), Some("postgresql"));
        assert_eq!(normalize_skill("NodeJS").as_deref(), Some("node.js"));
        assert_eq!(normalize_skill("Node.js").as_deref(), Some("node.js"));
    }

    #[test]
    fn test_keeps_symbols_inside_names() {
        assert_eq!(normalize_skill("C++").as_deref(), Some("c++"));
        assert_eq!(normalize_skill("C#").as_deref(), Some("c#"));
        assert_eq!(normalize_skill("CI/CD").as_deref(), Some("ci/cd"));
        assert_eq!(normalize_skill(".NET").as_deref(), Some(".net"));
        assert_eq!(normalize_skill("ASP.NET").as_deref(), Some("asp.net"));
        assert_eq!(normalize_skill("• .NET.").as_deref(), Some(".net"));
        assert_eq!(normalize_skill("dotnet").as_deref(), Some(".net"));
    }

    #[test]
    fn test_parse_skill_list_splits_and_dedupes() {
        let skills = parse_skill_list("Python, SQL; python | Docker\n• CI/CD\n\nJS");
        assert_eq!(skills, vec!["python", "sql", "docker", "ci/cd", "javascript"]);
    }

    #[test]
    fn test_display_name_keeps_spelling() {
        assert_eq!(display_name("  • Machine   Learning "), "Machine Learning");
        assert_eq!(display_name("C++"), "C++");
    }
}
