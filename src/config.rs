use std::env;

/// Configuração carregada do ambiente (.env via dotenv) no startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub dataset_path: Option<String>,
    pub max_upload_bytes: usize,
    pub cors_origins: Vec<String>,
    pub admin_emails: Vec<String>,
}

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let port = match env::var("PORT") {
            Ok(p) => p
                .parse::<u16>()
                .map_err(|_| format!("Invalid PORT: {}", p))?,
            Err(_) => 5000,
        };

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(v) => v
                .parse::<usize>()
                .map_err(|_| format!("Invalid MAX_UPLOAD_BYTES: {}", v))?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let cors_origins = split_list(
            &env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string()),
        );

        let admin_emails = split_list(&env::var("ADMIN_EMAILS").unwrap_or_default())
            .into_iter()
            .map(|e| e.to_lowercase())
            .collect();

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            database_url,
            dataset_path: env::var("SKILL_DATASET_PATH").ok().filter(|p| !p.trim().is_empty()),
            max_upload_bytes,
            cors_origins,
            admin_emails,
        })
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_ignores_blanks() {
        let items = split_list(" a@x.com, ,b@y.com,");
        assert_eq!(items, vec!["a@x.com".to_string(), "b@y.com".to_string()]);
    }

    #[test]
    fn test_admin_email_is_case_insensitive() {
        let config = AppConfig {
            host: "127.0.0.1".into(),
            port: 5000,
            database_url: "mongodb://localhost:27017/test".into(),
            dataset_path: None,
            max_upload_bytes: 1024,
            cors_origins: vec![],
            admin_emails: vec!["admin@careerboost.ai".into()],
        };
        assert!(config.is_admin_email("Admin@CareerBoost.ai"));
        assert!(!config.is_admin_email("user@careerboost.ai"));
    }
}
