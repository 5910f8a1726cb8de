use crate::{
    config::AppConfig,
    database::{MongoDB, ANALYSES, USERS, USER_SKILLS},
    models::User,
    utils::{is_duplicate_key, AppError},
};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};
use bcrypt::{hash, verify, DEFAULT_COST};
use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use chrono::{Utc, Duration};
use uuid::Uuid;
use std::collections::HashSet;

const ACCESS_TOKEN: &str = "access";
const REFRESH_TOKEN: &str = "refresh";
const MIN_PASSWORD_LEN: usize = 8;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // user_id
    pub email: String,
    pub name: Option<String>,
    pub roles: Vec<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,    // "access" | "refresh"
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    pub aud: String,           // audience
    pub iss: String,           // issuer
}

fn default_token_type() -> String {
    ACCESS_TOKEN.to_string()
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == "admin")
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin role required".to_string()))
        }
    }
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub roles: Vec<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.user_id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            roles: user.roles.clone(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VerifyTokenResponse {
    pub success: bool,
    pub valid: bool,
    pub user_id: String,
    pub email: String,
    pub exp: usize,
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "skill-gap-analyzer".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "skill-gap-api".to_string())
}

fn get_jwt_expiry_hours() -> i64 {
    std::env::var("JWT_EXPIRY_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or(24)
}

fn sign(claims: &Claims) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref())
    ).map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
}

// Generate JWT token
pub fn generate_jwt(user: &User) -> Result<String, AppError> {
    let now = Utc::now();

    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        roles: user.roles.clone(),
        token_type: ACCESS_TOKEN.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(get_jwt_expiry_hours())).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    sign(&claims)
}

// Generate refresh token (longer expiry)
pub fn generate_refresh_token(user_id: &str) -> Result<String, AppError> {
    let now = Utc::now();

    let claims = Claims {
        sub: user_id.to_string(),
        email: String::new(),
        name: None,
        roles: vec![],
        token_type: REFRESH_TOKEN.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::days(30)).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    sign(&claims)
}

fn decode_claims(token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

// Verify access token
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let claims = decode_claims(token)?;
    if claims.token_type != ACCESS_TOKEN {
        return Err(AppError::Unauthorized("Invalid token: not an access token".to_string()));
    }
    Ok(claims)
}

fn verify_refresh_token(token: &str) -> Result<Claims, AppError> {
    let claims = decode_claims(token)?;
    if claims.token_type != REFRESH_TOKEN {
        return Err(AppError::Unauthorized("Invalid token: not a refresh token".to_string()));
    }
    Ok(claims)
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn auth_response(user: &User) -> Result<AuthResponse, AppError> {
    Ok(AuthResponse {
        success: true,
        token: generate_jwt(user)?,
        refresh_token: generate_refresh_token(&user.user_id)?,
        user: UserInfo::from(user),
    })
}

// User login
pub async fn login(
    db: &MongoDB,
    request: &LoginRequest,
) -> Result<AuthResponse, AppError> {
    let collection = db.collection::<User>(USERS);
    let email = request.email.trim().to_lowercase();

    let user = collection
        .find_one(doc! { "email": &email })
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = verify(&request.password, &user.password)
        .map_err(|e| AppError::internal(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    if !user.is_active {
        return Err(AppError::Unauthorized("Account is inactive".to_string()));
    }

    collection
        .update_one(
            doc! { "user_id": &user.user_id },
            doc! { "$set": { "last_login": BsonDateTime::now() } },
        )
        .await?;

    auth_response(&user)
}

// User registration
pub async fn register(
    db: &MongoDB,
    config: &AppConfig,
    request: &RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let collection = db.collection::<User>(USERS);

    let email = request.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::bad_request("A valid email is required"));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if collection.find_one(doc! { "email": &email }).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let hashed_password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let mut roles = vec!["user".to_string()];
    if config.is_admin_email(&email) {
        roles.push("admin".to_string());
    }

    let new_user = User {
        _id: None,
        user_id: ObjectId::new().to_hex(),
        email: email.clone(),
        password: hashed_password,
        name: request.name.as_ref().map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        roles,
        is_active: true,
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
        last_login: Some(BsonDateTime::now()),
    };

    // índice único em email cobre a corrida entre o find_one e o insert
    match collection.insert_one(&new_user).await {
        Ok(_) => {}
        Err(e) if is_duplicate_key(&e) => {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    log::info!("✅ User registered successfully: {}", email);

    auth_response(&new_user)
}

// Refresh token
pub async fn refresh_token(
    db: &MongoDB,
    request: &RefreshTokenRequest,
) -> Result<AuthResponse, AppError> {
    let claims = verify_refresh_token(&request.refresh_token)?;

    let user = db
        .collection::<User>(USERS)
        .find_one(doc! { "user_id": &claims.sub })
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized("Account is inactive".to_string()));
    }

    auth_response(&user)
}

// Get current user
pub async fn get_current_user(
    db: &MongoDB,
    user_id: &str,
) -> Result<UserInfo, AppError> {
    let user = db
        .collection::<User>(USERS)
        .find_one(doc! { "user_id": user_id })
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(UserInfo::from(&user))
}

/// 🗑️ Delete user account and all associated data
pub async fn delete_user_account(
    db: &MongoDB,
    user_id: &str,
) -> Result<(), AppError> {
    log::info!("🗑️ Deleting account for user_id: {}", user_id);

    let delete_user_result = db
        .collection::<User>(USERS)
        .delete_one(doc! { "user_id": user_id })
        .await?;

    if delete_user_result.deleted_count == 0 {
        log::warn!("⚠️ User {} not found in database", user_id);
        return Err(AppError::not_found(format!("User {} not found", user_id)));
    }

    let skills_result = db
        .collection::<Document>(USER_SKILLS)
        .delete_many(doc! { "user_id": user_id })
        .await?;
    log::info!("✅ Deleted {} skills for user {}", skills_result.deleted_count, user_id);

    let analyses_result = db
        .collection::<Document>(ANALYSES)
        .delete_many(doc! { "user_id": user_id })
        .await?;
    log::info!("✅ Deleted {} analyses for user {}", analyses_result.deleted_count, user_id);

    log::info!("🎉 Account and all data successfully deleted for user {}", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            _id: None,
            user_id: ObjectId::new().to_hex(),
            email: "jane@example.com".to_string(),
            password: String::new(),
            name: Some("Jane".to_string()),
            roles: vec!["user".to_string()],
            is_active: true,
            created_at: None,
            updated_at: None,
            last_login: None,
        }
    }

    #[test]
    fn test_access_token_roundtrip() {
        let user = user();
        let token = generate_jwt(&user).unwrap();
        let claims = verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.user_id);
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.token_type, "access");
        assert!(!claims.is_admin());
        assert!(matches!(claims.require_admin(), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let user = user();
        let refresh = generate_refresh_token(&user.user_id).unwrap();
        assert!(matches!(verify_token(&refresh), Err(AppError::Unauthorized(_))));
        assert_eq!(verify_refresh_token(&refresh).unwrap().sub, user.user_id);

        let access = generate_jwt(&user).unwrap();
        assert!(verify_refresh_token(&access).is_err());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let token = generate_jwt(&user()).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(matches!(verify_token(&tampered), Err(AppError::Unauthorized(_))));
        assert!(verify_token("not-a-jwt").is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("jane@example.com"));
        assert!(!is_valid_email("jane.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
    }

    #[test]
    fn test_password_hash_verifies() {
        let hashed = hash("correct horse", 4).unwrap();
        assert!(verify("correct horse", &hashed).unwrap());
        assert!(!verify("wrong horse", &hashed).unwrap());
    }
}
