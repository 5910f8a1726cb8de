pub mod analysis;
pub mod auth;
pub mod health;
pub mod metrics;
pub mod reports;
pub mod resume;
pub mod roles;
pub mod skills;
pub mod swagger;
pub mod user_skills;
