pub mod analysis_service;
pub mod auth_service;
pub mod report_service;
pub mod resume_service;
pub mod role_service;
pub mod skill_service;

use mongodb::bson::oid::ObjectId;

use crate::utils::AppError;

/// Converte o id recebido na URL; id malformado é erro do cliente
pub(crate) fn parse_object_id(id: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id.trim()).map_err(|_| AppError::bad_request(format!("Invalid {} id: {}", what, id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        assert!(matches!(parse_object_id("nope", "skill"), Err(AppError::BadRequest(_))));
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex(), "skill").unwrap(), id);
    }
}
