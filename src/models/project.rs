use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProjectCreate {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("name must not be blank".into());
        return Err(error);
    }
    Ok(())
}
