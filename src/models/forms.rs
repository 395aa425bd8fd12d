use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::models::timestamp;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub datetime_start: NaiveDateTime,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub datetime_end: NaiveDateTime,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub datetime_start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub datetime_end: Option<NaiveDateTime>,
}
