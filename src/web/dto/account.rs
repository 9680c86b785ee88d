use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::UserEntity;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignupBody {
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SigninBody {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
}

impl From<&UserEntity> for AccountResponse {
    fn from(user: &UserEntity) -> Self {
        Self {
            id: user.id(),
            username: user.username().to_string(),
            full_name: user.full_name().to_string(),
        }
    }
}
