use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::{DatabaseResult, ResourceTyped};

/// Reference to an asset minted by the external ledger collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct CertificateToken {
    id: Uuid,
    fingerprint: String,
    policy_id: String,
    asset_name: String,
    explorer_url: String,
    minted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateTokenCreate {
    pub fingerprint: String,
    pub policy_id: String,
    pub asset_name: String,
    pub explorer_url: String,
}

impl ResourceTyped for CertificateToken {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::CertificateToken
    }
}

impl CertificateToken {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn policy_id(&self) -> &str {
        &self.policy_id
    }

    pub fn asset_name(&self) -> &str {
        &self.asset_name
    }

    pub fn explorer_url(&self) -> &str {
        &self.explorer_url
    }
}

impl CertificateToken {
    pub async fn create(
        conn: &mut PgConnection,
        data: CertificateTokenCreate,
    ) -> DatabaseResult<Self> {
        let result = sqlx::query_as(
            r#"
            INSERT INTO certificate_tokens (id, fingerprint, policy_id, asset_name, explorer_url)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.fingerprint)
        .bind(&data.policy_id)
        .bind(&data.asset_name)
        .bind(&data.explorer_url)
        .fetch_one(&mut *conn)
        .await?;

        Ok(result)
    }
}
