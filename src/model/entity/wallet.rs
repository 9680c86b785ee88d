use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::{DatabaseResult, ResourceTyped};

/// Read-only wallet registered by a student. Only the payment address is kept, keys
/// never reach this service.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Wallet {
    id: Uuid,
    user_id: Uuid,
    name: String,
    payment_address: String,
    network: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct WalletCreate {
    pub user_id: Uuid,
    pub name: String,
    pub payment_address: String,
    pub network: String,
}

impl ResourceTyped for Wallet {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Wallet
    }
}

impl Wallet {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payment_address(&self) -> &str {
        &self.payment_address
    }

    pub fn network(&self) -> &str {
        &self.network
    }
}

impl Wallet {
    pub async fn create(conn: &mut PgConnection, data: WalletCreate) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO wallets (id, user_id, name, payment_address, network)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(&data.name)
        .bind(&data.payment_address)
        .bind(&data.network)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row)
    }

    pub async fn all_by_user(conn: &mut PgConnection, user_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as("SELECT * FROM wallets WHERE user_id = $1 ORDER BY created_at")
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    /// Address of the oldest wallet the user registered.
    pub async fn first_payment_address(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> DatabaseResult<Option<String>> {
        let address = sqlx::query_scalar(
            r#"
            SELECT payment_address
            FROM wallets
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(address)
    }
}
