use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::{DatabaseResult, ResourceTyped};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct VideoView {
    id: Uuid,
    enrollment_id: Uuid,
    module_id: Uuid,
    watch_duration_seconds: i64,
    watched_percentage: f64,
    completed: bool,
    first_watched_at: DateTime<Utc>,
    last_watched_at: DateTime<Utc>,
}

/// Accumulated watch state of one module.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewState {
    pub watch_duration_seconds: i64,
    pub watched_percentage: f64,
    pub completed: bool,
}

impl ResourceTyped for VideoView {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::VideoView
    }
}

impl VideoView {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn enrollment_id(&self) -> Uuid {
        self.enrollment_id
    }

    pub fn module_id(&self) -> Uuid {
        self.module_id
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn watched_percentage(&self) -> f64 {
        self.watched_percentage
    }

    pub fn last_watched_at(&self) -> DateTime<Utc> {
        self.last_watched_at
    }

    pub fn state(&self) -> ViewState {
        ViewState {
            watch_duration_seconds: self.watch_duration_seconds,
            watched_percentage: self.watched_percentage,
            completed: self.completed,
        }
    }
}

impl VideoView {
    pub async fn find_for_update(
        conn: &mut PgConnection,
        enrollment_id: Uuid,
        module_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM video_views WHERE enrollment_id = $1 AND module_id = $2 FOR UPDATE",
        )
        .bind(enrollment_id)
        .bind(module_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(result)
    }

    /// Writes an already merged state. The caller holds the enrollment lock, so the
    /// conflict arm only replaces what was read under that same lock.
    pub async fn upsert(
        conn: &mut PgConnection,
        enrollment_id: Uuid,
        module_id: Uuid,
        state: ViewState,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO video_views
                (id, enrollment_id, module_id, watch_duration_seconds, watched_percentage, completed)
            VALUES ($1,$2,$3,$4,$5,$6)
            ON CONFLICT (enrollment_id, module_id) DO UPDATE SET
                watch_duration_seconds = EXCLUDED.watch_duration_seconds,
                watched_percentage = EXCLUDED.watched_percentage,
                completed = EXCLUDED.completed,
                last_watched_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(enrollment_id)
        .bind(module_id)
        .bind(state.watch_duration_seconds)
        .bind(state.watched_percentage)
        .bind(state.completed)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row)
    }

    pub async fn count_completed(conn: &mut PgConnection, enrollment_id: Uuid) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM video_views WHERE enrollment_id = $1 AND completed",
        )
        .bind(enrollment_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(result)
    }
}
