use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::{DatabaseResult, ResourceTyped};

/// At most one per enrollment (`certificates.enrollment_id` is unique).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Certificate {
    id: Uuid,
    enrollment_id: Uuid,
    skills_verified: Vec<String>,
    token_id: Option<Uuid>,
    issued_at: DateTime<Utc>,
}

impl ResourceTyped for Certificate {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Certificate
    }
}

impl Certificate {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn enrollment_id(&self) -> Uuid {
        self.enrollment_id
    }

    pub fn skills_verified(&self) -> &[String] {
        &self.skills_verified
    }

    pub fn token_id(&self) -> Option<Uuid> {
        self.token_id
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

impl Certificate {
    pub async fn create(
        conn: &mut PgConnection,
        enrollment_id: Uuid,
        skills_verified: &[String],
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO certificates (id, enrollment_id, skills_verified)
            VALUES ($1,$2,$3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(enrollment_id)
        .bind(skills_verified)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row)
    }

    pub async fn exists_for_enrollment(
        conn: &mut PgConnection,
        enrollment_id: Uuid,
    ) -> DatabaseResult<bool> {
        let result: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM certificates WHERE enrollment_id = $1)")
                .bind(enrollment_id)
                .fetch_one(&mut *conn)
                .await?;
        Ok(result)
    }

    pub async fn attach_token(
        conn: &mut PgConnection,
        certificate_id: Uuid,
        token_id: Uuid,
    ) -> DatabaseResult<()> {
        sqlx::query("UPDATE certificates SET token_id = $1 WHERE id = $2")
            .bind(token_id)
            .bind(certificate_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

// Utils

/// Certificate joined with its course and token, as shown to students and verifiers.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct CertificateSummaryRow {
    pub certificate_id: Uuid,
    pub course_id: Uuid,
    pub course_title: String,
    pub instructor: String,
    pub student_name: String,
    pub completion_date: Option<DateTime<Utc>>,
    pub issued_at: DateTime<Utc>,
    pub skills_verified: Vec<String>,
    pub token_fingerprint: Option<String>,
    pub explorer_url: Option<String>,
}

const SUMMARY_SELECT: &str = r#"
    SELECT
        c.id AS certificate_id,
        co.id AS course_id,
        co.title AS course_title,
        co.instructor,
        CASE WHEN u.full_name = '' THEN u.username ELSE u.full_name END AS student_name,
        e.completed_at AS completion_date,
        c.issued_at,
        c.skills_verified,
        t.fingerprint AS token_fingerprint,
        t.explorer_url
    FROM certificates c
    JOIN enrollments e ON e.id = c.enrollment_id
    JOIN courses co ON co.id = e.course_id
    JOIN users u ON u.id = e.student_id
    LEFT JOIN certificate_tokens t ON t.id = c.token_id
"#;

impl CertificateSummaryRow {
    pub async fn all_by_student(conn: &mut PgConnection, student_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let query = format!("{SUMMARY_SELECT} WHERE e.student_id = $1 ORDER BY c.issued_at DESC");
        let rows = sqlx::query_as(&query)
            .bind(student_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_fingerprint(
        conn: &mut PgConnection,
        fingerprint: &str,
    ) -> DatabaseResult<Option<Self>> {
        let query = format!("{SUMMARY_SELECT} WHERE t.fingerprint = $1");
        let row = sqlx::query_as(&query)
            .bind(fingerprint)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }
}
