use serde::Serialize;
use uuid::Uuid;

use crate::model::{
    CrudRepository, ModelManager, Page,
    entity::{CatalogRow, Course, EnrollmentStatus},
};
use crate::services::{ServiceError, ServiceResult};

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CatalogStatus {
    NotEnrolled,
    Active,
    Completed,
    Dropped,
}

impl From<Option<EnrollmentStatus>> for CatalogStatus {
    fn from(value: Option<EnrollmentStatus>) -> Self {
        match value {
            None => Self::NotEnrolled,
            Some(EnrollmentStatus::Active) => Self::Active,
            Some(EnrollmentStatus::Completed) => Self::Completed,
            Some(EnrollmentStatus::Dropped) => Self::Dropped,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub level: String,
    pub duration_hours: i32,
    pub modules_count: i64,
    pub enrolled: bool,
    pub progress: f64,
    pub status: CatalogStatus,
}

impl From<CatalogRow> for CatalogEntry {
    fn from(row: CatalogRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            instructor: row.instructor,
            level: row.level,
            duration_hours: row.duration_hours,
            modules_count: row.modules_count,
            enrolled: row.status.is_some(),
            progress: row.progress_percentage.unwrap_or(0.0),
            status: row.status.into(),
        }
    }
}

#[tracing::instrument(skip(mm))]
pub async fn list_catalog(
    mm: &ModelManager,
    student_id: Uuid,
    limit: i64,
    offset: i64,
) -> ServiceResult<Page<CatalogEntry>> {
    if limit < 1 || offset < 0 {
        return Err(ServiceError::validation(
            "limit must be positive and offset must not be negative",
        ));
    }
    let limit = limit.min(MAX_PAGE_LIMIT);

    let mut conn = mm.acquire().await?;
    let total = Course::count(&mut conn).await?;
    let rows = CatalogRow::fetch_page(&mut conn, student_id, limit, offset).await?;

    let items = rows.into_iter().map(CatalogEntry::from).collect();
    Ok(Page::new(items, total, limit, offset))
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(status: Option<EnrollmentStatus>, progress: Option<f64>) -> CatalogRow {
        CatalogRow {
            id: Uuid::new_v4(),
            title: String::from("Rust"),
            description: String::new(),
            instructor: String::from("Ferris"),
            level: String::from("beginner"),
            duration_hours: 4,
            modules_count: 3,
            status,
            progress_percentage: progress,
        }
    }

    #[test]
    fn missing_enrollment_is_not_enrolled() {
        let entry = CatalogEntry::from(row(None, None));
        assert!(!entry.enrolled);
        assert_eq!(entry.progress, 0.0);
        assert_eq!(entry.status, CatalogStatus::NotEnrolled);
    }

    #[test]
    fn enrollment_carries_progress() {
        let entry = CatalogEntry::from(row(Some(EnrollmentStatus::Active), Some(33.3)));
        assert!(entry.enrolled);
        assert_eq!(entry.progress, 33.3);
        assert_eq!(entry.status, CatalogStatus::Active);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&CatalogStatus::NotEnrolled).unwrap();
        assert_eq!(json, "\"not_enrolled\"");
    }
}
