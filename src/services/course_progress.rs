use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::model::{
    CrudRepository, ModelManager, ResourceTyped,
    entity::{Course, CourseModule, Enrollment, EnrollmentStatus, ModuleProgressRow, VideoView},
};
use crate::services::{ServiceError, ServiceResult};

/// Recomputes the aggregate progress of a locked enrollment and persists it.
pub async fn update_progress(
    conn: &mut PgConnection,
    enrollment: &mut Enrollment,
) -> ServiceResult<()> {
    let total = CourseModule::count_by_course(&mut *conn, enrollment.course_id()).await?;
    if total == 0 {
        return Ok(());
    }

    let completed = VideoView::count_completed(&mut *conn, enrollment.id()).await?;
    let finished = enrollment.record_progress(completed, total, Utc::now());
    enrollment.save_progress(&mut *conn).await?;

    if finished {
        tracing::info!(
            enrollment = %enrollment.id(),
            course = %enrollment.course_id(),
            "enrollment completed"
        );
    }

    Ok(())
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CourseProgress {
    pub course_id: Uuid,
    pub course_title: String,
    pub overall_progress: f64,
    pub status: EnrollmentStatus,
    pub modules: Vec<ModuleProgressRow>,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[tracing::instrument(skip(mm))]
pub async fn get_course_progress(
    mm: &ModelManager,
    student_id: Uuid,
    course_id: Uuid,
) -> ServiceResult<CourseProgress> {
    let mut conn = mm.acquire().await?;

    let course = Course::find_by_id(&mut conn, course_id)
        .await?
        .ok_or(ServiceError::not_found(Course::get_resource_type()))?;

    let enrollment = Enrollment::find_by_student_course(&mut conn, student_id, course_id)
        .await?
        .ok_or(ServiceError::NotEnrolled)?;

    let modules = ModuleProgressRow::fetch_all(&mut conn, course_id, enrollment.id()).await?;

    Ok(CourseProgress {
        course_id,
        course_title: course.title().to_string(),
        overall_progress: enrollment.progress_percentage(),
        status: enrollment.status(),
        modules,
        enrolled_at: enrollment.enrolled_at(),
        completed_at: enrollment.completed_at(),
    })
}

/// Enrolls the student if not enrolled yet. The flag tells whether a row was created.
#[tracing::instrument(skip(mm))]
pub async fn enroll(
    mm: &ModelManager,
    student_id: Uuid,
    course_id: Uuid,
) -> ServiceResult<(Enrollment, bool)> {
    let mut tx = mm.begin().await?;

    if Course::find_by_id(&mut tx, course_id).await?.is_none() {
        return Err(ServiceError::not_found(Course::get_resource_type()));
    }

    let (enrollment, created) = Enrollment::get_or_create_locked(&mut tx, student_id, course_id).await?;
    tx.commit().await?;

    if created {
        tracing::info!(enrollment = %enrollment.id(), "student enrolled");
    }

    Ok((enrollment, created))
}
