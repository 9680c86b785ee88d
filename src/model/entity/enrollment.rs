use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::{DatabaseResult, ResourceTyped};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema)]
#[sqlx(type_name = "enrollment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Dropped,
}

/// Binds a student to a course. `completed_at` is set exactly when `status` is
/// `Completed`; the table carries the same check.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Enrollment {
    id: Uuid,
    student_id: Uuid,
    course_id: Uuid,
    status: EnrollmentStatus,
    progress_percentage: f64,
    enrolled_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl ResourceTyped for Enrollment {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Enrollment
    }
}

impl Enrollment {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn status(&self) -> EnrollmentStatus {
        self.status
    }

    pub fn progress_percentage(&self) -> f64 {
        self.progress_percentage
    }

    pub fn enrolled_at(&self) -> DateTime<Utc> {
        self.enrolled_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_completed(&self) -> bool {
        self.status == EnrollmentStatus::Completed
    }

    /// Applies a fresh module count. Returns `true` when this call moved the
    /// enrollment from active to completed.
    ///
    /// A course without modules leaves the enrollment untouched. Completion never
    /// reverts, and a dropped enrollment is never completed here.
    pub fn record_progress(&mut self, completed: i64, total: i64, now: DateTime<Utc>) -> bool {
        if total <= 0 {
            return false;
        }

        let ratio = completed as f64 / total as f64 * 100.0;
        self.progress_percentage = ratio.clamp(0.0, 100.0);

        if completed >= total && self.status == EnrollmentStatus::Active {
            self.status = EnrollmentStatus::Completed;
            self.completed_at = Some(now);
            return true;
        }

        false
    }

    #[cfg(test)]
    pub fn new(student_id: Uuid, course_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id,
            course_id,
            status: EnrollmentStatus::Active,
            progress_percentage: 0.0,
            enrolled_at: Utc::now(),
            completed_at: None,
        }
    }

    #[cfg(test)]
    pub fn with_status(mut self, status: EnrollmentStatus) -> Self {
        self.status = status;
        self.completed_at = match status {
            EnrollmentStatus::Completed => Some(Utc::now()),
            _ => None,
        };
        self
    }
}

impl Enrollment {
    pub async fn find_by_student_course(
        conn: &mut PgConnection,
        student_id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM enrollments WHERE student_id = $1 AND course_id = $2")
                .bind(student_id)
                .bind(course_id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(result)
    }

    /// Same as [`Enrollment::find_by_student_course`] but holds a row lock until the
    /// surrounding transaction ends.
    pub async fn lock_by_student_course(
        conn: &mut PgConnection,
        student_id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM enrollments WHERE student_id = $1 AND course_id = $2 FOR UPDATE",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(result)
    }

    /// Finds or creates the enrollment and locks it. The boolean tells whether the row
    /// was created by this call.
    pub async fn get_or_create_locked(
        conn: &mut PgConnection,
        student_id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<(Self, bool)> {
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO enrollments (id, student_id, course_id, status, progress_percentage)
            VALUES ($1, $2, $3, 'active', 0)
            ON CONFLICT (student_id, course_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&mut *conn)
        .await?;

        let enrollment = sqlx::query_as(
            "SELECT * FROM enrollments WHERE student_id = $1 AND course_id = $2 FOR UPDATE",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok((enrollment, inserted.is_some()))
    }

    pub async fn save_progress(&self, conn: &mut PgConnection) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            UPDATE enrollments
            SET status = $1, progress_percentage = $2, completed_at = $3
            WHERE id = $4
            "#,
        )
        .bind(self.status)
        .bind(self.progress_percentage)
        .bind(self.completed_at)
        .bind(self.id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn enrollment() -> Enrollment {
        Enrollment::new(Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn partial_progress_keeps_active() {
        let mut e = enrollment();
        let moved = e.record_progress(1, 4, Utc::now());

        assert!(!moved);
        assert_eq!(e.progress_percentage(), 25.0);
        assert_eq!(e.status(), EnrollmentStatus::Active);
        assert!(e.completed_at().is_none());
    }

    #[test]
    fn all_modules_complete_the_enrollment() {
        let mut e = enrollment();
        let now = Utc::now();
        let moved = e.record_progress(2, 2, now);

        assert!(moved);
        assert_eq!(e.progress_percentage(), 100.0);
        assert_eq!(e.status(), EnrollmentStatus::Completed);
        assert_eq!(e.completed_at(), Some(now));
    }

    #[test]
    fn empty_course_leaves_enrollment_untouched() {
        let mut e = enrollment();
        let moved = e.record_progress(0, 0, Utc::now());

        assert!(!moved);
        assert_eq!(e.progress_percentage(), 0.0);
        assert_eq!(e.status(), EnrollmentStatus::Active);
    }

    #[test]
    fn completed_enrollment_is_never_demoted() {
        let mut e = enrollment();
        e.record_progress(3, 3, Utc::now());
        let completed_at = e.completed_at();

        // a module added to the course later lowers the ratio only
        let moved = e.record_progress(3, 4, Utc::now());

        assert!(!moved);
        assert_eq!(e.progress_percentage(), 75.0);
        assert_eq!(e.status(), EnrollmentStatus::Completed);
        assert_eq!(e.completed_at(), completed_at);
    }

    #[test]
    fn dropped_enrollment_is_not_completed() {
        let mut e = enrollment().with_status(EnrollmentStatus::Dropped);
        let moved = e.record_progress(2, 2, Utc::now());

        assert!(!moved);
        assert_eq!(e.status(), EnrollmentStatus::Dropped);
        assert!(e.completed_at().is_none());
    }

    #[test]
    fn status_and_completed_at_agree() {
        for (completed, total) in [(0, 3), (1, 3), (3, 3), (0, 0)] {
            let mut e = enrollment();
            e.record_progress(completed, total, Utc::now());
            assert_eq!(e.is_completed(), e.completed_at().is_some());
        }
    }
}
