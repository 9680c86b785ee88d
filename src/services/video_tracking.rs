use serde::Serialize;
use uuid::Uuid;

use crate::model::{
    CrudRepository, ModelManager, ResourceTyped,
    entity::{CourseModule, Enrollment, VideoView, ViewState},
};
use crate::services::{ServiceError, ServiceResult, course_progress};

/// One watch report for a module video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSample {
    watch_duration_seconds: i64,
    watched_percentage: f64,
}

impl ViewSample {
    /// `total_seconds == 0` yields a percentage of 0 instead of dividing.
    pub fn new(watch_seconds: i64, total_seconds: i64) -> ServiceResult<Self> {
        if watch_seconds < 0 || total_seconds < 0 {
            return Err(ServiceError::validation("durations must not be negative"));
        }

        let watched_percentage = if total_seconds > 0 {
            watch_seconds as f64 / total_seconds as f64 * 100.0
        } else {
            0.0
        };

        Ok(Self {
            watch_duration_seconds: watch_seconds,
            watched_percentage,
        })
    }

    pub fn watched_percentage(&self) -> f64 {
        self.watched_percentage
    }
}

/// Folds a sample into the stored state: durations add up, the percentage keeps its
/// maximum and completion sticks once reached.
pub fn merge_view(previous: Option<ViewState>, sample: ViewSample, threshold: f64) -> ViewState {
    let reached = sample.watched_percentage >= threshold;

    match previous {
        None => ViewState {
            watch_duration_seconds: sample.watch_duration_seconds,
            watched_percentage: sample.watched_percentage,
            completed: reached,
        },
        Some(old) => ViewState {
            watch_duration_seconds: old
                .watch_duration_seconds
                .saturating_add(sample.watch_duration_seconds),
            watched_percentage: old.watched_percentage.max(sample.watched_percentage),
            completed: old.completed || reached,
        },
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TrackedView {
    pub enrollment_id: Uuid,
    pub video_view_id: Uuid,
    /// Percentage of this report, not the stored maximum.
    pub watched_percentage: f64,
    pub completed: bool,
}

/// Records a watch report, enrolling the student on first contact, and refreshes the
/// course progress in the same transaction.
#[tracing::instrument(skip(mm))]
pub async fn track_view(
    mm: &ModelManager,
    student_id: Uuid,
    module_id: Uuid,
    watch_seconds: i64,
    total_seconds: i64,
    threshold: f64,
) -> ServiceResult<TrackedView> {
    let sample = ViewSample::new(watch_seconds, total_seconds)?;

    let mut tx = mm.begin().await?;

    let module = CourseModule::find_by_id(&mut tx, module_id)
        .await?
        .ok_or(ServiceError::not_found(CourseModule::get_resource_type()))?;

    let (mut enrollment, created) =
        Enrollment::get_or_create_locked(&mut tx, student_id, module.course_id()).await?;
    if created {
        tracing::info!(enrollment = %enrollment.id(), "student enrolled through first view");
    }

    let previous = VideoView::find_for_update(&mut tx, enrollment.id(), module.id())
        .await?
        .map(|v| v.state());
    let state = merge_view(previous, sample, threshold);
    let view = VideoView::upsert(&mut tx, enrollment.id(), module.id(), state).await?;

    course_progress::update_progress(&mut tx, &mut enrollment).await?;

    tx.commit().await?;

    Ok(TrackedView {
        enrollment_id: enrollment.id(),
        video_view_id: view.id(),
        watched_percentage: sample.watched_percentage(),
        completed: view.completed(),
    })
}
