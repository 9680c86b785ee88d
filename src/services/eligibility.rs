use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::model::{
    CrudRepository, ModelManager, ResourceTyped,
    entity::{Certificate, Course, Enrollment, QuizPassRow},
};
use crate::services::{IneligibleReason, ServiceError, ServiceResult, skills::derive_skills};

/// Everything the verdict depends on, already loaded.
#[derive(Debug)]
pub struct EligibilityFacts<'a> {
    pub course_title: &'a str,
    pub enrollment: Option<&'a Enrollment>,
    pub quizzes: &'a [QuizPassRow],
    pub already_certified: bool,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct Eligibility {
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<IneligibleReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_results: Option<Vec<QuizPassRow>>,
}

impl Eligibility {
    fn rejected(reason: IneligibleReason) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
            progress: None,
            completion_date: None,
            verified_skills: None,
            quiz_results: None,
        }
    }
}

/// Gates, in order: course completed, every quiz passed at least once, no certificate
/// yet. The first failing gate decides the reason.
pub fn evaluate(facts: &EligibilityFacts<'_>) -> Eligibility {
    let enrollment = match facts.enrollment {
        Some(e) if e.is_completed() => e,
        other => {
            let mut verdict = Eligibility::rejected(IneligibleReason::CourseNotCompleted);
            verdict.progress = Some(other.map_or(0.0, |e| e.progress_percentage()));
            return verdict;
        }
    };

    if facts.quizzes.iter().any(|q| !q.passed) {
        let mut verdict = Eligibility::rejected(IneligibleReason::QuizzesNotPassed);
        verdict.quiz_results = Some(facts.quizzes.to_vec());
        return verdict;
    }

    if facts.already_certified {
        return Eligibility::rejected(IneligibleReason::AlreadyCertified);
    }

    let passed_titles = facts
        .quizzes
        .iter()
        .filter(|q| q.passed)
        .map(|q| q.quiz_title.as_str());
    let skills = derive_skills(facts.course_title, passed_titles);

    Eligibility {
        eligible: true,
        reason: None,
        progress: Some(enrollment.progress_percentage()),
        completion_date: enrollment.completed_at(),
        verified_skills: Some(skills),
        quiz_results: Some(facts.quizzes.to_vec()),
    }
}

/// Loads the facts for an already fetched course and enrollment and evaluates them.
/// Runs on whatever connection the caller holds, so issuance can reuse it in its
/// transaction.
pub async fn evaluate_for(
    conn: &mut PgConnection,
    course: &Course,
    enrollment: Option<&Enrollment>,
) -> ServiceResult<Eligibility> {
    let (quizzes, already_certified) = match enrollment {
        Some(e) if e.is_completed() => (
            QuizPassRow::fetch_all(&mut *conn, course.id(), e.id()).await?,
            Certificate::exists_for_enrollment(&mut *conn, e.id()).await?,
        ),
        _ => (Vec::new(), false),
    };

    Ok(evaluate(&EligibilityFacts {
        course_title: course.title(),
        enrollment,
        quizzes: &quizzes,
        already_certified,
    }))
}

#[tracing::instrument(skip(mm))]
pub async fn check_eligibility(
    mm: &ModelManager,
    student_id: Uuid,
    course_id: Uuid,
) -> ServiceResult<Eligibility> {
    let mut conn = mm.acquire().await?;

    let course = Course::find_by_id(&mut conn, course_id)
        .await?
        .ok_or(ServiceError::not_found(Course::get_resource_type()))?;
    let enrollment = Enrollment::find_by_student_course(&mut conn, student_id, course_id).await?;

    evaluate_for(&mut conn, &course, enrollment.as_ref()).await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::entity::EnrollmentStatus;

    fn quiz(title: &str, passed: bool) -> QuizPassRow {
        QuizPassRow {
            quiz_id: Uuid::new_v4(),
            quiz_title: title.to_string(),
            module_title: String::from("Module"),
            passing_score: 70,
            passed,
        }
    }

    fn completed() -> Enrollment {
        Enrollment::new(Uuid::new_v4(), Uuid::new_v4()).with_status(EnrollmentStatus::Completed)
    }

    #[test]
    fn missing_enrollment_is_not_completed() {
        let verdict = evaluate(&EligibilityFacts {
            course_title: "Rust",
            enrollment: None,
            quizzes: &[],
            already_certified: false,
        });

        assert!(!verdict.eligible);
        assert_eq!(verdict.reason, Some(IneligibleReason::CourseNotCompleted));
        assert_eq!(verdict.progress, Some(0.0));
    }

    #[test]
    fn active_enrollment_is_not_completed() {
        let active = Enrollment::new(Uuid::new_v4(), Uuid::new_v4());
        let verdict = evaluate(&EligibilityFacts {
            course_title: "Rust",
            enrollment: Some(&active),
            quizzes: &[quiz("Quiz", true)],
            already_certified: false,
        });

        assert_eq!(verdict.reason, Some(IneligibleReason::CourseNotCompleted));
    }

    #[test]
    fn unpassed_quiz_blocks_with_breakdown() {
        let e = completed();
        let quizzes = [quiz("Intro", true), quiz("Advanced", false)];
        let verdict = evaluate(&EligibilityFacts {
            course_title: "Rust",
            enrollment: Some(&e),
            quizzes: &quizzes,
            already_certified: false,
        });

        assert!(!verdict.eligible);
        assert_eq!(verdict.reason, Some(IneligibleReason::QuizzesNotPassed));
        let results = verdict.quiz_results.unwrap();
        assert!(results.iter().any(|q| !q.passed));
    }

    #[test]
    fn quiz_gate_comes_before_certificate_gate() {
        let e = completed();
        let quizzes = [quiz("Advanced", false)];
        let verdict = evaluate(&EligibilityFacts {
            course_title: "Rust",
            enrollment: Some(&e),
            quizzes: &quizzes,
            already_certified: true,
        });

        assert_eq!(verdict.reason, Some(IneligibleReason::QuizzesNotPassed));
    }

    #[test]
    fn existing_certificate_blocks() {
        let e = completed();
        let verdict = evaluate(&EligibilityFacts {
            course_title: "Rust",
            enrollment: Some(&e),
            quizzes: &[],
            already_certified: true,
        });

        assert_eq!(verdict.reason, Some(IneligibleReason::AlreadyCertified));
        assert!(verdict.verified_skills.is_none());
    }

    #[test]
    fn eligible_student_gets_skills() {
        let e = completed();
        let quizzes = [quiz("API design", true)];
        let verdict = evaluate(&EligibilityFacts {
            course_title: "Blockchain basics",
            enrollment: Some(&e),
            quizzes: &quizzes,
            already_certified: false,
        });

        assert!(verdict.eligible);
        assert!(verdict.reason.is_none());
        assert!(verdict.completion_date.is_some());
        let skills = verdict.verified_skills.unwrap();
        assert!(skills.contains(&String::from("Blockchain")));
        assert!(skills.contains(&String::from("API Development")));
    }

    #[test]
    fn course_without_quizzes_is_eligible_once_completed() {
        let e = completed();
        let verdict = evaluate(&EligibilityFacts {
            course_title: "Rust",
            enrollment: Some(&e),
            quizzes: &[],
            already_certified: false,
        });

        assert!(verdict.eligible);
        assert_eq!(verdict.verified_skills, Some(Vec::new()));
    }

    #[test]
    fn verdict_serializes_reason_as_text() {
        let verdict = Eligibility::rejected(IneligibleReason::CourseNotCompleted);
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["eligible"], false);
        assert_eq!(json["reason"], "course not completed");
        assert!(json.get("quiz_results").is_none());
    }
}
