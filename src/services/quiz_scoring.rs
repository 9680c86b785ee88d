use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::model::{
    CrudRepository, ModelManager, ResourceTyped,
    entity::{
        AttemptReportRow, Course, CourseModule, Enrollment, Question, QuestionType, Quiz,
        QuizAttempt, QuizAttemptCreate, QuizOption,
    },
};
use crate::services::{Precondition, ServiceError, ServiceResult};

/// Answers keyed by question id.
pub type Answers = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AnswerDetail {
    pub question_id: Uuid,
    pub question_text: String,
    pub student_answer: Value,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub score: f64,
    pub correct_count: usize,
    pub total_questions: usize,
    pub details: Vec<AnswerDetail>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn answer_text(answer: &Value) -> String {
    match answer {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn check_answer(question: &Question, options: &[&QuizOption], answer: &Value) -> bool {
    let given = answer_text(answer);

    match question.question_type() {
        QuestionType::MultipleChoice => match given.trim().parse::<Uuid>() {
            Ok(option_id) => options
                .iter()
                .any(|o| o.id() == option_id && o.is_correct()),
            Err(_) => false,
        },
        QuestionType::TrueFalse => options
            .iter()
            .find(|o| o.is_correct())
            .is_some_and(|o| given.to_lowercase() == o.text().to_lowercase()),
        QuestionType::ShortAnswer => {
            let given = given.to_lowercase();
            options
                .iter()
                .filter(|o| o.is_correct())
                .any(|o| given.contains(&o.text().to_lowercase()))
        }
    }
}

/// Scores a submission. Unanswered questions count in the denominator only and get no
/// detail entry. A quiz without questions scores 0.
pub fn score_answers(questions: &[Question], options: &[QuizOption], answers: &Answers) -> ScoreCard {
    let total_questions = questions.len();
    if total_questions == 0 {
        return ScoreCard {
            score: 0.0,
            correct_count: 0,
            total_questions,
            details: Vec::new(),
        };
    }

    let by_question: HashMap<Uuid, &Value> = answers
        .iter()
        .filter_map(|(k, v)| k.trim().parse::<Uuid>().ok().map(|id| (id, v)))
        .collect();

    let mut correct_count = 0;
    let mut details = Vec::new();

    for question in questions {
        let Some(answer) = by_question.get(&question.id()) else {
            continue;
        };

        let own_options: Vec<&QuizOption> = options
            .iter()
            .filter(|o| o.question_id() == question.id())
            .collect();
        let is_correct = check_answer(question, &own_options, answer);
        if is_correct {
            correct_count += 1;
        }

        details.push(AnswerDetail {
            question_id: question.id(),
            question_text: question.text().to_string(),
            student_answer: (*answer).clone(),
            is_correct,
        });
    }

    let score = round2(correct_count as f64 / total_questions as f64 * 100.0);

    ScoreCard {
        score,
        correct_count,
        total_questions,
        details,
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct QuizResult {
    pub attempt_id: Uuid,
    pub score: f64,
    pub passed: bool,
    pub passing_score: i32,
    pub attempt_number: i32,
    pub correct_answers: Vec<AnswerDetail>,
    pub total_questions: usize,
}

/// Scores and records one attempt. The enrollment row stays locked from the attempt
/// count to the insert, so concurrent submissions cannot both pass the limit.
#[tracing::instrument(skip(mm, answers))]
pub async fn take_quiz(
    mm: &ModelManager,
    student_id: Uuid,
    quiz_id: Uuid,
    answers: Answers,
) -> ServiceResult<QuizResult> {
    let mut tx = mm.begin().await?;

    let quiz = Quiz::find_by_id(&mut tx, quiz_id)
        .await?
        .ok_or(ServiceError::not_found(Quiz::get_resource_type()))?;

    let module = CourseModule::find_by_id(&mut tx, quiz.module_id())
        .await?
        .ok_or(ServiceError::not_found(CourseModule::get_resource_type()))?;

    let enrollment = Enrollment::lock_by_student_course(&mut tx, student_id, module.course_id())
        .await?
        .ok_or(ServiceError::NotEnrolled)?;

    let prior = QuizAttempt::count_for(&mut tx, enrollment.id(), quiz.id()).await?;
    if prior >= i64::from(quiz.max_attempts()) {
        return Err(Precondition::MaxAttemptsReached {
            max: quiz.max_attempts(),
        }
        .into());
    }

    let questions = Question::all_by_quiz(&mut tx, quiz.id()).await?;
    let options = QuizOption::all_by_quiz(&mut tx, quiz.id()).await?;
    let card = score_answers(&questions, &options, &answers);

    let passed = quiz.is_passing(card.score);
    let attempt_number = i32::try_from(prior + 1)
        .map_err(|_| ServiceError::validation("attempt number out of range"))?;

    let answers_data = json!({
        "answers": answers,
        "correct_answers": card.details,
        "attempt_number": attempt_number,
    });

    let attempt = QuizAttempt::create(
        &mut tx,
        QuizAttemptCreate {
            enrollment_id: enrollment.id(),
            quiz_id: quiz.id(),
            attempt_number,
            score: card.score,
            passed,
            answers_data,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        attempt = %attempt.id(),
        attempt_number,
        score = card.score,
        passed,
        "quiz attempt recorded"
    );

    Ok(QuizResult {
        attempt_id: attempt.id(),
        score: card.score,
        passed,
        passing_score: quiz.passing_score(),
        attempt_number,
        correct_answers: card.details,
        total_questions: card.total_questions,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct QuizStats {
    pub total_attempts: usize,
    pub passed_attempts: usize,
    pub pass_rate: f64,
    pub average_score: f64,
}

/// `None` when there is nothing to aggregate.
pub fn quiz_stats(attempts: &[AttemptReportRow]) -> Option<QuizStats> {
    if attempts.is_empty() {
        return None;
    }

    let total = attempts.len();
    let passed = attempts.iter().filter(|a| a.passed).count();
    let sum: f64 = attempts.iter().map(|a| a.score).sum();

    Some(QuizStats {
        total_attempts: total,
        passed_attempts: passed,
        pass_rate: passed as f64 / total as f64 * 100.0,
        average_score: sum / total as f64,
    })
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct QuizReport {
    pub course_id: Uuid,
    pub course_title: String,
    pub total_quizzes: i64,
    pub attempts: Vec<AttemptReportRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<QuizStats>,
    pub generated_at: DateTime<Utc>,
}

#[tracing::instrument(skip(mm))]
pub async fn quiz_report(
    mm: &ModelManager,
    student_id: Uuid,
    course_id: Uuid,
) -> ServiceResult<QuizReport> {
    let mut conn = mm.acquire().await?;

    let course = Course::find_by_id(&mut conn, course_id)
        .await?
        .ok_or(ServiceError::not_found(Course::get_resource_type()))?;

    let enrollment = Enrollment::find_by_student_course(&mut conn, student_id, course_id)
        .await?
        .ok_or(ServiceError::NotEnrolled)?;

    let total_quizzes = Quiz::count_by_course(&mut conn, course_id).await?;
    let attempts = AttemptReportRow::fetch_all(&mut conn, enrollment.id()).await?;
    let stats = quiz_stats(&attempts);

    Ok(QuizReport {
        course_id,
        course_title: course.title().to_string(),
        total_quizzes,
        attempts,
        stats,
        generated_at: Utc::now(),
    })
}
