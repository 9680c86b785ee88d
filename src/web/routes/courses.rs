use axum::{
    Router,
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    model::Page,
    services::{
        catalog::{self, CatalogEntry},
        certification::{self, IssuedCertification},
        course_progress::{self, CourseProgress},
        eligibility::{self, Eligibility},
        quiz_scoring::{self, QuizReport},
    },
    web::{
        AppState, RequestContext, WebResult,
        dto::courses::{EnrollResponse, PaginationQuery},
        error::ErrorResponse,
        middlewares,
        response::{self, ApiResponse},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/catalog", get(courses_catalog_handler))
        .route("/{id}/enroll", post(courses_enroll_handler))
        .route("/{id}/progress", get(courses_progress_handler))
        .route("/{id}/quiz-report", get(courses_quiz_report_handler))
        .route("/{id}/check-eligibility", get(courses_eligibility_handler))
        .route(
            "/{id}/request-certification",
            post(courses_request_certification_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/catalog",
    description = "Lists courses with the caller's enrollment state",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Catalog page", body = ApiResponse<Page<CatalogEntry>>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_catalog_handler(
    ctx: RequestContext,
    Query(page): Query<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let page = catalog::list_catalog(state.pool(), user.user_id(), page.limit(), page.offset()).await?;
    Ok(response::ok(page))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/{id}/enroll",
    description = "Enrolls the caller, 201 when a new enrollment was created",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 201, description = "Enrolled", body = ApiResponse<EnrollResponse>),
        (status = 200, description = "Already enrolled", body = ApiResponse<EnrollResponse>),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_enroll_handler(
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let (enrollment, created) = course_progress::enroll(state.pool(), user.user_id(), id).await?;

    let body = EnrollResponse { enrollment, created };
    if created {
        Ok(response::created(body))
    } else {
        Ok(response::ok(body))
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/progress",
    description = "Per-module progress of the caller in a course",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Progress found", body = ApiResponse<CourseProgress>),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Course not found or not enrolled", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_progress_handler(
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let progress = course_progress::get_course_progress(state.pool(), user.user_id(), id).await?;
    Ok(response::ok(progress))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/quiz-report",
    description = "All quiz attempts of the caller in a course with aggregate stats",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Report generated", body = ApiResponse<QuizReport>),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Course not found or not enrolled", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_quiz_report_handler(
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let report = quiz_scoring::quiz_report(state.pool(), user.user_id(), id).await?;
    Ok(response::ok(report))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/check-eligibility",
    description = "Whether the caller can request a certificate for the course",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Verdict computed", body = ApiResponse<Eligibility>),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_eligibility_handler(
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let verdict = eligibility::check_eligibility(state.pool(), user.user_id(), id).await?;
    Ok(response::ok(verdict))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/{id}/request-certification",
    description = "Issues the certificate and, when a wallet is registered, its token",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 201, description = "Certificate issued", body = ApiResponse<IssuedCertification>),
        (status = 400, description = "Not eligible", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_request_certification_handler(
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let issued = certification::issue_certification(
        state.pool(),
        state.wallets(),
        state.minter(),
        user.user_id(),
        id,
    )
    .await?;
    Ok(response::created(issued))
}
