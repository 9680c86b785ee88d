use axum::{
    Router,
    extract::{Path, State},
    middleware,
    response::IntoResponse,
    routing::post,
};
use uuid::Uuid;

use crate::{
    services::quiz_scoring::{self, QuizResult},
    web::{
        AppState, Json, RequestContext, WebResult,
        dto::quizzes::TakeQuizBody,
        error::ErrorResponse,
        middlewares,
        response::{self, ApiResponse},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{id}/take", post(quizzes_take_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/quizzes/{id}/take",
    description = "Scores a submission and records it as a new attempt",
    params(("id" = Uuid, Path, description = "Quiz id")),
    request_body = TakeQuizBody,
    responses(
        (status = 200, description = "Attempt recorded", body = ApiResponse<QuizResult>),
        (status = 400, description = "Maximum attempts reached", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Quiz not found or not enrolled", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "quizzes"
)]
async fn quizzes_take_handler(
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(req): Json<TakeQuizBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let result = quiz_scoring::take_quiz(state.pool(), user.user_id(), id, req.answers).await?;
    Ok(response::ok(result))
}
