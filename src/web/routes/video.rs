use axum::{
    Router, extract::State, middleware, response::IntoResponse, routing::post,
};

use crate::{
    services::video_tracking::{self, TrackedView},
    web::{
        AppState, Json, RequestContext, WebError, WebResult,
        dto::video::TrackViewBody,
        error::ErrorResponse,
        middlewares,
        response::{self, ApiResponse},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/track", post(video_track_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/video/track",
    description = "Records watch time for a module video and refreshes course progress",
    request_body = TrackViewBody,
    responses(
        (status = 200, description = "View recorded", body = ApiResponse<TrackedView>),
        (status = 400, description = "module_id missing or negative duration", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "video",
    security(
        ("cookie" = [])
    )
)]
async fn video_track_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(req): Json<TrackViewBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let module_id = req
        .module_id
        .ok_or(WebError::bad_request("module_id is required"))?;

    let tracked = video_tracking::track_view(
        state.pool(),
        user.user_id(),
        module_id,
        req.watch_duration,
        req.total_duration,
        state.config().certification().completion_threshold(),
    )
    .await?;

    Ok(response::ok(tracked))
}
