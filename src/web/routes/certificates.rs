use axum::{
    Router,
    extract::{Query, State},
    middleware,
    response::IntoResponse,
    routing::get,
};

use crate::{
    services::certification::{self, CertificateSummary},
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::certificates::VerifyQuery,
        error::ErrorResponse,
        middlewares,
        response::{self, ApiResponse},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    let protected = Router::new()
        .route("/mine", get(certificates_mine_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ));

    // verification is public, a stale cookie must not turn it into a 401
    Router::new()
        .route("/verify", get(certificates_verify_handler))
        .merge(protected)
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates/mine",
    description = "Certificates issued to the caller",
    responses(
        (status = 200, description = "Certificates found", body = ApiResponse<Vec<CertificateSummary>>),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "certificates",
    security(
        ("cookie" = [])
    )
)]
async fn certificates_mine_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let certificates = certification::my_certificates(state.pool(), user.user_id()).await?;
    Ok(response::ok(certificates))
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates/verify",
    description = "Looks up a certificate by the fingerprint of its token",
    params(VerifyQuery),
    responses(
        (status = 200, description = "Certificate found", body = ApiResponse<CertificateSummary>),
        (status = 400, description = "Fingerprint missing", body = ErrorResponse),
        (status = 404, description = "Unknown fingerprint", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "certificates"
)]
async fn certificates_verify_handler(
    Query(query): Query<VerifyQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let fingerprint = query
        .fingerprint
        .ok_or(WebError::bad_request("fingerprint is required"))?;
    let summary = certification::verify_certificate(state.pool(), &fingerprint).await?;
    Ok(response::ok(summary))
}
