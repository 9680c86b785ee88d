use axum::{
    Router, extract::State, middleware, response::IntoResponse, routing::get,
};

use crate::{
    model::entity::Wallet,
    services::wallets,
    web::{
        AppState, Json, RequestContext, WebError, WebResult,
        dto::wallets::WalletCreateBody,
        error::ErrorResponse,
        middlewares,
        response::{self, ApiResponse},
    },
};

/// Mounted at the full path rather than nested, so `/api/v1/wallets` itself matches.
pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route(
            "/api/v1/wallets",
            get(wallets_list_handler).post(wallets_create_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/wallets",
    description = "Wallet addresses registered by the caller, oldest first",
    responses(
        (status = 200, description = "Wallets found", body = ApiResponse<Vec<Wallet>>),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "wallets",
    security(
        ("cookie" = [])
    )
)]
async fn wallets_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let found = wallets::list_wallets(state.pool(), user.user_id()).await?;
    Ok(response::ok(found))
}

#[utoipa::path(
    post,
    path = "/api/v1/wallets",
    description = "Registers a read-only payment address. The oldest one receives certificate tokens.",
    request_body = WalletCreateBody,
    responses(
        (status = 201, description = "Wallet registered", body = ApiResponse<Wallet>),
        (status = 400, description = "Invalid or duplicate address", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "wallets",
    security(
        ("cookie" = [])
    )
)]
async fn wallets_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(req): Json<WalletCreateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let payment_address = req
        .payment_address
        .ok_or(WebError::bad_request("payment_address is required"))?;

    let wallet = wallets::register_wallet(
        state.pool(),
        user.user_id(),
        req.name,
        payment_address,
        req.network,
    )
    .await?;

    Ok(response::created(wallet))
}
