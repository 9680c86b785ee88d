use axum::{
    Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::{get, post},
};
use chrono::Duration;
use tower_cookies::{Cookie, Cookies, cookie::SameSite};

use crate::{
    auth::{self, SESSION_TTL_HOURS, SessionClaims, hash_password, verify_password},
    model::{
        CrudRepository, ResourceTyped,
        entity::{UserEntity, UserEntityCreate},
    },
    web::{
        AppState, Json, RequestContext, WebError, WebResult,
        dto::account::{AccountResponse, SigninBody, SignupBody},
        error::ErrorResponse,
        middlewares::{self, AUTH_TOKEN},
        response::{self, ApiResponse},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    let protected = Router::new()
        .route("/verify", get(account_verify_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ));

    Router::new()
        .route("/signup", post(account_signup_handler))
        .route("/signin", post(account_signin_handler))
        .route("/signout", post(account_signout_handler))
        .merge(protected)
        .with_state(state)
}

fn set_session_cookie(state: &AppState, cookies: &Cookies, user: &UserEntity) -> WebResult<()> {
    let claims = SessionClaims::for_user(user.id(), Duration::hours(SESSION_TTL_HOURS));
    let token = auth::generate_token(claims, state.config().app().jwt())
        .map_err(|e| WebError::server_crypt_error(e.into()))?;

    let mut cookie = Cookie::new(AUTH_TOKEN, token);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookies.add(cookie);
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/v1/account/signup",
    request_body = SignupBody,
    description = "Creates a student account and signs it in",
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AccountResponse>),
        (status = 400, description = "Username or password missing", body = ErrorResponse),
        (status = 409, description = "User already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "account"
)]
async fn account_signup_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<SignupBody>,
) -> WebResult<impl IntoResponse> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(WebError::bad_request("username and password are required"));
    }

    let mut conn = state
        .pool()
        .acquire()
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    let found = UserEntity::find_by_username(&mut conn, username)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;
    if found.is_some() {
        return Err(WebError::registration_conflict());
    }

    let hash = hash_password(&payload.password).map_err(WebError::server_crypt_error)?;
    let created = UserEntity::create(
        &mut conn,
        UserEntityCreate {
            username: username.to_string(),
            full_name: payload.full_name.trim().to_string(),
            password_hash: hash,
        },
    )
    .await
    .map_err(|e| {
        if e.is_unique_violation() {
            WebError::registration_conflict()
        } else {
            WebError::resource_fetch_error(UserEntity::get_resource_type(), e)
        }
    })?;

    set_session_cookie(&state, &cookies, &created)?;
    tracing::info!(user = %created.id(), "account created");

    Ok(response::created(AccountResponse::from(&created)))
}

#[utoipa::path(
    post,
    path = "/api/v1/account/signin",
    description = "Signs a student in",
    request_body = SigninBody,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<AccountResponse>),
        (status = 401, description = "Credentials invalid", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "account",
)]
async fn account_signin_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<SigninBody>,
) -> WebResult<impl IntoResponse> {
    let mut conn = state
        .pool()
        .acquire()
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    let found = UserEntity::find_by_username(&mut conn, payload.username.trim())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or(WebError::auth_invalid_credentials())?;

    let is_verified =
        verify_password(found.hash(), &payload.password).map_err(WebError::server_crypt_error)?;
    if !is_verified {
        return Err(WebError::auth_invalid_credentials());
    }

    set_session_cookie(&state, &cookies, &found)?;

    Ok(response::ok(AccountResponse::from(&found)))
}

#[utoipa::path(
    get,
    path = "/api/v1/account/verify",
    description = "Returns the signed-in student",
    responses(
        (status = 200, description = "Session valid", body = ApiResponse<AccountResponse>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
    ),
    tag = "account",
    security(
        ("cookie" = [])
    )
)]
async fn account_verify_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let mut conn = state
        .pool()
        .acquire()
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;
    let found = UserEntity::find_by_id(&mut conn, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or(WebError::auth_required())?;

    Ok(response::ok(AccountResponse::from(&found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/account/signout",
    description = "Drops the session cookie",
    responses(
        (status = 204, description = "Signed out"),
    ),
    tag = "account"
)]
async fn account_signout_handler(cookies: Cookies) -> impl IntoResponse {
    let mut cookie = Cookie::from(AUTH_TOKEN);
    cookie.set_path("/");
    cookies.remove(cookie);
    StatusCode::NO_CONTENT
}
