use crate::{
    Config,
    web::{AppState, doc::ApiDoc},
};
use axum::Router;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod account;
pub mod certificates;
pub mod courses;
pub mod quizzes;
pub mod video;
pub mod wallets;

pub fn build_app<S: Send + Sync + Clone + 'static>(
    state: AppState,
    config: &'static Config,
) -> Router<S> {
    let mut router = Router::new()
        .nest("/api/v1/account", account::routes(state.clone()))
        .nest("/api/v1/video", video::routes(state.clone()))
        .nest("/api/v1/courses", courses::routes(state.clone()))
        .nest("/api/v1/quizzes", quizzes::routes(state.clone()))
        .nest("/api/v1/certificates", certificates::routes(state.clone()))
        .merge(wallets::routes(state.clone()))
        .layer(CookieManagerLayer::default())
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    if config.app().docs() {
        let openapi = ApiDoc::openapi();

        router = router.merge(SwaggerUi::new("/api/v1/docs").url("/api-doc/openapi.json", openapi));
    }

    router
}
