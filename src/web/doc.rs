use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::web::middlewares::AUTH_TOKEN;

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    AUTH_TOKEN,
                    "JWT token for current student",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::account::account_signup_handler,
        crate::web::routes::account::account_signin_handler,
        crate::web::routes::account::account_verify_handler,
        crate::web::routes::account::account_signout_handler,
        crate::web::routes::video::video_track_handler,
        crate::web::routes::courses::courses_catalog_handler,
        crate::web::routes::courses::courses_enroll_handler,
        crate::web::routes::courses::courses_progress_handler,
        crate::web::routes::courses::courses_quiz_report_handler,
        crate::web::routes::courses::courses_eligibility_handler,
        crate::web::routes::courses::courses_request_certification_handler,
        crate::web::routes::quizzes::quizzes_take_handler,
        crate::web::routes::certificates::certificates_mine_handler,
        crate::web::routes::certificates::certificates_verify_handler,
        crate::web::routes::wallets::wallets_list_handler,
        crate::web::routes::wallets::wallets_create_handler,
    ),
    tags(
        (name = "account", description = "Sign up, sign in, session"),
        (name = "video", description = "Watch-time tracking"),
        (name = "courses", description = "Catalog, enrollment, progress and certification"),
        (name = "quizzes", description = "Quiz attempts"),
        (name = "certificates", description = "Issued certificates"),
        (name = "wallets", description = "Payment addresses for certificate tokens"),
    ),
    modifiers(&CookieAuthModifier),
)]
pub struct ApiDoc;
