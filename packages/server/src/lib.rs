pub mod bootstrap;
pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;
pub mod workflow;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Resource Hub API",
        version = "1.0.0",
        description = "Community resource sharing with moderated submissions and supplements"
    ),
    paths(
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::change_password,
        handlers::resource::list_resources,
        handlers::resource::list_public_resources,
        handlers::resource::list_pending,
        handlers::resource::list_pending_supplements,
        handlers::resource::create_resource,
        handlers::resource::get_resource,
        handlers::resource::update_resource,
        handlers::resource::delete_resource,
        handlers::resource::hide_resource,
        handlers::resource::decide_resource,
        handlers::resource::submit_supplement,
        handlers::resource::get_supplement,
        handlers::resource::get_history,
        handlers::resource::like_resource,
        handlers::resource::unlike_resource,
        handlers::upload::upload_images,
    ),
    tags(
        (name = "Auth", description = "Admin authentication"),
        (name = "Resources", description = "Submission, browsing and likes"),
        (name = "Moderation", description = "Decisions, supplements and audit history"),
        (name = "Uploads", description = "Image staging"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age));

    if config.allow_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);
    let assets = ServeDir::new(&state.config.storage.assets_dir);

    axum::Router::new()
        .nest("/api", routes::api_routes(&state.config))
        .with_state(state)
        .nest_service("/assets", assets)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
}
