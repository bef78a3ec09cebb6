use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/resources", resource_routes())
        .nest("/uploads", upload_routes(config))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
        .route("/change-password", post(handlers::auth::change_password))
}

fn resource_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::resource::list_resources).post(handlers::resource::create_resource),
        )
        .route("/public", get(handlers::resource::list_public_resources))
        .route("/pending", get(handlers::resource::list_pending))
        .route(
            "/pending-supplements",
            get(handlers::resource::list_pending_supplements),
        )
        .route(
            "/{id}",
            get(handlers::resource::get_resource)
                .patch(handlers::resource::update_resource)
                .delete(handlers::resource::delete_resource),
        )
        .route(
            "/{id}/record",
            delete(handlers::resource::hide_resource),
        )
        .route("/{id}/decision", put(handlers::resource::decide_resource))
        .route(
            "/{id}/supplement",
            get(handlers::resource::get_supplement).put(handlers::resource::submit_supplement),
        )
        .route("/{id}/history", get(handlers::resource::get_history))
        .route("/{id}/like", post(handlers::resource::like_resource))
        .route("/{id}/unlike", post(handlers::resource::unlike_resource))
}

fn upload_routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::upload::upload_images))
        .layer(handlers::upload::upload_body_limit(
            config.storage.max_upload_size,
        ))
}
