use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/session", get(handlers::get_session))
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/refresh", post(handlers::refresh))
        .route("/api/profile", put(handlers::update_profile))
        .route("/api/profile/name", post(handlers::update_name))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route(
            "/api/mood-form",
            get(handlers::get_mood_form).delete(handlers::discard_mood_form),
        )
        .route("/api/mood-form/continue", post(handlers::continue_mood_form))
        .route("/api/mood-form/submit", post(handlers::submit_mood_form))
        .with_state(state)
}
