use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/session", get(handlers::get_session))
        .route("/api/login", post(handlers::login))
        .route("/api/guest", post(handlers::guest))
        .route("/api/logout", post(handlers::logout))
        .route("/api/chat", post(handlers::chat))
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/memories", get(handlers::memories))
        .route("/api/journal", get(handlers::list_journal).post(handlers::save_journal))
        .route("/api/journal/export", get(handlers::export_journal))
        .route("/api/habits", get(handlers::list_habits).post(handlers::add_habit))
        .route("/api/habits/toggle", post(handlers::toggle_habit))
        .with_state(state)
}
