use axum::{
    Router,
    routing::{get, post},
};

pub mod admin;
pub mod auth;
pub mod pages;
pub mod system;

/// Every route; gating is applied by the middleware stack in `app::router`.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/auth/signin", get(pages::signin))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/session", get(auth::session))
        .route("/dashboard", get(pages::dashboard))
        .route("/dashboard/*rest", get(pages::dashboard))
        .route("/admin", get(pages::admin))
        .route("/admin/*rest", get(pages::admin))
        .nest("/api/admin", admin::router())
}
