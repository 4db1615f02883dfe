//! Blog platform backend.
//!
//! Authenticated users read posts, write comments, and like/dislike
//! them; administrators manage posts and users. HTTP handlers sit over
//! per-entity services that speak sqlx/Postgres; identity arrives as a
//! bearer token whose claims (user id + admin flag) the core trusts as
//! given.
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;

use actix_web::web;

use crate::services::TokenService;

/// Register the full API route table.
///
/// Specific paths (`/posts/featured`, `/posts/visit/{id}`) come before
/// the `/posts/{id}` resource so they are matched first.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health))
            .route("/auth/register", web::post().to(handlers::register))
            .route("/auth/login", web::post().to(handlers::login))
            .service(
                web::resource("/comments")
                    .route(web::get().to(handlers::get_post_comments))
                    .route(web::post().to(handlers::create_comment)),
            )
            .route(
                "/comments/like/{id}",
                web::patch().to(handlers::like_comment),
            )
            .route(
                "/comments/dislike/{id}",
                web::patch().to(handlers::dislike_comment),
            )
            .service(
                web::resource("/comments/{id}")
                    .route(web::put().to(handlers::update_comment))
                    .route(web::delete().to(handlers::delete_comment)),
            )
            .route("/posts/featured", web::get().to(handlers::get_featured_posts))
            .route(
                "/posts/visit/{id}",
                web::patch().to(handlers::increment_visit),
            )
            .route(
                "/posts/{id}/related",
                web::get().to(handlers::get_related_posts),
            )
            .service(
                web::resource("/posts")
                    .route(web::get().to(handlers::get_posts))
                    .route(web::post().to(handlers::create_post)),
            )
            .service(
                web::resource("/posts/{id}")
                    .route(web::get().to(handlers::get_post))
                    .route(web::put().to(handlers::update_post))
                    .route(web::delete().to(handlers::delete_post)),
            )
            .service(
                web::resource("/users")
                    .route(web::get().to(handlers::get_users))
                    .route(web::post().to(handlers::create_user)),
            )
            .service(
                web::resource("/users/{id}")
                    .route(web::put().to(handlers::update_user))
                    .route(web::delete().to(handlers::delete_user)),
            ),
    );
}

/// Build the shared app data (pool + token codec) for an App instance
pub fn app_data(
    pool: sqlx::PgPool,
    tokens: TokenService,
) -> (web::Data<sqlx::PgPool>, web::Data<TokenService>) {
    (web::Data::new(pool), web::Data::new(tokens))
}

/// Liveness/readiness: one round-trip to the store
async fn health(pool: web::Data<sqlx::PgPool>) -> actix_web::HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => actix_web::HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "blog-service",
        })),
    }
}
