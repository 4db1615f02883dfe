/// Business logic for blog-service
///
/// Each service owns a cloned `PgPool` handle and speaks sqlx directly;
/// handlers stay thin and delegate here.
pub mod auth;
pub mod comments;
pub mod posts;
pub mod reactions;
pub mod users;

pub use auth::TokenService;
pub use comments::CommentService;
pub use posts::PostService;
pub use reactions::ReactionService;
pub use users::UserService;
