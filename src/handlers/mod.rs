/// HTTP handlers for blog-service
///
/// Handlers stay thin: deserialize, validate, resolve identity, delegate
/// to a service, shape the response.
pub mod auth;
pub mod comments;
pub mod posts;
pub mod users;

pub use auth::{login, register};
pub use comments::{
    create_comment, delete_comment, dislike_comment, get_post_comments, like_comment,
    update_comment,
};
pub use posts::{
    create_post, delete_post, get_featured_posts, get_post, get_posts, get_related_posts,
    increment_visit, update_post,
};
pub use users::{create_user, delete_user, get_users, update_user};
