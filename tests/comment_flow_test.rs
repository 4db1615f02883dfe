//! Comment feed, reaction toggling, and owner-only comment editing,
//! exercised end to end over HTTP against a containerized Postgres.

mod support;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::{json, Value};
use uuid::Uuid;

use blog_service::models::PostCategory;

macro_rules! test_app {
    ($db:expr) => {{
        let (pool_data, tokens_data) =
            blog_service::app_data($db.pool.clone(), $db.tokens.clone());
        test::init_service(
            App::new()
                .app_data(pool_data)
                .app_data(tokens_data)
                .configure(blog_service::routes),
        )
        .await
    }};
}

#[actix_web::test]
async fn reaction_walkthrough_like_then_dislike_twice() {
    let db = support::setup().await;
    let app = test_app!(db);

    let author = support::seed_user(&db.pool, "author1", "seedpass1", false).await;
    let reader = support::seed_user(&db.pool, "reader1", "seedpass1", false).await;
    let post = support::seed_post(&db.pool, author, "First post", PostCategory::General, false).await;
    let comment = support::seed_comment(&db.pool, post, author, "nice read", 0.0).await;

    let auth = db.bearer(reader, false);

    // neutral -> like => liked (1, 0)
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/comments/like/{comment}"))
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "liked");
    assert_eq!(body["likesCount"], 1);
    assert_eq!(body["dislikesCount"], 0);
    support::assert_counters(&db.pool, comment, 1, 0).await;

    // liked -> dislike => disliked (0, 1), single membership row throughout
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/comments/dislike/{comment}"))
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "disliked");
    assert_eq!(body["likesCount"], 0);
    assert_eq!(body["dislikesCount"], 1);
    support::assert_counters(&db.pool, comment, 0, 1).await;
    assert_eq!(support::membership_rows(&db.pool, comment, reader).await, 1);

    // disliked -> dislike again => back to neutral (0, 0)
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/comments/dislike/{comment}"))
        .insert_header(("Authorization", auth))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "neutral");
    assert_eq!(body["likesCount"], 0);
    assert_eq!(body["dislikesCount"], 0);
    support::assert_counters(&db.pool, comment, 0, 0).await;
    assert_eq!(support::membership_rows(&db.pool, comment, reader).await, 0);
}

#[actix_web::test]
async fn double_like_returns_to_neutral() {
    let db = support::setup().await;
    let app = test_app!(db);

    let author = support::seed_user(&db.pool, "author1", "seedpass1", false).await;
    let reader = support::seed_user(&db.pool, "reader1", "seedpass1", false).await;
    let post = support::seed_post(&db.pool, author, "First post", PostCategory::General, false).await;
    let comment = support::seed_comment(&db.pool, post, author, "nice read", 0.0).await;

    let auth = db.bearer(reader, false);
    for expected in ["liked", "neutral"] {
        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/comments/like/{comment}"))
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], expected);
    }
    support::assert_counters(&db.pool, comment, 0, 0).await;
}

#[actix_web::test]
async fn reactions_from_two_users_are_independent() {
    let db = support::setup().await;
    let app = test_app!(db);

    let author = support::seed_user(&db.pool, "author1", "seedpass1", false).await;
    let alice = support::seed_user(&db.pool, "alice", "seedpass1", false).await;
    let bob = support::seed_user(&db.pool, "bobby", "seedpass1", false).await;
    let post = support::seed_post(&db.pool, author, "First post", PostCategory::General, false).await;
    let comment = support::seed_comment(&db.pool, post, author, "nice read", 0.0).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/comments/like/{comment}"))
        .insert_header(("Authorization", db.bearer(alice, false)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/comments/dislike/{comment}"))
        .insert_header(("Authorization", db.bearer(bob, false)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["likesCount"], 1);
    assert_eq!(body["dislikesCount"], 1);
    support::assert_counters(&db.pool, comment, 1, 1).await;

    // Alice flips to dislike without touching Bob's membership
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/comments/dislike/{comment}"))
        .insert_header(("Authorization", db.bearer(alice, false)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "disliked");
    support::assert_counters(&db.pool, comment, 0, 2).await;
}

#[actix_web::test]
async fn reacting_to_missing_comment_is_not_found() {
    let db = support::setup().await;
    let app = test_app!(db);

    let reader = support::seed_user(&db.pool, "reader1", "seedpass1", false).await;
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/comments/like/{}", Uuid::new_v4()))
        .insert_header(("Authorization", db.bearer(reader, false)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn feed_pages_newest_first_in_twos() {
    let db = support::setup().await;
    let app = test_app!(db);

    let author = support::seed_user(&db.pool, "author1", "seedpass1", false).await;
    let post = support::seed_post(&db.pool, author, "First post", PostCategory::General, false).await;

    // c5 is newest (smallest age), c1 oldest
    for i in 1..=5 {
        let age = (6 - i) as f64 * 60.0;
        support::seed_comment(&db.pool, post, author, &format!("comment {i}"), age).await;
    }

    // page 0: two newest, cursor advances
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/comments?postId={post}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["description"], "comment 5");
    assert_eq!(comments[1]["description"], "comment 4");
    assert_eq!(body["nextCursor"], 1);

    // page 1
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/comments?postId={post}&cursor=1"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["description"], "comment 3");
    assert_eq!(body["nextCursor"], 2);

    // page 2: short page terminates the cursor chain
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/comments?postId={post}&cursor=2"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["description"], "comment 1");
    assert!(body["nextCursor"].is_null());
}

#[actix_web::test]
async fn feed_items_carry_reaction_membership_arrays() {
    let db = support::setup().await;
    let app = test_app!(db);

    let author = support::seed_user(&db.pool, "author1", "seedpass1", false).await;
    let alice = support::seed_user(&db.pool, "alice", "seedpass1", false).await;
    let bob = support::seed_user(&db.pool, "bobby", "seedpass1", false).await;
    let post = support::seed_post(&db.pool, author, "First post", PostCategory::General, false).await;
    let comment = support::seed_comment(&db.pool, post, author, "nice read", 0.0).await;

    for (user, kind) in [(alice, "like"), (bob, "dislike")] {
        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/comments/{kind}/{comment}"))
            .insert_header(("Authorization", db.bearer(user, false)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/comments?postId={post}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let item = &body["comments"][0];
    assert_eq!(item["userName"], "author1");
    assert_eq!(item["likes"], json!([alice.to_string()]));
    assert_eq!(item["dislikes"], json!([bob.to_string()]));
    assert_eq!(item["likesCount"], 1);
    assert_eq!(item["dislikesCount"], 1);
}

#[actix_web::test]
async fn comment_crud_is_owner_only() {
    let db = support::setup().await;
    let app = test_app!(db);

    let author = support::seed_user(&db.pool, "author1", "seedpass1", false).await;
    let alice = support::seed_user(&db.pool, "alice", "seedpass1", false).await;
    let bob = support::seed_user(&db.pool, "bobby", "seedpass1", false).await;
    let post = support::seed_post(&db.pool, author, "First post", PostCategory::General, false).await;

    // Alice writes a comment
    let req = test::TestRequest::post()
        .uri("/api/v1/comments")
        .insert_header(("Authorization", db.bearer(alice, false)))
        .set_json(json!({ "postId": post, "description": "hello there" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let comment_id: Uuid = created["id"].as_str().unwrap().parse().unwrap();
    assert_eq!(created["description"], "hello there");

    // Bob may not edit or delete it
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/comments/{comment_id}"))
        .insert_header(("Authorization", db.bearer(bob, false)))
        .set_json(json!({ "description": "hijacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/comments/{comment_id}"))
        .insert_header(("Authorization", db.bearer(bob, false)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Alice can
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/comments/{comment_id}"))
        .insert_header(("Authorization", db.bearer(alice, false)))
        .set_json(json!({ "description": "hello, edited" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["description"], "hello, edited");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/comments/{comment_id}"))
        .insert_header(("Authorization", db.bearer(alice, false)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(support::comment_count_for_post(&db.pool, post).await, 0);
}

#[actix_web::test]
async fn commenting_on_missing_post_is_not_found() {
    let db = support::setup().await;
    let app = test_app!(db);

    let alice = support::seed_user(&db.pool, "alice", "seedpass1", false).await;
    let req = test::TestRequest::post()
        .uri("/api/v1/comments")
        .insert_header(("Authorization", db.bearer(alice, false)))
        .set_json(json!({ "postId": Uuid::new_v4(), "description": "into the void" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unauthenticated_mutations_change_nothing() {
    let db = support::setup().await;
    let app = test_app!(db);

    let author = support::seed_user(&db.pool, "author1", "seedpass1", false).await;
    let post = support::seed_post(&db.pool, author, "First post", PostCategory::General, false).await;
    let comment = support::seed_comment(&db.pool, post, author, "nice read", 0.0).await;

    // no header
    let req = test::TestRequest::post()
        .uri("/api/v1/comments")
        .set_json(json!({ "postId": post, "description": "drive-by" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // garbage token
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/comments/like/{comment}"))
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(support::comment_count_for_post(&db.pool, post).await, 1);
    support::assert_counters(&db.pool, comment, 0, 0).await;

    // reading the feed stays public
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/comments?postId={post}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn blank_comment_body_is_rejected() {
    let db = support::setup().await;
    let app = test_app!(db);

    let author = support::seed_user(&db.pool, "author1", "seedpass1", false).await;
    let post = support::seed_post(&db.pool, author, "First post", PostCategory::General, false).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/comments")
        .insert_header(("Authorization", db.bearer(author, false)))
        .set_json(json!({ "postId": post, "description": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(support::comment_count_for_post(&db.pool, post).await, 0);
}
