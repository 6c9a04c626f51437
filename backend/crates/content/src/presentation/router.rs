//! Content Router
//!
//! All content routes sit behind the session gate.

use axum::middleware::from_fn_with_state;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use auth::domain::repository::IdentityRepository;
use auth::middleware::{require_session, AuthGateState};

use crate::domain::repository::ContentRepository;
use crate::presentation::handlers::{self, ContentAppState};
use platform::media::MediaStore;

/// Create the content router, gated by the given auth state
pub fn content_router<R, A>(
    repo: Arc<R>,
    media: Arc<dyn MediaStore>,
    gate: AuthGateState<A>,
) -> Router
where
    R: ContentRepository + Clone + Send + Sync + 'static,
    A: IdentityRepository + Clone + Send + Sync + 'static,
{
    let state = ContentAppState { repo, media };

    Router::new()
        .route("/upload-post", post(handlers::upload_post::<R>))
        .route("/get-all-posts", get(handlers::get_all_posts::<R>))
        .route("/get-user-posts", get(handlers::get_user_posts::<R>))
        .route(
            "/get-posts-by-location/{location}",
            get(handlers::get_posts_by_location::<R>),
        )
        .route("/update-post/{postId}", patch(handlers::update_post::<R>))
        .route("/delete-post/{postId}", delete(handlers::delete_post::<R>))
        .route("/like-post/{postId}", patch(handlers::like_post::<R>))
        .route("/comment-post/{postId}", post(handlers::comment_post::<R>))
        .route(
            "/get-post-comments/{postId}",
            get(handlers::get_post_comments::<R>),
        )
        .route(
            "/update-comment/{commentId}",
            patch(handlers::update_comment::<R>),
        )
        .route(
            "/delete-comment/{commentId}",
            delete(handlers::delete_comment::<R>),
        )
        .route(
            "/like-comment/{commentId}",
            patch(handlers::like_comment::<R>),
        )
        .route(
            "/reply-comment/{commentId}",
            post(handlers::reply_comment::<R>),
        )
        .route(
            "/get-comment-replies/{commentId}",
            get(handlers::get_comment_replies::<R>),
        )
        .route("/update-reply/{replyId}", patch(handlers::update_reply::<R>))
        .route(
            "/delete-reply/{replyId}",
            delete(handlers::delete_reply::<R>),
        )
        .route("/like-reply/{replyId}", patch(handlers::like_reply::<R>))
        .layer(from_fn_with_state(gate, require_session::<A>))
        .with_state(state)
}
