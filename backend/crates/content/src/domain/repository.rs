//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::comment::{Comment, CommentRecord, Reply, ReplyRecord};
use crate::domain::entity::post::{Post, PostRecord};
use crate::domain::id::{AuthorId, CommentId, PostId, ReplyId};
use crate::error::ContentResult;
use kernel::page::{Page, Paged};

/// Content repository trait covering posts, comments, replies and likes
#[trait_variant::make(ContentRepository: Send)]
pub trait LocalContentRepository {
    // ---- posts ----

    async fn create_post(&self, post: &Post) -> ContentResult<()>;

    async fn find_post(&self, post_id: &PostId) -> ContentResult<Option<PostRecord>>;

    /// One page of all posts, newest first
    async fn list_posts(&self, page: Page) -> ContentResult<Paged<PostRecord>>;

    /// One page of posts by one author, newest first
    async fn list_posts_by_author(
        &self,
        author_id: &AuthorId,
        page: Page,
    ) -> ContentResult<Paged<PostRecord>>;

    /// One page of posts whose location contains the needle
    /// (case-insensitive), newest first
    async fn list_posts_by_location(
        &self,
        location: &str,
        page: Page,
    ) -> ContentResult<Paged<PostRecord>>;

    async fn update_post(&self, post: &Post) -> ContentResult<()>;

    /// Delete a post with its comments, replies and likes
    async fn delete_post(&self, post_id: &PostId) -> ContentResult<()>;

    /// Toggle a like; returns true when the post is liked afterwards
    async fn toggle_post_like(&self, post_id: &PostId, author_id: &AuthorId)
        -> ContentResult<bool>;

    // ---- comments ----

    async fn create_comment(&self, comment: &Comment) -> ContentResult<()>;

    async fn find_comment(&self, comment_id: &CommentId) -> ContentResult<Option<CommentRecord>>;

    /// Comments of a post, oldest first
    async fn list_comments(&self, post_id: &PostId) -> ContentResult<Vec<CommentRecord>>;

    async fn update_comment(&self, comment: &Comment) -> ContentResult<()>;

    /// Delete a comment with its replies and likes
    async fn delete_comment(&self, comment_id: &CommentId) -> ContentResult<()>;

    /// Toggle a like; returns true when the comment is liked afterwards
    async fn toggle_comment_like(
        &self,
        comment_id: &CommentId,
        author_id: &AuthorId,
    ) -> ContentResult<bool>;

    // ---- replies ----

    async fn create_reply(&self, reply: &Reply) -> ContentResult<()>;

    async fn find_reply(&self, reply_id: &ReplyId) -> ContentResult<Option<ReplyRecord>>;

    /// Replies of a comment, oldest first
    async fn list_replies(&self, comment_id: &CommentId) -> ContentResult<Vec<ReplyRecord>>;

    async fn update_reply(&self, reply: &Reply) -> ContentResult<()>;

    async fn delete_reply(&self, reply_id: &ReplyId) -> ContentResult<()>;

    /// Toggle a like; returns true when the reply is liked afterwards
    async fn toggle_reply_like(
        &self,
        reply_id: &ReplyId,
        author_id: &AuthorId,
    ) -> ContentResult<bool>;
}
