//! Comment and Reply Entities

use chrono::{DateTime, Utc};

use crate::domain::id::{AuthorId, CommentId, PostId, ReplyId};

/// A comment on a post
#[derive(Debug, Clone)]
pub struct Comment {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub author_id: AuthorId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: PostId, author_id: AuthorId, text: String) -> Self {
        let now = Utc::now();
        Self {
            comment_id: CommentId::new(),
            post_id,
            author_id,
            text,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, author_id: &AuthorId) -> bool {
        &self.author_id == author_id
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
        self.updated_at = Utc::now();
    }
}

/// A reply to a comment. Replies are one level deep, never nested further.
#[derive(Debug, Clone)]
pub struct Reply {
    pub reply_id: ReplyId,
    pub comment_id: CommentId,
    pub author_id: AuthorId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reply {
    pub fn new(comment_id: CommentId, author_id: AuthorId, text: String) -> Self {
        let now = Utc::now();
        Self {
            reply_id: ReplyId::new(),
            comment_id,
            author_id,
            text,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, author_id: &AuthorId) -> bool {
        &self.author_id == author_id
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
        self.updated_at = Utc::now();
    }
}

/// A comment together with who liked it
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub comment: Comment,
    pub likes: Vec<AuthorId>,
}

/// A reply together with who liked it
#[derive(Debug, Clone)]
pub struct ReplyRecord {
    pub reply: Reply,
    pub likes: Vec<AuthorId>,
}
