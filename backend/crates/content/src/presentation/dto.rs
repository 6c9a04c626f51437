//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::comment::{CommentRecord, ReplyRecord};
use crate::domain::entity::post::{AuthorCard, PostRecord};
use crate::domain::id::AuthorId;
pub use kernel::page::PagedResponse;

// ============================================================================
// Response envelope
// ============================================================================

/// Plain success response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Success response carrying a payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Comment or reply body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRequest {
    pub text: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Identity fields shown for a post author or liker
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCardDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl From<&AuthorCard> for UserCardDto {
    fn from(card: &AuthorCard) -> Self {
        Self {
            id: card.id.to_string(),
            first_name: card.first_name.clone(),
            last_name: card.last_name.clone(),
            thumbnail: card.thumbnail.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: String,
    pub author: UserCardDto,
    pub caption: String,
    pub location: String,
    pub category: String,
    pub media_url: String,
    pub likes: Vec<UserCardDto>,
    pub like_count: usize,
    pub liked_by_me: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl PostDto {
    pub fn from_record(record: &PostRecord, viewer: &AuthorId) -> Self {
        Self {
            id: record.post.post_id.to_string(),
            author: UserCardDto::from(&record.author),
            caption: record.post.caption.clone(),
            location: record.post.location.clone(),
            category: record.post.category.clone(),
            media_url: record.post.media_url.clone(),
            likes: record.likes.iter().map(UserCardDto::from).collect(),
            like_count: record.likes.len(),
            liked_by_me: record.liked_by(viewer),
            created_at: record.post.created_at,
            updated_at: record.post.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub text: String,
    pub like_count: usize,
    pub liked_by_me: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl CommentDto {
    pub fn from_record(record: &CommentRecord, viewer: &AuthorId) -> Self {
        Self {
            id: record.comment.comment_id.to_string(),
            post_id: record.comment.post_id.to_string(),
            author_id: record.comment.author_id.to_string(),
            text: record.comment.text.clone(),
            like_count: record.likes.len(),
            liked_by_me: record.likes.contains(viewer),
            created_at: record.comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyDto {
    pub id: String,
    pub comment_id: String,
    pub author_id: String,
    pub text: String,
    pub like_count: usize,
    pub liked_by_me: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ReplyDto {
    pub fn from_record(record: &ReplyRecord, viewer: &AuthorId) -> Self {
        Self {
            id: record.reply.reply_id.to_string(),
            comment_id: record.reply.comment_id.to_string(),
            author_id: record.reply.author_id.to_string(),
            text: record.reply.text.clone(),
            like_count: record.likes.len(),
            liked_by_me: record.likes.contains(viewer),
            created_at: record.reply.created_at,
        }
    }
}

/// Result of a like toggle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub success: bool,
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::post::Post;

    fn card(id: AuthorId, first_name: &str) -> AuthorCard {
        AuthorCard {
            id,
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            thumbnail: None,
        }
    }

    #[test]
    fn test_post_dto_marks_viewer_like() {
        let author = AuthorId::new();
        let viewer = AuthorId::new();
        let post = Post::new(
            author,
            "caption".to_string(),
            "Lagos".to_string(),
            "traffic".to_string(),
            "https://cdn.test/x.mp4".to_string(),
            "x".to_string(),
        );
        let record = PostRecord {
            post,
            author: card(author, "Ada"),
            likes: vec![card(viewer, "Grace")],
        };

        let dto = PostDto::from_record(&record, &viewer);
        assert!(dto.liked_by_me);
        assert_eq!(dto.like_count, 1);
        assert_eq!(dto.author.first_name, "Ada");
        assert_eq!(dto.likes[0].first_name, "Grace");
        assert_eq!(dto.category, "traffic");

        let other = PostDto::from_record(&record, &AuthorId::new());
        assert!(!other.liked_by_me);
    }

}
