//! Comment Use Cases

use std::sync::Arc;

use crate::domain::entity::comment::{Comment, CommentRecord};
use crate::domain::id::{AuthorId, CommentId, PostId};
use crate::domain::repository::ContentRepository;
use crate::error::{ContentError, ContentResult};

/// Comment use case
pub struct CommentUseCase<R>
where
    R: ContentRepository,
{
    repo: Arc<R>,
}

impl<R> CommentUseCase<R>
where
    R: ContentRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn add(
        &self,
        author_id: AuthorId,
        post_id: PostId,
        text: String,
    ) -> ContentResult<CommentRecord> {
        let text = non_empty_text(text)?;

        if self.repo.find_post(&post_id).await?.is_none() {
            return Err(ContentError::PostNotFound);
        }

        let comment = Comment::new(post_id, author_id, text);
        self.repo.create_comment(&comment).await?;

        Ok(CommentRecord {
            comment,
            likes: Vec::new(),
        })
    }

    pub async fn list(&self, post_id: &PostId) -> ContentResult<Vec<CommentRecord>> {
        if self.repo.find_post(post_id).await?.is_none() {
            return Err(ContentError::PostNotFound);
        }
        self.repo.list_comments(post_id).await
    }

    pub async fn update(
        &self,
        author_id: &AuthorId,
        comment_id: &CommentId,
        text: String,
    ) -> ContentResult<CommentRecord> {
        let text = non_empty_text(text)?;

        let record = self
            .repo
            .find_comment(comment_id)
            .await?
            .ok_or(ContentError::CommentNotFound)?;

        let mut comment = record.comment;
        if !comment.is_authored_by(author_id) {
            return Err(ContentError::NotOwner);
        }

        comment.set_text(text);
        self.repo.update_comment(&comment).await?;

        Ok(CommentRecord {
            comment,
            likes: record.likes,
        })
    }

    pub async fn delete(&self, author_id: &AuthorId, comment_id: &CommentId) -> ContentResult<()> {
        let record = self
            .repo
            .find_comment(comment_id)
            .await?
            .ok_or(ContentError::CommentNotFound)?;

        if !record.comment.is_authored_by(author_id) {
            return Err(ContentError::NotOwner);
        }

        self.repo.delete_comment(comment_id).await
    }

    /// Toggle the caller's like; returns true when the comment ends up liked.
    pub async fn toggle_like(
        &self,
        author_id: &AuthorId,
        comment_id: &CommentId,
    ) -> ContentResult<bool> {
        if self.repo.find_comment(comment_id).await?.is_none() {
            return Err(ContentError::CommentNotFound);
        }
        self.repo.toggle_comment_like(comment_id, author_id).await
    }
}

pub(crate) fn non_empty_text(text: String) -> ContentResult<String> {
    let trimmed = text.trim().to_string();
    if trimmed.is_empty() {
        return Err(ContentError::MissingField("text".to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_post, TestContentRepository};

    #[tokio::test]
    async fn test_comment_lifecycle() {
        let repo = Arc::new(TestContentRepository::default());
        let post = seed_post(&repo, &AuthorId::new()).await;
        let uc = CommentUseCase::new(repo);
        let commenter = AuthorId::new();

        let record = uc
            .add(commenter.clone(), post.post_id.clone(), "nice".to_string())
            .await
            .unwrap();

        let listed = uc.list(&post.post_id).await.unwrap();
        assert_eq!(listed.len(), 1);

        let updated = uc
            .update(&commenter, &record.comment.comment_id, "edited".to_string())
            .await
            .unwrap();
        assert_eq!(updated.comment.text, "edited");

        uc.delete(&commenter, &record.comment.comment_id)
            .await
            .unwrap();
        assert!(uc.list(&post.post_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_on_missing_post() {
        let repo = Arc::new(TestContentRepository::default());
        let err = CommentUseCase::new(repo)
            .add(AuthorId::new(), PostId::new(), "hello".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::PostNotFound));
    }

    #[tokio::test]
    async fn test_update_foreign_comment_is_refused() {
        let repo = Arc::new(TestContentRepository::default());
        let post = seed_post(&repo, &AuthorId::new()).await;
        let uc = CommentUseCase::new(repo);

        let record = uc
            .add(AuthorId::new(), post.post_id, "mine".to_string())
            .await
            .unwrap();

        let err = uc
            .update(&AuthorId::new(), &record.comment.comment_id, "x".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::NotOwner));
    }

    #[tokio::test]
    async fn test_blank_text_rejected() {
        let repo = Arc::new(TestContentRepository::default());
        let post = seed_post(&repo, &AuthorId::new()).await;
        let err = CommentUseCase::new(repo)
            .add(AuthorId::new(), post.post_id, "   ".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::MissingField(_)));
    }

    #[tokio::test]
    async fn test_comment_like_toggles() {
        let repo = Arc::new(TestContentRepository::default());
        let post = seed_post(&repo, &AuthorId::new()).await;
        let uc = CommentUseCase::new(repo);
        let liker = AuthorId::new();

        let record = uc
            .add(AuthorId::new(), post.post_id, "like me".to_string())
            .await
            .unwrap();

        assert!(uc
            .toggle_like(&liker, &record.comment.comment_id)
            .await
            .unwrap());
        assert!(!uc
            .toggle_like(&liker, &record.comment.comment_id)
            .await
            .unwrap());
    }
}
