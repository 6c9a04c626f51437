//! Reply Use Cases

use std::sync::Arc;

use crate::application::comment::non_empty_text;
use crate::domain::entity::comment::{Reply, ReplyRecord};
use crate::domain::id::{AuthorId, CommentId, ReplyId};
use crate::domain::repository::ContentRepository;
use crate::error::{ContentError, ContentResult};

/// Reply use case
pub struct ReplyUseCase<R>
where
    R: ContentRepository,
{
    repo: Arc<R>,
}

impl<R> ReplyUseCase<R>
where
    R: ContentRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn add(
        &self,
        author_id: AuthorId,
        comment_id: CommentId,
        text: String,
    ) -> ContentResult<ReplyRecord> {
        let text = non_empty_text(text)?;

        if self.repo.find_comment(&comment_id).await?.is_none() {
            return Err(ContentError::CommentNotFound);
        }

        let reply = Reply::new(comment_id, author_id, text);
        self.repo.create_reply(&reply).await?;

        Ok(ReplyRecord {
            reply,
            likes: Vec::new(),
        })
    }

    pub async fn list(&self, comment_id: &CommentId) -> ContentResult<Vec<ReplyRecord>> {
        if self.repo.find_comment(comment_id).await?.is_none() {
            return Err(ContentError::CommentNotFound);
        }
        self.repo.list_replies(comment_id).await
    }

    pub async fn update(
        &self,
        author_id: &AuthorId,
        reply_id: &ReplyId,
        text: String,
    ) -> ContentResult<ReplyRecord> {
        let text = non_empty_text(text)?;

        let record = self
            .repo
            .find_reply(reply_id)
            .await?
            .ok_or(ContentError::ReplyNotFound)?;

        let mut reply = record.reply;
        if !reply.is_authored_by(author_id) {
            return Err(ContentError::NotOwner);
        }

        reply.set_text(text);
        self.repo.update_reply(&reply).await?;

        Ok(ReplyRecord {
            reply,
            likes: record.likes,
        })
    }

    pub async fn delete(&self, author_id: &AuthorId, reply_id: &ReplyId) -> ContentResult<()> {
        let record = self
            .repo
            .find_reply(reply_id)
            .await?
            .ok_or(ContentError::ReplyNotFound)?;

        if !record.reply.is_authored_by(author_id) {
            return Err(ContentError::NotOwner);
        }

        self.repo.delete_reply(reply_id).await
    }

    /// Toggle the caller's like; returns true when the reply ends up liked.
    pub async fn toggle_like(
        &self,
        author_id: &AuthorId,
        reply_id: &ReplyId,
    ) -> ContentResult<bool> {
        if self.repo.find_reply(reply_id).await?.is_none() {
            return Err(ContentError::ReplyNotFound);
        }
        self.repo.toggle_reply_like(reply_id, author_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::comment::CommentUseCase;
    use crate::test_support::{seed_post, TestContentRepository};

    async fn seed_comment(repo: &Arc<TestContentRepository>) -> CommentId {
        let post = seed_post(repo, &AuthorId::new()).await;
        CommentUseCase::new(repo.clone())
            .add(AuthorId::new(), post.post_id, "root".to_string())
            .await
            .unwrap()
            .comment
            .comment_id
    }

    #[tokio::test]
    async fn test_reply_lifecycle() {
        let repo = Arc::new(TestContentRepository::default());
        let comment_id = seed_comment(&repo).await;
        let uc = ReplyUseCase::new(repo);
        let author = AuthorId::new();

        let record = uc
            .add(author.clone(), comment_id.clone(), "indeed".to_string())
            .await
            .unwrap();
        assert_eq!(uc.list(&comment_id).await.unwrap().len(), 1);

        let updated = uc
            .update(&author, &record.reply.reply_id, "edited".to_string())
            .await
            .unwrap();
        assert_eq!(updated.reply.text, "edited");

        uc.delete(&author, &record.reply.reply_id).await.unwrap();
        assert!(uc.list(&comment_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reply_to_missing_comment() {
        let repo = Arc::new(TestContentRepository::default());
        let err = ReplyUseCase::new(repo)
            .add(AuthorId::new(), CommentId::new(), "hello".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::CommentNotFound));
    }

    #[tokio::test]
    async fn test_reply_like_toggles() {
        let repo = Arc::new(TestContentRepository::default());
        let comment_id = seed_comment(&repo).await;
        let uc = ReplyUseCase::new(repo);
        let liker = AuthorId::new();

        let record = uc
            .add(AuthorId::new(), comment_id, "like me".to_string())
            .await
            .unwrap();

        assert!(uc.toggle_like(&liker, &record.reply.reply_id).await.unwrap());
        assert!(!uc.toggle_like(&liker, &record.reply.reply_id).await.unwrap());
    }
}
