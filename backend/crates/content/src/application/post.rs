//! Post Use Cases
//!
//! Feed reads plus author-gated writes. Every mutation checks that the
//! caller authored the post before touching it. List reads are paginated;
//! a page past the end of the list is an error, not an empty success.

use std::sync::Arc;

use crate::domain::entity::post::{AuthorCard, Post, PostRecord};
use crate::domain::id::{AuthorId, PostId};
use crate::domain::repository::ContentRepository;
use crate::error::{ContentError, ContentResult};
use kernel::page::{Page, Paged};
use platform::media::MediaStore;

/// Fields a post update may touch. `None` leaves a field untouched.
#[derive(Default)]
pub struct PostUpdate {
    pub caption: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    /// Replacement media file; the old object is destroyed
    pub media: Option<(String, Vec<u8>)>,
}

/// Post use case
pub struct PostUseCase<R>
where
    R: ContentRepository,
{
    repo: Arc<R>,
    media: Arc<dyn MediaStore>,
}

impl<R> PostUseCase<R>
where
    R: ContentRepository,
{
    pub fn new(repo: Arc<R>, media: Arc<dyn MediaStore>) -> Self {
        Self { repo, media }
    }

    pub async fn create(
        &self,
        author: AuthorCard,
        caption: Option<String>,
        location: Option<String>,
        category: Option<String>,
        file: (String, Vec<u8>),
    ) -> ContentResult<PostRecord> {
        let location = required_field(location, "location")?;
        let category = required_field(category, "category")?;

        let (filename, bytes) = file;
        if bytes.is_empty() {
            return Err(ContentError::Validation("Uploaded file is empty".to_string()));
        }

        let object = self.media.upload(bytes, &filename).await?;

        let post = Post::new(
            author.id,
            caption.unwrap_or_default(),
            location,
            category,
            object.url,
            object.object_id,
        );
        self.repo.create_post(&post).await?;

        tracing::info!(post_id = %post.post_id, "post created");

        Ok(PostRecord {
            post,
            author,
            likes: Vec::new(),
        })
    }

    pub async fn feed(&self, page: Page) -> ContentResult<Paged<PostRecord>> {
        non_empty_page(self.repo.list_posts(page.normalized()).await?)
    }

    pub async fn by_author(
        &self,
        author_id: &AuthorId,
        page: Page,
    ) -> ContentResult<Paged<PostRecord>> {
        non_empty_page(
            self.repo
                .list_posts_by_author(author_id, page.normalized())
                .await?,
        )
    }

    pub async fn by_location(
        &self,
        location: &str,
        page: Page,
    ) -> ContentResult<Paged<PostRecord>> {
        let location = location.trim();
        if location.is_empty() {
            return Err(ContentError::MissingField("location".to_string()));
        }
        non_empty_page(
            self.repo
                .list_posts_by_location(location, page.normalized())
                .await?,
        )
    }

    pub async fn update(
        &self,
        author_id: &AuthorId,
        post_id: &PostId,
        update: PostUpdate,
    ) -> ContentResult<PostRecord> {
        let record = self
            .repo
            .find_post(post_id)
            .await?
            .ok_or(ContentError::PostNotFound)?;

        let mut post = record.post;
        if !post.is_authored_by(author_id) {
            return Err(ContentError::NotOwner);
        }

        if let Some(caption) = update.caption {
            post.set_caption(caption);
        }
        if let Some(location) = update.location {
            post.set_location(location);
        }
        if let Some(category) = update.category {
            post.set_category(category);
        }

        if let Some((filename, bytes)) = update.media {
            if bytes.is_empty() {
                return Err(ContentError::Validation("Uploaded file is empty".to_string()));
            }
            let object = self.media.upload(bytes, &filename).await?;
            let old_object_id = post.media_object_id.clone();
            post.replace_media(object.url, object.object_id);

            // cleanup is best-effort
            if let Err(e) = self.media.destroy(&old_object_id).await {
                tracing::warn!(error = %e, post_id = %post_id, "media cleanup failed");
            }
        }

        self.repo.update_post(&post).await?;
        Ok(PostRecord {
            post,
            author: record.author,
            likes: record.likes,
        })
    }

    pub async fn delete(&self, author_id: &AuthorId, post_id: &PostId) -> ContentResult<()> {
        let record = self
            .repo
            .find_post(post_id)
            .await?
            .ok_or(ContentError::PostNotFound)?;

        if !record.post.is_authored_by(author_id) {
            return Err(ContentError::NotOwner);
        }

        self.repo.delete_post(post_id).await?;

        // cleanup is best-effort
        if let Err(e) = self.media.destroy(&record.post.media_object_id).await {
            tracing::warn!(error = %e, post_id = %post_id, "media cleanup failed");
        }

        tracing::info!(post_id = %post_id, "post deleted");
        Ok(())
    }

    /// Toggle the caller's like; returns true when the post ends up liked.
    pub async fn toggle_like(
        &self,
        author_id: &AuthorId,
        post_id: &PostId,
    ) -> ContentResult<bool> {
        if self.repo.find_post(post_id).await?.is_none() {
            return Err(ContentError::PostNotFound);
        }
        self.repo.toggle_post_like(post_id, author_id).await
    }
}

fn required_field(value: Option<String>, name: &str) -> ContentResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ContentError::MissingField(name.to_string())),
    }
}

fn non_empty_page(paged: Paged<PostRecord>) -> ContentResult<Paged<PostRecord>> {
    if paged.items.is_empty() {
        return Err(ContentError::PageOutOfRange);
    }
    Ok(paged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{card_for, NullMediaStore, TestContentRepository};

    fn use_case(repo: Arc<TestContentRepository>) -> PostUseCase<TestContentRepository> {
        PostUseCase::new(repo, Arc::new(NullMediaStore))
    }

    async fn seed_post(uc: &PostUseCase<TestContentRepository>, author: &AuthorId) -> PostRecord {
        uc.create(
            card_for(*author),
            Some("hello".to_string()),
            Some("Lagos".to_string()),
            Some("traffic".to_string()),
            ("clip.mp4".to_string(), vec![1, 2, 3]),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_uploads_and_stores() {
        let repo = Arc::new(TestContentRepository::default());
        let uc = use_case(repo);
        let author = AuthorId::new();

        let record = seed_post(&uc, &author).await;
        assert_eq!(record.post.caption, "hello");
        assert_eq!(record.post.category, "traffic");
        assert!(record.post.media_url.contains("clip.mp4"));
        assert!(record.likes.is_empty());

        let feed = uc.feed(Page::default()).await.unwrap();
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.total, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_file() {
        let repo = Arc::new(TestContentRepository::default());
        let err = use_case(repo)
            .create(
                card_for(AuthorId::new()),
                None,
                Some("Lagos".to_string()),
                Some("traffic".to_string()),
                ("clip.mp4".to_string(), vec![]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_requires_location_and_category() {
        let repo = Arc::new(TestContentRepository::default());
        let uc = use_case(repo);

        let err = uc
            .create(
                card_for(AuthorId::new()),
                None,
                None,
                Some("traffic".to_string()),
                ("clip.mp4".to_string(), vec![1]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::MissingField(ref f) if f == "location"));

        let err = uc
            .create(
                card_for(AuthorId::new()),
                None,
                Some("Lagos".to_string()),
                Some("  ".to_string()),
                ("clip.mp4".to_string(), vec![1]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::MissingField(ref f) if f == "category"));
    }

    #[tokio::test]
    async fn test_update_requires_ownership() {
        let repo = Arc::new(TestContentRepository::default());
        let uc = use_case(repo);
        let author = AuthorId::new();
        let record = seed_post(&uc, &author).await;

        let err = uc
            .update(
                &AuthorId::new(),
                &record.post.post_id,
                PostUpdate {
                    caption: Some("stolen".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::NotOwner));

        let updated = uc
            .update(
                &author,
                &record.post.post_id,
                PostUpdate {
                    caption: Some("edited".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.post.caption, "edited");
    }

    #[tokio::test]
    async fn test_update_replaces_media_object() {
        let repo = Arc::new(TestContentRepository::default());
        let uc = use_case(repo);
        let author = AuthorId::new();
        let record = seed_post(&uc, &author).await;
        let old_object_id = record.post.media_object_id.clone();

        let updated = uc
            .update(
                &author,
                &record.post.post_id,
                PostUpdate {
                    media: Some(("newer.mp4".to_string(), vec![9, 9])),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_ne!(updated.post.media_object_id, old_object_id);
        assert!(updated.post.media_url.contains("newer.mp4"));
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let repo = Arc::new(TestContentRepository::default());
        let uc = use_case(repo);
        let author = AuthorId::new();
        let record = seed_post(&uc, &author).await;

        let err = uc
            .delete(&AuthorId::new(), &record.post.post_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::NotOwner));

        uc.delete(&author, &record.post.post_id).await.unwrap();
        let err = uc.feed(Page::default()).await.unwrap_err();
        assert!(matches!(err, ContentError::PageOutOfRange));
    }

    #[tokio::test]
    async fn test_like_toggles() {
        let repo = Arc::new(TestContentRepository::default());
        let uc = use_case(repo);
        let author = AuthorId::new();
        let liker = AuthorId::new();
        let record = seed_post(&uc, &author).await;

        assert!(uc.toggle_like(&liker, &record.post.post_id).await.unwrap());
        assert!(!uc.toggle_like(&liker, &record.post.post_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_location_feed_filters_substring() {
        let repo = Arc::new(TestContentRepository::default());
        let uc = use_case(repo);
        let author = AuthorId::new();
        seed_post(&uc, &author).await;

        let hits = uc.by_location("AGO", Page::default()).await.unwrap();
        assert_eq!(hits.items.len(), 1);
        assert!(uc.by_location("Abuja", Page::default()).await.is_err());
        assert!(uc.by_location("  ", Page::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_feed_pages_run_out() {
        let repo = Arc::new(TestContentRepository::default());
        let uc = use_case(repo);
        let author = AuthorId::new();
        for _ in 0..3 {
            seed_post(&uc, &author).await;
        }

        let first = uc.feed(Page { page: 1, limit: 2 }).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total, 3);
        assert!(first.has_next_page());

        let second = uc.feed(Page { page: 2, limit: 2 }).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(!second.has_next_page());

        let err = uc.feed(Page { page: 3, limit: 2 }).await.unwrap_err();
        assert!(matches!(err, ContentError::PageOutOfRange));
    }
}
