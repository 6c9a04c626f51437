//! Shared test doubles for use case and handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::entity::comment::{Comment, CommentRecord, Reply, ReplyRecord};
use crate::domain::entity::post::{AuthorCard, Post, PostRecord};
use crate::domain::id::{AuthorId, CommentId, PostId, ReplyId};
use crate::domain::repository::ContentRepository;
use crate::error::ContentResult;
use kernel::page::{Page, Paged};
use platform::media::{MediaError, MediaObject, MediaStore};

#[derive(Default)]
struct Tables {
    users: HashMap<AuthorId, AuthorCard>,
    posts: HashMap<PostId, Post>,
    post_likes: HashMap<PostId, Vec<AuthorId>>,
    comments: HashMap<CommentId, Comment>,
    comment_likes: HashMap<CommentId, Vec<AuthorId>>,
    replies: HashMap<ReplyId, Reply>,
    reply_likes: HashMap<ReplyId, Vec<AuthorId>>,
}

impl Tables {
    fn card(&self, author_id: &AuthorId) -> AuthorCard {
        self.users
            .get(author_id)
            .cloned()
            .unwrap_or_else(|| card_for(*author_id))
    }

    fn post_record(&self, post: &Post) -> PostRecord {
        PostRecord {
            post: post.clone(),
            author: self.card(&post.author_id),
            likes: self
                .post_likes
                .get(&post.post_id)
                .map(|ids| ids.iter().map(|id| self.card(id)).collect())
                .unwrap_or_default(),
        }
    }
}

/// A throwaway author card for an id without registered profile fields
pub fn card_for(id: AuthorId) -> AuthorCard {
    AuthorCard {
        id,
        first_name: "Test".to_string(),
        last_name: "Author".to_string(),
        thumbnail: None,
    }
}

/// In-memory content repository
#[derive(Clone, Default)]
pub struct TestContentRepository {
    tables: Arc<Mutex<Tables>>,
}

impl TestContentRepository {
    /// Register the profile fields hydrated into feed records
    pub fn register_user(&self, card: AuthorCard) {
        let mut tables = self.tables.lock().unwrap();
        tables.users.insert(card.id, card);
    }
}

fn toggle(likes: &mut Vec<AuthorId>, author_id: &AuthorId) -> bool {
    if let Some(pos) = likes.iter().position(|a| a == author_id) {
        likes.remove(pos);
        false
    } else {
        likes.push(*author_id);
        true
    }
}

fn paginate(records: Vec<PostRecord>, page: Page) -> Paged<PostRecord> {
    let total = records.len() as u64;
    let items = records
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect();
    Paged { items, page, total }
}

impl ContentRepository for TestContentRepository {
    async fn create_post(&self, post: &Post) -> ContentResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.posts.insert(post.post_id, post.clone());
        Ok(())
    }

    async fn find_post(&self, post_id: &PostId) -> ContentResult<Option<PostRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.posts.get(post_id).map(|post| tables.post_record(post)))
    }

    async fn list_posts(&self, page: Page) -> ContentResult<Paged<PostRecord>> {
        let tables = self.tables.lock().unwrap();
        let mut records: Vec<PostRecord> = tables
            .posts
            .values()
            .map(|post| tables.post_record(post))
            .collect();
        records.sort_by(|a, b| b.post.created_at.cmp(&a.post.created_at));
        Ok(paginate(records, page))
    }

    async fn list_posts_by_author(
        &self,
        author_id: &AuthorId,
        page: Page,
    ) -> ContentResult<Paged<PostRecord>> {
        let tables = self.tables.lock().unwrap();
        let mut records: Vec<PostRecord> = tables
            .posts
            .values()
            .filter(|post| &post.author_id == author_id)
            .map(|post| tables.post_record(post))
            .collect();
        records.sort_by(|a, b| b.post.created_at.cmp(&a.post.created_at));
        Ok(paginate(records, page))
    }

    async fn list_posts_by_location(
        &self,
        location: &str,
        page: Page,
    ) -> ContentResult<Paged<PostRecord>> {
        let needle = location.to_lowercase();
        let tables = self.tables.lock().unwrap();
        let mut records: Vec<PostRecord> = tables
            .posts
            .values()
            .filter(|post| post.location.to_lowercase().contains(&needle))
            .map(|post| tables.post_record(post))
            .collect();
        records.sort_by(|a, b| b.post.created_at.cmp(&a.post.created_at));
        Ok(paginate(records, page))
    }

    async fn update_post(&self, post: &Post) -> ContentResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.posts.insert(post.post_id, post.clone());
        Ok(())
    }

    async fn delete_post(&self, post_id: &PostId) -> ContentResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.posts.remove(post_id);
        tables.post_likes.remove(post_id);
        let comment_ids: Vec<CommentId> = tables
            .comments
            .values()
            .filter(|c| &c.post_id == post_id)
            .map(|c| c.comment_id)
            .collect();
        for comment_id in comment_ids {
            tables.comments.remove(&comment_id);
            tables.comment_likes.remove(&comment_id);
            tables.replies.retain(|_, r| r.comment_id != comment_id);
        }
        Ok(())
    }

    async fn toggle_post_like(
        &self,
        post_id: &PostId,
        author_id: &AuthorId,
    ) -> ContentResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let likes = tables.post_likes.entry(*post_id).or_default();
        Ok(toggle(likes, author_id))
    }

    async fn create_comment(&self, comment: &Comment) -> ContentResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.comments.insert(comment.comment_id, comment.clone());
        Ok(())
    }

    async fn find_comment(&self, comment_id: &CommentId) -> ContentResult<Option<CommentRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.comments.get(comment_id).map(|comment| CommentRecord {
            comment: comment.clone(),
            likes: tables
                .comment_likes
                .get(comment_id)
                .cloned()
                .unwrap_or_default(),
        }))
    }

    async fn list_comments(&self, post_id: &PostId) -> ContentResult<Vec<CommentRecord>> {
        let tables = self.tables.lock().unwrap();
        let mut records: Vec<CommentRecord> = tables
            .comments
            .values()
            .filter(|c| &c.post_id == post_id)
            .map(|comment| CommentRecord {
                comment: comment.clone(),
                likes: tables
                    .comment_likes
                    .get(&comment.comment_id)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();
        records.sort_by(|a, b| a.comment.created_at.cmp(&b.comment.created_at));
        Ok(records)
    }

    async fn update_comment(&self, comment: &Comment) -> ContentResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.comments.insert(comment.comment_id, comment.clone());
        Ok(())
    }

    async fn delete_comment(&self, comment_id: &CommentId) -> ContentResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.comments.remove(comment_id);
        tables.comment_likes.remove(comment_id);
        tables.replies.retain(|_, r| &r.comment_id != comment_id);
        Ok(())
    }

    async fn toggle_comment_like(
        &self,
        comment_id: &CommentId,
        author_id: &AuthorId,
    ) -> ContentResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let likes = tables.comment_likes.entry(*comment_id).or_default();
        Ok(toggle(likes, author_id))
    }

    async fn create_reply(&self, reply: &Reply) -> ContentResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.replies.insert(reply.reply_id, reply.clone());
        Ok(())
    }

    async fn find_reply(&self, reply_id: &ReplyId) -> ContentResult<Option<ReplyRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.replies.get(reply_id).map(|reply| ReplyRecord {
            reply: reply.clone(),
            likes: tables.reply_likes.get(reply_id).cloned().unwrap_or_default(),
        }))
    }

    async fn list_replies(&self, comment_id: &CommentId) -> ContentResult<Vec<ReplyRecord>> {
        let tables = self.tables.lock().unwrap();
        let mut records: Vec<ReplyRecord> = tables
            .replies
            .values()
            .filter(|r| &r.comment_id == comment_id)
            .map(|reply| ReplyRecord {
                reply: reply.clone(),
                likes: tables
                    .reply_likes
                    .get(&reply.reply_id)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();
        records.sort_by(|a, b| a.reply.created_at.cmp(&b.reply.created_at));
        Ok(records)
    }

    async fn update_reply(&self, reply: &Reply) -> ContentResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.replies.insert(reply.reply_id, reply.clone());
        Ok(())
    }

    async fn delete_reply(&self, reply_id: &ReplyId) -> ContentResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.replies.remove(reply_id);
        tables.reply_likes.remove(reply_id);
        Ok(())
    }

    async fn toggle_reply_like(
        &self,
        reply_id: &ReplyId,
        author_id: &AuthorId,
    ) -> ContentResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let likes = tables.reply_likes.entry(*reply_id).or_default();
        Ok(toggle(likes, author_id))
    }
}

/// Media store that accepts everything and returns a canned URL
pub struct NullMediaStore;

#[async_trait]
impl MediaStore for NullMediaStore {
    async fn upload(&self, _bytes: Vec<u8>, filename: &str) -> Result<MediaObject, MediaError> {
        Ok(MediaObject {
            url: format!("https://cdn.test/{filename}"),
            object_id: format!("test/{filename}"),
        })
    }

    async fn destroy(&self, _object_id: &str) -> Result<(), MediaError> {
        Ok(())
    }
}

/// Insert a post with media and a Lagos location
pub async fn seed_post(repo: &Arc<TestContentRepository>, author_id: &AuthorId) -> Post {
    let post = Post::new(
        *author_id,
        "seeded".to_string(),
        "Lagos".to_string(),
        "traffic".to_string(),
        "https://cdn.test/seed.mp4".to_string(),
        "test/seed".to_string(),
    );
    repo.create_post(&post).await.unwrap();
    post
}
