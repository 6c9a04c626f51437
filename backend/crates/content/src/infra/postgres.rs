//! PostgreSQL Repository Implementation
//!
//! Likes live in join tables keyed on (content_id, author_id); reads pull
//! them in with an aggregated LEFT JOIN so a feed is a single query.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::comment::{Comment, CommentRecord, Reply, ReplyRecord};
use crate::domain::entity::post::{AuthorCard, Post, PostRecord};
use crate::domain::id::{AuthorId, CommentId, PostId, ReplyId};
use crate::domain::repository::ContentRepository;
use crate::error::ContentResult;
use kernel::page::{Page, Paged};

// Post reads hydrate the author and every liker from identities; likers are
// folded into one jsonb array so a feed page stays a single query.
const POST_SELECT: &str = r#"
    SELECT
        p.post_id,
        p.author_id,
        p.caption,
        p.location,
        p.category,
        p.media_url,
        p.media_object_id,
        p.created_at,
        p.updated_at,
        u.first_name AS author_first_name,
        u.last_name AS author_last_name,
        u.thumbnail AS author_thumbnail,
        COALESCE(
            jsonb_agg(jsonb_build_object(
                'id', lu.identity_id,
                'first_name', lu.first_name,
                'last_name', lu.last_name,
                'thumbnail', lu.thumbnail
            )) FILTER (WHERE lu.identity_id IS NOT NULL),
            '[]'::jsonb
        ) AS likes
    FROM posts p
    JOIN identities u ON u.identity_id = p.author_id
    LEFT JOIN post_likes l ON l.post_id = p.post_id
    LEFT JOIN identities lu ON lu.identity_id = l.author_id
"#;

const POST_GROUP: &str = "GROUP BY p.post_id, u.identity_id";

const COMMENT_SELECT: &str = r#"
    SELECT
        c.comment_id,
        c.post_id,
        c.author_id,
        c.text,
        c.created_at,
        c.updated_at,
        COALESCE(
            array_agg(l.author_id) FILTER (WHERE l.author_id IS NOT NULL),
            '{}'
        ) AS likes
    FROM comments c
    LEFT JOIN comment_likes l ON l.comment_id = c.comment_id
"#;

const REPLY_SELECT: &str = r#"
    SELECT
        r.reply_id,
        r.comment_id,
        r.author_id,
        r.text,
        r.created_at,
        r.updated_at,
        COALESCE(
            array_agg(l.author_id) FILTER (WHERE l.author_id IS NOT NULL),
            '{}'
        ) AS likes
    FROM replies r
    LEFT JOIN reply_likes l ON l.reply_id = r.reply_id
"#;

/// PostgreSQL-backed content repository
#[derive(Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ContentRepository for PgContentRepository {
    async fn create_post(&self, post: &Post) -> ContentResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                post_id, author_id, caption, location, category,
                media_url, media_object_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.author_id.as_uuid())
        .bind(&post.caption)
        .bind(&post.location)
        .bind(&post.category)
        .bind(&post.media_url)
        .bind(&post.media_object_id)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_post(&self, post_id: &PostId) -> ContentResult<Option<PostRecord>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "{POST_SELECT} WHERE p.post_id = $1 {POST_GROUP}"
        ))
        .bind(post_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostRow::into_record))
    }

    async fn list_posts(&self, page: Page) -> ContentResult<Paged<PostRecord>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{POST_SELECT} {POST_GROUP} ORDER BY p.created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_page(rows, page, total))
    }

    async fn list_posts_by_author(
        &self,
        author_id: &AuthorId,
        page: Page,
    ) -> ContentResult<Paged<PostRecord>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id.as_uuid())
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{POST_SELECT} WHERE p.author_id = $1 {POST_GROUP} \
             ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(author_id.as_uuid())
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_page(rows, page, total))
    }

    async fn list_posts_by_location(
        &self,
        location: &str,
        page: Page,
    ) -> ContentResult<Paged<PostRecord>> {
        let pattern = format!("%{}%", escape_like(location));

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE location ILIKE $1")
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{POST_SELECT} WHERE p.location ILIKE $1 {POST_GROUP} \
             ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_page(rows, page, total))
    }

    async fn update_post(&self, post: &Post) -> ContentResult<()> {
        sqlx::query(
            r#"
            UPDATE posts SET
                caption = $2,
                location = $3,
                category = $4,
                media_url = $5,
                media_object_id = $6,
                updated_at = $7
            WHERE post_id = $1
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(&post.caption)
        .bind(&post.location)
        .bind(&post.category)
        .bind(&post.media_url)
        .bind(&post.media_object_id)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_post(&self, post_id: &PostId) -> ContentResult<()> {
        // comments, replies and like rows go with it via ON DELETE CASCADE
        sqlx::query("DELETE FROM posts WHERE post_id = $1")
            .bind(post_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn toggle_post_like(
        &self,
        post_id: &PostId,
        author_id: &AuthorId,
    ) -> ContentResult<bool> {
        let inserted = sqlx::query(
            "INSERT INTO post_likes (post_id, author_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(post_id.as_uuid())
        .bind(author_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 1 {
            return Ok(true);
        }

        sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND author_id = $2")
            .bind(post_id.as_uuid())
            .bind(author_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(false)
    }

    async fn create_comment(&self, comment: &Comment) -> ContentResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (
                comment_id, post_id, author_id, text, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.comment_id.as_uuid())
        .bind(comment.post_id.as_uuid())
        .bind(comment.author_id.as_uuid())
        .bind(&comment.text)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_comment(&self, comment_id: &CommentId) -> ContentResult<Option<CommentRecord>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "{COMMENT_SELECT} WHERE c.comment_id = $1 GROUP BY c.comment_id"
        ))
        .bind(comment_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CommentRow::into_record))
    }

    async fn list_comments(&self, post_id: &PostId) -> ContentResult<Vec<CommentRecord>> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "{COMMENT_SELECT} WHERE c.post_id = $1 \
             GROUP BY c.comment_id ORDER BY c.created_at"
        ))
        .bind(post_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_record).collect())
    }

    async fn update_comment(&self, comment: &Comment) -> ContentResult<()> {
        sqlx::query("UPDATE comments SET text = $2, updated_at = $3 WHERE comment_id = $1")
            .bind(comment.comment_id.as_uuid())
            .bind(&comment.text)
            .bind(comment.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_comment(&self, comment_id: &CommentId) -> ContentResult<()> {
        sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(comment_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn toggle_comment_like(
        &self,
        comment_id: &CommentId,
        author_id: &AuthorId,
    ) -> ContentResult<bool> {
        let inserted = sqlx::query(
            "INSERT INTO comment_likes (comment_id, author_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(comment_id.as_uuid())
        .bind(author_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 1 {
            return Ok(true);
        }

        sqlx::query("DELETE FROM comment_likes WHERE comment_id = $1 AND author_id = $2")
            .bind(comment_id.as_uuid())
            .bind(author_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(false)
    }

    async fn create_reply(&self, reply: &Reply) -> ContentResult<()> {
        sqlx::query(
            r#"
            INSERT INTO replies (
                reply_id, comment_id, author_id, text, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(reply.reply_id.as_uuid())
        .bind(reply.comment_id.as_uuid())
        .bind(reply.author_id.as_uuid())
        .bind(&reply.text)
        .bind(reply.created_at)
        .bind(reply.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_reply(&self, reply_id: &ReplyId) -> ContentResult<Option<ReplyRecord>> {
        let row = sqlx::query_as::<_, ReplyRow>(&format!(
            "{REPLY_SELECT} WHERE r.reply_id = $1 GROUP BY r.reply_id"
        ))
        .bind(reply_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ReplyRow::into_record))
    }

    async fn list_replies(&self, comment_id: &CommentId) -> ContentResult<Vec<ReplyRecord>> {
        let rows = sqlx::query_as::<_, ReplyRow>(&format!(
            "{REPLY_SELECT} WHERE r.comment_id = $1 \
             GROUP BY r.reply_id ORDER BY r.created_at"
        ))
        .bind(comment_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReplyRow::into_record).collect())
    }

    async fn update_reply(&self, reply: &Reply) -> ContentResult<()> {
        sqlx::query("UPDATE replies SET text = $2, updated_at = $3 WHERE reply_id = $1")
            .bind(reply.reply_id.as_uuid())
            .bind(&reply.text)
            .bind(reply.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_reply(&self, reply_id: &ReplyId) -> ContentResult<()> {
        sqlx::query("DELETE FROM replies WHERE reply_id = $1")
            .bind(reply_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn toggle_reply_like(
        &self,
        reply_id: &ReplyId,
        author_id: &AuthorId,
    ) -> ContentResult<bool> {
        let inserted = sqlx::query(
            "INSERT INTO reply_likes (reply_id, author_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(reply_id.as_uuid())
        .bind(author_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 1 {
            return Ok(true);
        }

        sqlx::query("DELETE FROM reply_likes WHERE reply_id = $1 AND author_id = $2")
            .bind(reply_id.as_uuid())
            .bind(author_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(false)
    }
}

fn into_page(rows: Vec<PostRow>, page: Page, total: i64) -> Paged<PostRecord> {
    Paged {
        items: rows.into_iter().map(PostRow::into_record).collect(),
        page,
        total: total.max(0) as u64,
    }
}

/// Escape LIKE wildcards in user input so it matches literally
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[derive(Debug, Deserialize)]
struct CardRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    thumbnail: Option<String>,
}

impl CardRow {
    fn into_card(self) -> AuthorCard {
        AuthorCard {
            id: AuthorId::from(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            thumbnail: self.thumbnail,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: Uuid,
    author_id: Uuid,
    caption: String,
    location: String,
    category: String,
    media_url: String,
    media_object_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_first_name: String,
    author_last_name: String,
    author_thumbnail: Option<String>,
    likes: Json<Vec<CardRow>>,
}

impl PostRow {
    fn into_record(self) -> PostRecord {
        PostRecord {
            post: Post {
                post_id: PostId::from(self.post_id),
                author_id: AuthorId::from(self.author_id),
                caption: self.caption,
                location: self.location,
                category: self.category,
                media_url: self.media_url,
                media_object_id: self.media_object_id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            author: AuthorCard {
                id: AuthorId::from(self.author_id),
                first_name: self.author_first_name,
                last_name: self.author_last_name,
                thumbnail: self.author_thumbnail,
            },
            likes: self.likes.0.into_iter().map(CardRow::into_card).collect(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: Uuid,
    post_id: Uuid,
    author_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    likes: Vec<Uuid>,
}

impl CommentRow {
    fn into_record(self) -> CommentRecord {
        CommentRecord {
            comment: Comment {
                comment_id: CommentId::from(self.comment_id),
                post_id: PostId::from(self.post_id),
                author_id: AuthorId::from(self.author_id),
                text: self.text,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            likes: self.likes.into_iter().map(AuthorId::from).collect(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReplyRow {
    reply_id: Uuid,
    comment_id: Uuid,
    author_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    likes: Vec<Uuid>,
}

impl ReplyRow {
    fn into_record(self) -> ReplyRecord {
        ReplyRecord {
            reply: Reply {
                reply_id: ReplyId::from(self.reply_id),
                comment_id: CommentId::from(self.comment_id),
                author_id: AuthorId::from(self.author_id),
                text: self.text,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            likes: self.likes.into_iter().map(AuthorId::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("50%_off\\x"), "50\\%\\_off\\\\x");
        assert_eq!(escape_like("Lagos"), "Lagos");
    }

    #[test]
    fn test_card_row_json_shape() {
        let card: CardRow = serde_json::from_value(serde_json::json!({
            "id": "7f4df3ac-4f22-4a52-bd66-d4d4dd096d01",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "thumbnail": null,
        }))
        .unwrap();
        assert_eq!(card.into_card().first_name, "Ada");
    }
}
