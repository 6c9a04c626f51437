//! HTTP Handlers
//!
//! Every handler runs behind the session gate; the authoring identity comes
//! out of the request extensions, never out of the request body.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use std::sync::Arc;

use auth::middleware::CurrentIdentity;
use kernel::page::Page;

use crate::application::comment::CommentUseCase;
use crate::application::post::{PostUpdate, PostUseCase};
use crate::application::reply::ReplyUseCase;
use crate::domain::entity::post::AuthorCard;
use crate::domain::id::{AuthorId, CommentId, PostId, ReplyId};
use crate::domain::repository::ContentRepository;
use crate::error::{ContentError, ContentResult};
use crate::presentation::dto::{
    CommentDto, DataResponse, LikeResponse, MessageResponse, PagedResponse, PostDto, ReplyDto,
    TextRequest,
};
use platform::media::MediaStore;

/// Shared state for content handlers
#[derive(Clone)]
pub struct ContentAppState<R>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub media: Arc<dyn MediaStore>,
}

fn viewer(current: &CurrentIdentity) -> AuthorId {
    current.0.identity_id
}

fn viewer_card(current: &CurrentIdentity) -> AuthorCard {
    AuthorCard {
        id: current.0.identity_id,
        first_name: current.0.first_name.clone(),
        last_name: current.0.last_name.clone(),
        thumbnail: current.0.thumbnail.clone(),
    }
}

fn parse_id<T: std::str::FromStr>(raw: &str, missing: ContentError) -> ContentResult<T> {
    raw.parse().map_err(|_| missing)
}

/// Pulls the fields a post form can carry out of a multipart body.
#[derive(Default)]
struct PostForm {
    caption: Option<String>,
    location: Option<String>,
    category: Option<String>,
    file: Option<(String, Vec<u8>)>,
}

async fn read_post_form(mut multipart: Multipart) -> ContentResult<PostForm> {
    let mut form = PostForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ContentError::Validation(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "file" | "media" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "upload".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ContentError::Validation(e.to_string()))?;
                form.file = Some((filename, bytes.to_vec()));
            }
            "caption" => form.caption = Some(read_text(field).await?),
            "location" => form.location = Some(read_text(field).await?),
            "category" => form.category = Some(read_text(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> ContentResult<String> {
    field
        .text()
        .await
        .map_err(|e| ContentError::Validation(e.to_string()))
}

// ============================================================================
// Posts
// ============================================================================

/// POST /upload-post (multipart)
pub async fn upload_post<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    multipart: Multipart,
) -> ContentResult<impl IntoResponse>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let form = read_post_form(multipart).await?;
    let file = form
        .file
        .ok_or_else(|| ContentError::MissingField("file".to_string()))?;

    let record = PostUseCase::new(state.repo.clone(), state.media.clone())
        .create(
            viewer_card(&current),
            form.caption,
            form.location,
            form.category,
            file,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            "Post uploaded successfully",
            PostDto::from_record(&record, &viewer(&current)),
        )),
    ))
}

/// GET /get-all-posts?page=&limit=
pub async fn get_all_posts<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Query(page): Query<Page>,
) -> ContentResult<Json<PagedResponse<PostDto>>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let paged = PostUseCase::new(state.repo.clone(), state.media.clone())
        .feed(page)
        .await?;
    let me = viewer(&current);
    Ok(Json(PagedResponse::from_paged(&paged, |r| {
        PostDto::from_record(r, &me)
    })))
}

/// GET /get-user-posts?page=&limit=
pub async fn get_user_posts<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Query(page): Query<Page>,
) -> ContentResult<Json<PagedResponse<PostDto>>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let me = viewer(&current);
    let paged = PostUseCase::new(state.repo.clone(), state.media.clone())
        .by_author(&me, page)
        .await?;
    Ok(Json(PagedResponse::from_paged(&paged, |r| {
        PostDto::from_record(r, &me)
    })))
}

/// GET /get-posts-by-location/{location}?page=&limit=
pub async fn get_posts_by_location<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(location): Path<String>,
    Query(page): Query<Page>,
) -> ContentResult<Json<PagedResponse<PostDto>>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let paged = PostUseCase::new(state.repo.clone(), state.media.clone())
        .by_location(&location, page)
        .await?;
    let me = viewer(&current);
    Ok(Json(PagedResponse::from_paged(&paged, |r| {
        PostDto::from_record(r, &me)
    })))
}

/// PATCH /update-post/{postId} (multipart, all fields optional)
pub async fn update_post<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(post_id): Path<String>,
    multipart: Multipart,
) -> ContentResult<Json<DataResponse<PostDto>>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let post_id: PostId = parse_id(&post_id, ContentError::PostNotFound)?;
    let me = viewer(&current);
    let form = read_post_form(multipart).await?;

    let record = PostUseCase::new(state.repo.clone(), state.media.clone())
        .update(
            &me,
            &post_id,
            PostUpdate {
                caption: form.caption,
                location: form.location,
                category: form.category,
                media: form.file,
            },
        )
        .await?;

    Ok(Json(DataResponse::with_message(
        "Post updated successfully",
        PostDto::from_record(&record, &me),
    )))
}

/// DELETE /delete-post/{postId}
pub async fn delete_post<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(post_id): Path<String>,
) -> ContentResult<Json<MessageResponse>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let post_id: PostId = parse_id(&post_id, ContentError::PostNotFound)?;
    PostUseCase::new(state.repo.clone(), state.media.clone())
        .delete(&viewer(&current), &post_id)
        .await?;
    Ok(Json(MessageResponse::ok("Post deleted successfully")))
}

/// PATCH /like-post/{postId}
pub async fn like_post<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(post_id): Path<String>,
) -> ContentResult<Json<LikeResponse>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let post_id: PostId = parse_id(&post_id, ContentError::PostNotFound)?;
    let liked = PostUseCase::new(state.repo.clone(), state.media.clone())
        .toggle_like(&viewer(&current), &post_id)
        .await?;
    Ok(Json(LikeResponse {
        success: true,
        liked,
    }))
}

// ============================================================================
// Comments
// ============================================================================

/// POST /comment-post/{postId}
pub async fn comment_post<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(post_id): Path<String>,
    Json(req): Json<TextRequest>,
) -> ContentResult<impl IntoResponse>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let post_id: PostId = parse_id(&post_id, ContentError::PostNotFound)?;
    let me = viewer(&current);

    let record = CommentUseCase::new(state.repo.clone())
        .add(me, post_id, req.text)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::ok(CommentDto::from_record(&record, &me))),
    ))
}

/// GET /get-post-comments/{postId}
pub async fn get_post_comments<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(post_id): Path<String>,
) -> ContentResult<Json<DataResponse<Vec<CommentDto>>>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let post_id: PostId = parse_id(&post_id, ContentError::PostNotFound)?;
    let records = CommentUseCase::new(state.repo.clone())
        .list(&post_id)
        .await?;
    let me = viewer(&current);
    Ok(Json(DataResponse::ok(
        records
            .iter()
            .map(|r| CommentDto::from_record(r, &me))
            .collect(),
    )))
}

/// PATCH /update-comment/{commentId}
pub async fn update_comment<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(comment_id): Path<String>,
    Json(req): Json<TextRequest>,
) -> ContentResult<Json<DataResponse<CommentDto>>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let comment_id: CommentId = parse_id(&comment_id, ContentError::CommentNotFound)?;
    let me = viewer(&current);

    let record = CommentUseCase::new(state.repo.clone())
        .update(&me, &comment_id, req.text)
        .await?;

    Ok(Json(DataResponse::ok(CommentDto::from_record(&record, &me))))
}

/// DELETE /delete-comment/{commentId}
pub async fn delete_comment<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(comment_id): Path<String>,
) -> ContentResult<Json<MessageResponse>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let comment_id: CommentId = parse_id(&comment_id, ContentError::CommentNotFound)?;
    CommentUseCase::new(state.repo.clone())
        .delete(&viewer(&current), &comment_id)
        .await?;
    Ok(Json(MessageResponse::ok("Comment deleted successfully")))
}

/// PATCH /like-comment/{commentId}
pub async fn like_comment<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(comment_id): Path<String>,
) -> ContentResult<Json<LikeResponse>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let comment_id: CommentId = parse_id(&comment_id, ContentError::CommentNotFound)?;
    let liked = CommentUseCase::new(state.repo.clone())
        .toggle_like(&viewer(&current), &comment_id)
        .await?;
    Ok(Json(LikeResponse {
        success: true,
        liked,
    }))
}

// ============================================================================
// Replies
// ============================================================================

/// POST /reply-comment/{commentId}
pub async fn reply_comment<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(comment_id): Path<String>,
    Json(req): Json<TextRequest>,
) -> ContentResult<impl IntoResponse>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let comment_id: CommentId = parse_id(&comment_id, ContentError::CommentNotFound)?;
    let me = viewer(&current);

    let record = ReplyUseCase::new(state.repo.clone())
        .add(me, comment_id, req.text)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::ok(ReplyDto::from_record(&record, &me))),
    ))
}

/// GET /get-comment-replies/{commentId}
pub async fn get_comment_replies<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(comment_id): Path<String>,
) -> ContentResult<Json<DataResponse<Vec<ReplyDto>>>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let comment_id: CommentId = parse_id(&comment_id, ContentError::CommentNotFound)?;
    let records = ReplyUseCase::new(state.repo.clone())
        .list(&comment_id)
        .await?;
    let me = viewer(&current);
    Ok(Json(DataResponse::ok(
        records
            .iter()
            .map(|r| ReplyDto::from_record(r, &me))
            .collect(),
    )))
}

/// PATCH /update-reply/{replyId}
pub async fn update_reply<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(reply_id): Path<String>,
    Json(req): Json<TextRequest>,
) -> ContentResult<Json<DataResponse<ReplyDto>>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let reply_id: ReplyId = parse_id(&reply_id, ContentError::ReplyNotFound)?;
    let me = viewer(&current);

    let record = ReplyUseCase::new(state.repo.clone())
        .update(&me, &reply_id, req.text)
        .await?;

    Ok(Json(DataResponse::ok(ReplyDto::from_record(&record, &me))))
}

/// DELETE /delete-reply/{replyId}
pub async fn delete_reply<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(reply_id): Path<String>,
) -> ContentResult<Json<MessageResponse>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let reply_id: ReplyId = parse_id(&reply_id, ContentError::ReplyNotFound)?;
    ReplyUseCase::new(state.repo.clone())
        .delete(&viewer(&current), &reply_id)
        .await?;
    Ok(Json(MessageResponse::ok("Reply deleted successfully")))
}

/// PATCH /like-reply/{replyId}
pub async fn like_reply<R>(
    State(state): State<ContentAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(reply_id): Path<String>,
) -> ContentResult<Json<LikeResponse>>
where
    R: ContentRepository + Clone + Send + Sync + 'static,
{
    let reply_id: ReplyId = parse_id(&reply_id, ContentError::ReplyNotFound)?;
    let liked = ReplyUseCase::new(state.repo.clone())
        .toggle_like(&viewer(&current), &reply_id)
        .await?;
    Ok(Json(LikeResponse {
        success: true,
        liked,
    }))
}
