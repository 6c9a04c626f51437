//! Post Entity

use chrono::{DateTime, Utc};

use crate::domain::id::{AuthorId, PostId};

/// A media post on the feed
#[derive(Debug, Clone)]
pub struct Post {
    pub post_id: PostId,
    pub author_id: AuthorId,
    /// Caption text, may be empty
    pub caption: String,
    /// Free-form location string, used for the location feed
    pub location: String,
    /// Free-form category label
    pub category: String,
    /// Public delivery URL of the uploaded media
    pub media_url: String,
    /// Storage-side identifier, needed to destroy the media on delete
    pub media_object_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        author_id: AuthorId,
        caption: String,
        location: String,
        category: String,
        media_url: String,
        media_object_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            post_id: PostId::new(),
            author_id,
            caption,
            location,
            category,
            media_url,
            media_object_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, author_id: &AuthorId) -> bool {
        &self.author_id == author_id
    }

    pub fn set_caption(&mut self, caption: String) {
        self.caption = caption;
        self.updated_at = Utc::now();
    }

    pub fn set_location(&mut self, location: String) {
        self.location = location;
        self.updated_at = Utc::now();
    }

    pub fn set_category(&mut self, category: String) {
        self.category = category;
        self.updated_at = Utc::now();
    }

    /// Swap the stored media object for a new one
    pub fn replace_media(&mut self, media_url: String, media_object_id: String) {
        self.media_url = media_url;
        self.media_object_id = media_object_id;
        self.updated_at = Utc::now();
    }
}

/// Identity fields the feed shows for authors and likers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorCard {
    pub id: AuthorId,
    pub first_name: String,
    pub last_name: String,
    pub thumbnail: Option<String>,
}

/// A post together with its author and who liked it
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub post: Post,
    pub author: AuthorCard,
    pub likes: Vec<AuthorCard>,
}

impl PostRecord {
    pub fn liked_by(&self, author_id: &AuthorId) -> bool {
        self.likes.iter().any(|card| &card.id == author_id)
    }
}
