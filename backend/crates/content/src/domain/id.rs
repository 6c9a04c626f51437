//! Strongly typed content IDs

use kernel::id::{markers, Id};

/// ID of the identity that authored a piece of content
pub type AuthorId = Id<markers::Identity>;

pub type PostId = Id<markers::Post>;
pub type CommentId = Id<markers::Comment>;
pub type ReplyId = Id<markers::Reply>;
