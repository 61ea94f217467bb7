//! Domain entities produced by the upstream normalizer and served by the
//! gateway. These are what gets serialized into the cache, so every type
//! here derives both serde traits and `PartialEq` (round-trip fidelity is
//! part of the cache contract).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationTier {
    #[default]
    None,
    Blue,
    Business,
    Government,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Account {
    /// Durable identity key across calls, as issued upstream.
    pub id: String,
    pub handle: String,
    pub display_name: String,
    pub location: String,
    pub website: String,
    pub bio: String,
    pub avatar_url: String,
    pub banner_url: String,
    pub pinned_post_id: u64,
    pub following_count: u32,
    pub follower_count: u32,
    pub post_count: u32,
    pub like_count: u32,
    pub media_count: u32,
    pub verification: VerificationTier,
    pub protected: bool,
    pub suspended: bool,
    pub joined: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PostStats {
    pub replies: u32,
    pub reposts: u32,
    pub likes: u32,
    pub quotes: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VideoVariant {
    pub mime_type: String,
    pub url: String,
    pub bitrate: u32,
    pub resolution: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaAttachment {
    Photo {
        url: String,
    },
    Video {
        duration_ms: u32,
        variants: Vec<VideoVariant>,
    },
    AnimatedImage {
        url: String,
        thumbnail_url: String,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    /// Monotonic per account, not globally ordered.
    pub id: u64,
    pub thread_id: u64,
    pub reply_to_id: u64,
    pub author: Account,
    pub text: String,
    pub time: DateTime<Utc>,
    pub reply_to_handles: Vec<String>,
    pub pinned: bool,
    pub available: bool,
    pub stats: PostStats,
    pub quoted: Option<Box<Post>>,
    pub reposted: Option<Box<Post>>,
    pub media: Vec<MediaAttachment>,
}

/// One fetched page of posts. `content` preserves upstream ordering; each
/// group currently holds a single post (thread grouping is approximated).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    pub content: Vec<Vec<Post>>,
    pub top: String,
    pub bottom: String,
    pub beginning: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub account: Account,
    pub pinned: Option<Post>,
    pub timeline: Timeline,
}
