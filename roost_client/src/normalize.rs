//! Mapping from the raw wire shapes to the stable domain model.
//!
//! The rule throughout: unknown or missing optional nodes degrade to
//! defaults, never to errors. The only hard failure is an envelope without
//! a recognizable result node, which callers treat as "not found": a
//! business outcome, not a fault.

use chrono::{DateTime, Utc};

use roost_core::model::{
    Account, MediaAttachment, Post, PostStats, Profile, Timeline, VerificationTier, VideoVariant,
};

use crate::response::{
    GraphqlEnvelope, MediaEntity, ModuleItemContent, TimelineEntryContent, TimelineInstruction,
    TimelineNode, TweetResult, UserNode,
};

/// Posts of one timeline page in source order (pinned flags set), plus the
/// pagination cursors scanned from the same instruction sequence.
#[derive(Debug, Default)]
pub struct TimelinePage {
    pub posts: Vec<Post>,
    pub top: String,
    pub bottom: String,
}

pub fn parse_account(node: &UserNode) -> Account {
    let legacy = &node.legacy;
    Account {
        id: node.rest_id.clone(),
        handle: legacy.screen_name.clone(),
        display_name: legacy.name.clone(),
        location: legacy.location.clone(),
        website: legacy.url.clone(),
        bio: legacy.description.clone(),
        avatar_url: legacy.profile_image_url_https.replace("_normal", "_400x400"),
        banner_url: legacy.profile_banner_url.clone(),
        pinned_post_id: legacy.pinned_tweet_ids_str.first().map(|id| numeric_id(id)).unwrap_or(0),
        following_count: legacy.friends_count,
        follower_count: legacy.followers_count,
        post_count: legacy.statuses_count,
        like_count: legacy.favourites_count,
        media_count: legacy.media_count,
        verification: verification_tier(node),
        protected: legacy.protected,
        suspended: node.typename == "UserUnavailable",
        joined: parse_time(&legacy.created_at),
    }
}

/// Stand-in author for posts whose embedded user sub-tree is missing.
pub fn placeholder_account() -> Account {
    Account {
        id: "0".to_string(),
        handle: "unknown".to_string(),
        display_name: "Unknown".to_string(),
        location: String::new(),
        website: String::new(),
        bio: String::new(),
        avatar_url: String::new(),
        banner_url: String::new(),
        pinned_post_id: 0,
        following_count: 0,
        follower_count: 0,
        post_count: 0,
        like_count: 0,
        media_count: 0,
        verification: VerificationTier::None,
        protected: false,
        suspended: false,
        joined: Utc::now(),
    }
}

/// Returns `None` (not an error) when the result is absent or the node is
/// discriminated unavailable.
pub fn parse_post(result: &TweetResult) -> Option<Post> {
    let node = result.result.as_deref()?;
    let node = node.tweet.as_deref().unwrap_or(node);
    if node.typename == "TweetUnavailable" {
        return None;
    }

    let legacy = &node.legacy;
    let author = node
        .core
        .user_result
        .as_ref()
        .and_then(|r| r.result.as_deref())
        .map(parse_account)
        .unwrap_or_else(placeholder_account);
    let text = if legacy.full_text.is_empty() {
        legacy.text.clone()
    } else {
        legacy.full_text.clone()
    };
    let reply_to_handles = if legacy.in_reply_to_screen_name.is_empty() {
        Vec::new()
    } else {
        vec![legacy.in_reply_to_screen_name.clone()]
    };
    let reposted = legacy
        .retweeted_status_result
        .as_deref()
        .and_then(parse_post)
        .map(Box::new);
    let quoted = node.quoted_status_result.as_deref().and_then(parse_post).map(Box::new);

    Some(Post {
        id: numeric_id(&node.rest_id),
        thread_id: numeric_id(&legacy.conversation_id_str),
        reply_to_id: numeric_id(&legacy.in_reply_to_status_id_str),
        author,
        text,
        time: parse_time(&legacy.created_at),
        reply_to_handles,
        pinned: false,
        available: true,
        stats: PostStats {
            replies: legacy.reply_count,
            reposts: legacy.retweet_count,
            likes: legacy.favorite_count,
            quotes: legacy.quote_count,
        },
        quoted,
        reposted,
        media: legacy.extended_entities.media.iter().filter_map(parse_media).collect(),
    })
}

/// Walk the discriminator-tagged instruction sequence. A pin entry yields
/// one post flagged pinned; add-entries yield posts from item and module
/// entries and cursors classified by their entry identifier; anything else
/// is skipped.
pub fn parse_timeline_instructions(timeline: &TimelineNode) -> TimelinePage {
    let mut page = TimelinePage::default();
    for instruction in &timeline.instructions {
        match instruction {
            TimelineInstruction::TimelinePinEntry { entry } => {
                if let TimelineEntryContent::Item { content } = &entry.content {
                    if let Some(mut post) = parse_post(&content.tweet_result) {
                        post.pinned = true;
                        page.posts.push(post);
                    }
                }
            }
            TimelineInstruction::TimelineAddEntries { entries } => {
                for entry in entries {
                    match &entry.content {
                        TimelineEntryContent::Item { content } => {
                            if let Some(post) = parse_post(&content.tweet_result) {
                                page.posts.push(post);
                            }
                        }
                        TimelineEntryContent::Module { items } => {
                            for item in items {
                                let ModuleItemContent::TimelineTweet { tweet_result } = &item.item.item_content else {
                                    continue;
                                };
                                if let Some(post) = parse_post(tweet_result) {
                                    page.posts.push(post);
                                }
                            }
                        }
                        TimelineEntryContent::Cursor { value } => {
                            if entry.entry_id.contains("cursor-top") {
                                page.top = value.clone();
                            } else if entry.entry_id.contains("cursor-bottom") {
                                page.bottom = value.clone();
                            }
                        }
                        TimelineEntryContent::Other => {}
                    }
                }
            }
            TimelineInstruction::Other => {}
        }
    }
    page
}

/// Account from the account-lookup envelope, or `None` when the envelope has
/// no result node.
pub fn parse_account_envelope(envelope: &GraphqlEnvelope) -> Option<Account> {
    result_node(envelope).map(parse_account)
}

/// Full profile from the timeline envelope. The embedded account can lag the
/// identity lookup, so callers overlay a fresher one. The pinned post is
/// surfaced separately; the content groups carry only the regular entries.
pub fn parse_profile(envelope: &GraphqlEnvelope) -> Option<Profile> {
    let node = result_node(envelope)?;
    let account = parse_account(node);
    let page = parse_timeline_instructions(&node.timeline_response.timeline);
    let beginning = page.posts.is_empty();
    let pinned = page.posts.iter().find(|post| post.pinned).cloned();
    let content = page
        .posts
        .into_iter()
        .filter(|post| !post.pinned)
        .map(|post| vec![post])
        .collect();
    Some(Profile {
        account,
        pinned,
        timeline: Timeline {
            content,
            top: page.top,
            bottom: page.bottom,
            beginning,
        },
    })
}

/// Priority when verified: the Business tag wins, then Government, and any
/// other or absent tag means Blue. Unverified is None regardless of tag.
fn verification_tier(node: &UserNode) -> VerificationTier {
    if !node.legacy.verified {
        return VerificationTier::None;
    }
    match node.verified_type.as_str() {
        "Business" => VerificationTier::Business,
        "Government" => VerificationTier::Government,
        _ => VerificationTier::Blue,
    }
}

fn result_node(envelope: &GraphqlEnvelope) -> Option<&UserNode> {
    envelope.data.as_ref()?.user_result.as_ref()?.result.as_deref()
}

fn parse_media(entity: &MediaEntity) -> Option<MediaAttachment> {
    match entity {
        MediaEntity::Photo { media_url_https } => Some(MediaAttachment::Photo {
            url: media_url_https.clone(),
        }),
        MediaEntity::Video { video_info } => Some(MediaAttachment::Video {
            duration_ms: video_info.duration_millis,
            variants: video_info
                .variants
                .iter()
                .map(|variant| VideoVariant {
                    mime_type: variant.content_type.clone(),
                    url: variant.url.clone(),
                    bitrate: variant.bitrate,
                    resolution: 0,
                })
                .collect(),
        }),
        MediaEntity::AnimatedGif {
            media_url_https,
            video_info,
        } => {
            let first = video_info.variants.first()?;
            Some(MediaAttachment::AnimatedImage {
                url: first.url.clone(),
                thumbnail_url: media_url_https.clone(),
            })
        }
        MediaEntity::Other => None,
    }
}

/// Ids arrive as strings; only purely numeric ones count, the rest map to 0.
fn numeric_id(s: &str) -> u64 {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().unwrap_or(0)
    } else {
        0
    }
}

fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|time| time.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
