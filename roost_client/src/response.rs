//! Wire shapes for the two GraphQL operations, one closed tagged-union type
//! per polymorphic variant family. Every optional field defaults, and every
//! discriminated list carries an ignore arm, because the upstream schema
//! drifts: an unknown tag must degrade, never fail.

use serde::Deserialize;
use serde_with::{serde_as, VecSkipError};

// Envelope

#[derive(Deserialize, Debug, Default)]
pub struct ApiErrorMessage {
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct GraphqlEnvelope {
    pub data: Option<EnvelopeData>,
    #[serde(default)]
    pub errors: Vec<ApiErrorMessage>,
}

#[derive(Deserialize, Debug, Default)]
pub struct EnvelopeData {
    #[serde(default, alias = "user_results")]
    pub user_result: Option<UserResult>,
}

// User

#[derive(Deserialize, Debug, Default)]
pub struct UserResult {
    pub result: Option<Box<UserNode>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct LegacyUser {
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub screen_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub profile_image_url_https: String,
    #[serde(default)]
    pub profile_banner_url: String,
    #[serde(default)]
    pub pinned_tweet_ids_str: Vec<String>,
    #[serde(default)]
    pub friends_count: u32,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(default)]
    pub statuses_count: u32,
    #[serde(default)]
    pub favourites_count: u32,
    #[serde(default)]
    pub media_count: u32,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub protected: bool,
}

/// The user result node. The account-lookup call and the timeline call share
/// this shape; only the latter populates `timeline_response`.
#[derive(Deserialize, Debug, Default)]
pub struct UserNode {
    #[serde(rename = "__typename", default)]
    pub typename: String,
    #[serde(default)]
    pub rest_id: String,
    #[serde(default)]
    pub verified_type: String,
    #[serde(default)]
    pub legacy: LegacyUser,
    #[serde(default)]
    pub timeline_response: TimelineResponse,
}

// Tweet

#[derive(Deserialize, Debug, Default)]
pub struct TweetResult {
    pub result: Option<Box<TweetNode>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TweetNode {
    #[serde(rename = "__typename", default)]
    pub typename: String,
    /// Some result kinds nest the real node one level down.
    pub tweet: Option<Box<TweetNode>>,
    #[serde(default)]
    pub rest_id: String,
    #[serde(default)]
    pub legacy: LegacyTweet,
    #[serde(default)]
    pub core: TweetCore,
    pub quoted_status_result: Option<Box<TweetResult>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TweetCore {
    #[serde(default, alias = "user_results")]
    pub user_result: Option<UserResult>,
}

#[derive(Deserialize, Debug, Default)]
pub struct LegacyTweet {
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub full_text: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub conversation_id_str: String,
    #[serde(default)]
    pub in_reply_to_status_id_str: String,
    #[serde(default)]
    pub in_reply_to_screen_name: String,
    #[serde(default)]
    pub reply_count: u32,
    #[serde(default)]
    pub retweet_count: u32,
    #[serde(default)]
    pub favorite_count: u32,
    #[serde(default)]
    pub quote_count: u32,
    #[serde(default)]
    pub extended_entities: ExtendedEntities,
    pub retweeted_status_result: Option<Box<TweetResult>>,
}

// Media

#[serde_as]
#[derive(Deserialize, Debug, Default)]
pub struct ExtendedEntities {
    #[serde_as(as = "VecSkipError<_>")]
    #[serde(default)]
    pub media: Vec<MediaEntity>,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type")]
pub enum MediaEntity {
    #[serde(rename = "photo")]
    Photo {
        #[serde(default)]
        media_url_https: String,
    },
    #[serde(rename = "video")]
    Video {
        #[serde(default)]
        video_info: VideoInfo,
    },
    #[serde(rename = "animated_gif")]
    AnimatedGif {
        #[serde(default)]
        media_url_https: String,
        #[serde(default)]
        video_info: VideoInfo,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug, Default)]
pub struct VideoInfo {
    #[serde(default)]
    pub duration_millis: u32,
    #[serde(default)]
    pub variants: Vec<VideoVariant>,
}

#[derive(Deserialize, Debug, Default)]
pub struct VideoVariant {
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub bitrate: u32,
}

// Timeline

#[derive(Deserialize, Debug, Default)]
pub struct TimelineResponse {
    #[serde(default)]
    pub timeline: TimelineNode,
}

#[serde_as]
#[derive(Deserialize, Debug, Default)]
pub struct TimelineNode {
    #[serde_as(as = "VecSkipError<_>")]
    #[serde(default)]
    pub instructions: Vec<TimelineInstruction>,
}

#[allow(clippy::large_enum_variant)]
#[serde_as]
#[derive(Deserialize, Debug)]
#[serde(tag = "__typename")]
pub enum TimelineInstruction {
    TimelinePinEntry {
        #[serde(default)]
        entry: TimelineEntry,
    },
    TimelineAddEntries {
        #[serde_as(as = "VecSkipError<_>")]
        #[serde(default)]
        entries: Vec<TimelineEntry>,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug, Default)]
pub struct TimelineEntry {
    #[serde(rename = "entryId", default)]
    pub entry_id: String,
    #[serde(default)]
    pub content: TimelineEntryContent,
}

#[allow(clippy::large_enum_variant)]
#[serde_as]
#[derive(Deserialize, Debug, Default)]
#[serde(tag = "__typename")]
pub enum TimelineEntryContent {
    #[serde(rename = "TimelineTimelineItem")]
    Item {
        #[serde(default)]
        content: TimelineItemContent,
    },
    #[serde(rename = "TimelineTimelineModule")]
    Module {
        #[serde_as(as = "VecSkipError<_>")]
        #[serde(default)]
        items: Vec<ModuleItem>,
    },
    #[serde(rename = "TimelineTimelineCursor")]
    Cursor {
        #[serde(default)]
        value: String,
    },
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug, Default)]
pub struct TimelineItemContent {
    #[serde(rename = "tweetResult", default)]
    pub tweet_result: TweetResult,
}

#[derive(Deserialize, Debug, Default)]
pub struct ModuleItem {
    #[serde(default)]
    pub item: ModuleItemBody,
}

#[derive(Deserialize, Debug, Default)]
pub struct ModuleItemBody {
    #[serde(rename = "itemContent", default)]
    pub item_content: ModuleItemContent,
}

#[derive(Deserialize, Debug, Default)]
#[serde(tag = "__typename")]
pub enum ModuleItemContent {
    TimelineTweet {
        #[serde(rename = "tweetResult", default)]
        tweet_result: TweetResult,
    },
    #[default]
    #[serde(other)]
    Other,
}
