use phf::phf_map;

pub const GRAPHQL_API: &str = "https://api.x.com/graphql";
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/113.0.0.0 Safari/537.36";

pub const CONSUMER_KEY: &str = "3nVuSoBZnx6U4vzUxf5w";
pub const CONSUMER_SECRET: &str = "Bcs59EFbbsdF6Sl9Ng71smgStWEGwXXKSjYvPVt7qys";

pub const TIMELINE_PAGE_SIZE: u32 = 20;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const GRAPHQL_QIDS: phf::Map<&str, &str> = phf_map! {
    "UserResultByScreenNameQuery" => "u7wQyGi6oExe8_TRWGMq4Q",
    "UserWithProfileTweetsQueryV2" => "JLApJKFY0MxGTzCoK6ps8Q",
};

/// Feature switches sent verbatim with every GraphQL call. This map is an
/// upstream compatibility contract: the endpoints reject requests that omit
/// flags they know about, so the whole set travels with each request.
pub const DEFAULT_GRAPHQL_FEATURES: &[(&str, bool)] = &[
    ("android_graphql_skip_api_media_color_palette", false),
    ("articles_api_enabled", false),
    ("articles_preview_enabled", false),
    ("blue_business_profile_image_shape_enabled", false),
    ("c9s_tweet_anatomy_moderator_badge_enabled", false),
    ("communities_web_enable_tweet_community_results_fetch", false),
    ("creator_subscriptions_quote_tweet_preview_enabled", false),
    ("creator_subscriptions_subscription_count_enabled", false),
    ("creator_subscriptions_tweet_preview_api_enabled", true),
    ("freedom_of_speech_not_reach_fetch_enabled", false),
    ("graphql_is_translatable_rweb_tweet_is_translatable_enabled", false),
    ("hidden_profile_likes_enabled", false),
    ("highlights_tweets_tab_ui_enabled", false),
    ("immersive_video_status_linkable_timestamps", false),
    ("interactive_text_enabled", false),
    ("longform_notetweets_consumption_enabled", true),
    ("longform_notetweets_inline_media_enabled", false),
    ("longform_notetweets_rich_text_read_enabled", false),
    ("longform_notetweets_richtext_consumption_enabled", true),
    ("premium_content_api_read_enabled", false),
    ("profile_label_improvements_pcf_label_in_post_enabled", false),
    ("responsive_web_edit_tweet_api_enabled", false),
    ("responsive_web_enhance_cards_enabled", false),
    ("responsive_web_graphql_exclude_directive_enabled", true),
    ("responsive_web_graphql_skip_user_profile_image_extensions_enabled", false),
    ("responsive_web_graphql_timeline_navigation_enabled", false),
    ("responsive_web_grok_analysis_button_from_backend", false),
    ("responsive_web_grok_analyze_button_fetch_trends_enabled", false),
    ("responsive_web_grok_analyze_post_followups_enabled", false),
    ("responsive_web_grok_image_annotation_enabled", false),
    ("responsive_web_grok_share_attachment_enabled", false),
    ("responsive_web_jetfuel_frame", false),
    ("responsive_web_media_download_video_enabled", false),
    ("responsive_web_text_conversations_enabled", false),
    ("responsive_web_twitter_article_tweet_consumption_enabled", false),
    ("responsive_web_twitter_blue_verified_badge_is_enabled", true),
    ("rweb_lists_timeline_redesign_enabled", true),
    ("rweb_tipjar_consumption_enabled", false),
    ("rweb_video_timestamps_enabled", false),
    ("spaces_2022_h2_clipping", true),
    ("spaces_2022_h2_spaces_communities", true),
    ("standardized_nudges_misinfo", false),
    ("subscriptions_verification_info_enabled", true),
    ("subscriptions_verification_info_reason_enabled", true),
    ("subscriptions_verification_info_verified_since_enabled", true),
    ("super_follow_badge_privacy_enabled", false),
    ("super_follow_exclusive_tweet_notifications_enabled", false),
    ("super_follow_tweet_api_enabled", false),
    ("super_follow_user_api_enabled", false),
    ("tweet_awards_web_tipping_enabled", false),
    ("tweet_with_visibility_results_prefer_gql_limited_actions_policy_enabled", false),
    ("tweetypie_unmention_optimization_enabled", false),
    ("unified_cards_ad_metadata_container_dynamic_card_content_query_enabled", false),
    ("verified_phone_label_enabled", false),
    ("vibe_api_enabled", false),
    ("view_counts_everywhere_api_enabled", false),
];
