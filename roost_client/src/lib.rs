mod consts;
mod error;
pub mod normalize;
mod oauth;
pub mod response;

use reqwest::{header, Client, Response, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use consts::*;
use response::GraphqlEnvelope;

pub use crate::error::Error;
use crate::error::Result;

/// One authenticated upstream session, loaded from the line-delimited
/// credential source. Never mutated after load.
#[derive(Debug, Clone, Deserialize)]
pub struct Credential {
    pub oauth_token: String,
    pub oauth_token_secret: String,
}

/// Client for the two upstream GraphQL operations. One instance is scoped to
/// a single logical gateway operation; dropping it releases the connection on
/// every exit path. Retry policy is deliberately left to the caller.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    credential: Credential,
    client: Client,
    features: String,
}

impl UpstreamClient {
    pub fn new(credential: Credential) -> Result<UpstreamClient> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));
        headers.insert("x-twitter-active-user", header::HeaderValue::from_static("yes"));
        headers.insert("x-twitter-client-language", header::HeaderValue::from_static("en"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        // The feature map is fixed, so its serialization is too.
        let features: serde_json::Map<String, Value> = DEFAULT_GRAPHQL_FEATURES
            .iter()
            .map(|(k, v)| (k.to_string(), (*v).into()))
            .collect();
        let features = serde_json::to_string(&features)?;

        Ok(UpstreamClient {
            credential,
            client,
            features,
        })
    }

    pub async fn fetch_account(&self, handle: &str) -> Result<GraphqlEnvelope> {
        let variables = json!({ "screen_name": handle });
        self.graphql_get("UserResultByScreenNameQuery", &variables).await
    }

    pub async fn fetch_timeline(&self, account_id: &str, cursor: Option<&str>) -> Result<GraphqlEnvelope> {
        let mut variables = json!({
            "rest_id": account_id,
            "count": TIMELINE_PAGE_SIZE,
            "includePromotedContent": false,
            "withDownvotePerspective": false,
            "withReactionsMetadata": false,
            "withReactionsPerspective": false,
            "withVoice": false,
            "withV2Timeline": true,
        });
        if let Some(cursor) = cursor {
            variables["cursor"] = cursor.into();
        }
        self.graphql_get("UserWithProfileTweetsQueryV2", &variables).await
    }

    async fn graphql_get(&self, endpoint: &str, variables: &Value) -> Result<GraphqlEnvelope> {
        let Some(qid) = GRAPHQL_QIDS.get(endpoint) else {
            return Err(Error::InvalidEndpoint(endpoint.to_string()));
        };

        let variable_str = serde_json::to_string(variables)?;
        let params = [("variables", variable_str.as_str()), ("features", self.features.as_str())];
        let base_url = format!("{}/{}/{}", GRAPHQL_API, qid, endpoint);
        let authorization = oauth::authorization_header("GET", &base_url, &params, &self.credential);
        let url = Url::parse_with_params(&base_url, params)?;

        tracing::debug!("GET {} variables={}", endpoint, variable_str);
        let response: Response = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, authorization)
            .send()
            .await?;
        let status = response.status().as_u16();
        match status {
            429 => return Err(Error::RateLimited),
            503 => return Err(Error::ServiceUnavailable),
            _ if !(200..300).contains(&status) => return Err(Error::Http(status)),
            _ => {}
        }

        let content = response.text().await?;
        log(endpoint, &content).await?;

        let envelope: GraphqlEnvelope = serde_json::from_str(&content)?;
        if !envelope.errors.is_empty() {
            let messages = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(Error::Api(messages));
        }
        Ok(envelope)
    }
}

async fn log(name: &str, content: &str) -> Result<()> {
    use std::path::PathBuf;
    use tokio::{fs::File, io::AsyncWriteExt};

    if let Ok(dir) = std::env::var("CLIENT_LOG_DIR") {
        let time = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let filepath = PathBuf::from(dir).join(format!("upstream_{}_{}.json", name, time));
        let mut file = File::create(filepath).await?;
        file.write_all(content.as_bytes()).await?;
    }
    Ok(())
}
