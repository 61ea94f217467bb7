//! The gateway composes the credential pool, the upstream client, the
//! normalizer and the expiring cache into the two logical read operations.

pub mod pool;

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use roost_cache::ExpiringCache;
use roost_client::{normalize, UpstreamClient};
use roost_core::model::{Account, Profile};
use roost_core::{Database, Error, Result};

use pool::CredentialPool;

#[derive(Debug, Clone)]
pub struct Gateway {
    credentials: Arc<CredentialPool>,
    cache: ExpiringCache,
}

/// Status view of an account: either nothing upstream knows about, or its
/// two visibility flags.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(untagged)]
pub enum AccountStatus {
    Absent { absent: bool },
    Known { protected: bool, suspended: bool },
}

impl AccountStatus {
    pub fn absent() -> Self {
        AccountStatus::Absent { absent: true }
    }
}

impl Gateway {
    pub fn new(credentials: Arc<CredentialPool>, cache: ExpiringCache) -> Self {
        Gateway { credentials, cache }
    }

    /// Profile + timeline page for a handle. The identity lookup is the
    /// authoritative account; it overlays the possibly stale account embedded
    /// in the timeline response.
    pub async fn fetch_profile(&self, db: Database<'_>, handle: &str, cursor: Option<&str>) -> Result<Profile> {
        let account = self
            .resolve_account(db, handle)
            .await?
            .ok_or_else(|| Error::ObjectNotFound(format!("account @{}", handle)))?;
        if account.suspended {
            return Err(Error::ObjectForbidden(format!("account @{} is suspended", handle)));
        }
        let mut profile = self
            .resolve_timeline(db, &account.id, cursor)
            .await?
            .ok_or_else(|| Error::ObjectNotFound(format!("timeline of @{}", handle)))?;
        profile.account = account;
        Ok(profile)
    }

    /// Account status only; never touches the timeline endpoint.
    pub async fn fetch_status(&self, db: Database<'_>, handle: &str) -> Result<AccountStatus> {
        match self.resolve_account(db, handle).await? {
            None => Ok(AccountStatus::absent()),
            Some(account) => Ok(AccountStatus::Known {
                protected: account.protected,
                suspended: account.suspended,
            }),
        }
    }

    async fn resolve_account(&self, db: Database<'_>, handle: &str) -> Result<Option<Account>> {
        let key = account_key(handle);
        cached_or_fetch(db, &self.cache, &key, || async move {
            let client = UpstreamClient::new(self.credentials.next()).map_err(anyhow::Error::from)?;
            let envelope = client.fetch_account(handle).await.map_err(anyhow::Error::from)?;
            Ok(normalize::parse_account_envelope(&envelope))
        })
        .await
    }

    async fn resolve_timeline(
        &self,
        db: Database<'_>,
        account_id: &str,
        cursor: Option<&str>,
    ) -> Result<Option<Profile>> {
        let key = timeline_key(account_id, cursor);
        cached_or_fetch(db, &self.cache, &key, || async move {
            let client = UpstreamClient::new(self.credentials.next()).map_err(anyhow::Error::from)?;
            let envelope = client
                .fetch_timeline(account_id, cursor)
                .await
                .map_err(anyhow::Error::from)?;
            Ok(normalize::parse_profile(&envelope))
        })
        .await
    }
}

// Cache keys are pure functions of (operation, identity, cursor).

pub fn account_key(handle: &str) -> String {
    format!("account_{}", handle)
}

pub fn timeline_key(account_id: &str, cursor: Option<&str>) -> String {
    format!("timeline_{}_{}", account_id, cursor.unwrap_or(""))
}

/// Cache-aside: return the value cached under `key`, or run `producer` and
/// cache what it yields. A `None` from the producer (a negative result such
/// as account-not-found) is passed through uncached.
///
/// Two concurrent misses for the same key may both produce and both write;
/// last writer wins, which is sound because both serialize the same upstream
/// truth.
pub async fn cached_or_fetch<T, F, Fut>(
    db: Database<'_>,
    cache: &ExpiringCache,
    key: &str,
    producer: F,
) -> Result<Option<T>>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    if let Some(serialized) = cache.get(db, key)? {
        match serde_json::from_str(&serialized) {
            Ok(value) => {
                tracing::debug!("Cache hit for `{}`", key);
                return Ok(Some(value));
            }
            // A row that no longer decodes (schema drift between releases)
            // is dropped and refetched.
            Err(error) => {
                tracing::warn!("Discarding undecodable cache entry `{}`: {}", key, error);
                cache.delete(db, key)?;
            }
        }
    }

    let produced = producer().await?;
    if let Some(value) = &produced {
        cache.set(db, key, &serde_json::to_string(value)?)?;
        tracing::debug!("Cached `{}`", key);
    }
    Ok(produced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use diesel::prelude::*;
    use roost_core::model::{Timeline, VerificationTier};
    use std::io::Write;

    fn setup_db() -> SqliteConnection {
        let mut db = SqliteConnection::establish(":memory:").unwrap();
        ExpiringCache::initialize(&mut db).unwrap();
        db
    }

    fn credentials_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn account(id: &str, handle: &str) -> Account {
        Account {
            id: id.to_string(),
            handle: handle.to_string(),
            display_name: "Alice".to_string(),
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

    fn gateway(cache: ExpiringCache) -> Gateway {
        let file = credentials_file(&[r#"{"oauth_token": "t1", "oauth_token_secret": "s1"}"#]);
        let credentials = Arc::new(CredentialPool::load(file.path()).unwrap());
        Gateway::new(credentials, cache)
    }

    fn seed_account(db: Database, cache: &ExpiringCache, account: &Account) {
        let key = account_key(&account.handle);
        cache.set(db, &key, &serde_json::to_string(account).unwrap()).unwrap();
    }

    #[tokio::test]
    async fn test_fetch_status_from_cached_account() {
        let mut db = setup_db();
        let cache = ExpiringCache::new(3600, 60);
        let gateway = gateway(cache);
        seed_account(&mut db, &cache, &account("42", "alice"));
        let status = gateway.fetch_status(&mut db, "alice").await.unwrap();
        assert_eq!(
            status,
            AccountStatus::Known {
                protected: false,
                suspended: false,
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_status_reports_visibility_flags() {
        let mut db = setup_db();
        let cache = ExpiringCache::new(3600, 60);
        let gateway = gateway(cache);
        let mut flagged = account("13", "carol");
        flagged.protected = true;
        flagged.suspended = true;
        seed_account(&mut db, &cache, &flagged);
        let status = gateway.fetch_status(&mut db, "carol").await.unwrap();
        assert_eq!(
            status,
            AccountStatus::Known {
                protected: true,
                suspended: true,
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_profile_overlays_identity_account() {
        let mut db = setup_db();
        let cache = ExpiringCache::new(3600, 60);
        let gateway = gateway(cache);
        seed_account(&mut db, &cache, &account("42", "alice"));
        // The embedded account under the timeline key is stale; the
        // identity lookup must win.
        let stale = Profile {
            account: account("42", "old_alice"),
            pinned: None,
            timeline: Timeline::default(),
        };
        let key = timeline_key("42", None);
        cache.set(&mut db, &key, &serde_json::to_string(&stale).unwrap()).unwrap();
        let profile = gateway.fetch_profile(&mut db, "alice", None).await.unwrap();
        assert_eq!(profile.account.id, "42");
        assert_eq!(profile.account.handle, "alice");
        assert!(profile.timeline.content.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_profile_rejects_suspended_account() {
        let mut db = setup_db();
        let cache = ExpiringCache::new(3600, 60);
        let gateway = gateway(cache);
        let mut suspended = account("13", "carol");
        suspended.suspended = true;
        seed_account(&mut db, &cache, &suspended);
        // The suspension check fires before any timeline resolution.
        let result = gateway.fetch_profile(&mut db, "carol", None).await;
        assert!(matches!(result, Err(Error::ObjectForbidden(_))));
    }

    #[test]
    fn test_pool_round_robin_visits_each_once() {
        let file = credentials_file(&[
            r#"{"oauth_token": "t1", "oauth_token_secret": "s1"}"#,
            r#"{"oauth_token": "t2", "oauth_token_secret": "s2"}"#,
            r#"{"oauth_token": "t3", "oauth_token_secret": "s3"}"#,
        ]);
        let pool = CredentialPool::load(file.path()).unwrap();
        assert_eq!(pool.len(), 3);
        let cycle: Vec<String> = (0..3).map(|_| pool.next().oauth_token).collect();
        assert_eq!(cycle, vec!["t1", "t2", "t3"]);
        // The cycle wraps back to the first entry.
        assert_eq!(pool.next().oauth_token, "t1");
    }

    #[test]
    fn test_pool_skips_malformed_lines() {
        let file = credentials_file(&[
            "not json",
            r#"{"oauth_token": "t1", "oauth_token_secret": "s1"}"#,
            r#"{"missing": "fields"}"#,
            "",
        ]);
        let pool = CredentialPool::load(file.path()).unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.next().oauth_token, "t1");
    }

    #[test]
    fn test_pool_fails_without_valid_entries() {
        let file = credentials_file(&["not json"]);
        assert!(matches!(CredentialPool::load(file.path()), Err(Error::Config(_))));
        assert!(matches!(
            CredentialPool::load("/nonexistent/sessions.jsonl"),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_cache_aside_caches_positive_results() {
        let mut db = setup_db();
        let cache = ExpiringCache::new(3600, 60);
        let value = cached_or_fetch(&mut db, &cache, "k", || async { Ok(Some("fresh".to_string())) })
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("fresh"));
        // Second call must be served from the cache: the producer fails.
        let value = cached_or_fetch::<String, _, _>(&mut db, &cache, "k", || async {
            Err(Error::Config("producer must not run".to_string()))
        })
        .await
        .unwrap();
        assert_eq!(value.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_cache_aside_never_caches_negative_results() {
        let mut db = setup_db();
        let cache = ExpiringCache::new(3600, 60);
        let value = cached_or_fetch::<String, _, _>(&mut db, &cache, "k", || async { Ok(None) })
            .await
            .unwrap();
        assert!(value.is_none());
        // The miss was not cached, so the producer runs again.
        let value = cached_or_fetch(&mut db, &cache, "k", || async { Ok(Some("second".to_string())) })
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_cache_aside_drops_undecodable_entries() {
        let mut db = setup_db();
        let cache = ExpiringCache::new(3600, 60);
        cache.set(&mut db, "k", "not a number").unwrap();
        let value = cached_or_fetch(&mut db, &cache, "k", || async { Ok(Some(42u32)) })
            .await
            .unwrap();
        assert_eq!(value, Some(42));
    }

    #[test]
    fn test_cache_keys_are_deterministic() {
        assert_eq!(account_key("alice"), "account_alice");
        assert_eq!(timeline_key("42", None), "timeline_42_");
        assert_eq!(timeline_key("42", Some("abc")), "timeline_42_abc");
        assert_ne!(timeline_key("42", Some("abc")), timeline_key("42", Some("def")));
    }

    #[test]
    fn test_status_serialization_shapes() {
        let absent = serde_json::to_value(AccountStatus::absent()).unwrap();
        assert_eq!(absent, serde_json::json!({ "absent": true }));
        let known = serde_json::to_value(AccountStatus::Known {
            protected: true,
            suspended: false,
        })
        .unwrap();
        assert_eq!(known, serde_json::json!({ "protected": true, "suspended": false }));
    }
}
