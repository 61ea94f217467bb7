use chrono::Utc;
use diesel::prelude::*;
use rand::Rng;

use roost_core::schema::cache;
use roost_core::{Database, Result};

#[derive(Queryable, Insertable, Debug)]
#[diesel(table_name = cache)]
struct CacheRow {
    key: String,
    value: String,
    timestamp: i64,
}

/// Key/value cache over the `cache` table with read-time randomized expiry.
///
/// The effective TTL is redrawn on every read as `base_ttl ± jitter`, which
/// desynchronizes mass expiry without a background sweeper. The same key may
/// therefore expire at slightly different instants for different readers; an
/// accepted trade-off.
#[derive(Debug, Clone, Copy)]
pub struct ExpiringCache {
    base_ttl: i64,
    jitter: i64,
}

impl ExpiringCache {
    /// `base_ttl` and `jitter` in seconds; `jitter` should be well below
    /// `base_ttl` or fresh writes can expire immediately.
    pub fn new(base_ttl: i64, jitter: i64) -> Self {
        ExpiringCache { base_ttl, jitter }
    }

    /// Create the backing table when it does not exist yet.
    pub fn initialize(db: Database) -> Result<()> {
        diesel::sql_query(
            "CREATE TABLE IF NOT EXISTS cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                timestamp BIGINT NOT NULL
            )",
        )
        .execute(db)?;
        Ok(())
    }

    /// Cached value, or `None` when the key was never set or the entry is
    /// expired. Expired entries are deleted eagerly on read.
    pub fn get(&self, db: Database, key: &str) -> Result<Option<String>> {
        use roost_core::schema::cache::dsl;
        let row = dsl::cache.filter(dsl::key.eq(key)).first::<CacheRow>(db).optional()?;
        let Some(row) = row else {
            return Ok(None);
        };
        let age = Utc::now().timestamp() - row.timestamp;
        if age > self.effective_ttl() {
            diesel::delete(dsl::cache.filter(dsl::key.eq(key))).execute(db)?;
            tracing::debug!("Evicted expired cache entry `{}`", key);
            return Ok(None);
        }
        Ok(Some(row.value))
    }

    /// Upsert: a refresh replaces the row wholesale, timestamp included.
    pub fn set(&self, db: Database, key: &str, value: &str) -> Result<()> {
        use roost_core::schema::cache::dsl;
        let row = CacheRow {
            key: key.to_string(),
            value: value.to_string(),
            timestamp: Utc::now().timestamp(),
        };
        diesel::insert_into(dsl::cache)
            .values(&row)
            .on_conflict(dsl::key)
            .do_update()
            .set((dsl::value.eq(&row.value), dsl::timestamp.eq(row.timestamp)))
            .execute(db)?;
        Ok(())
    }

    pub fn delete(&self, db: Database, key: &str) -> Result<()> {
        use roost_core::schema::cache::dsl;
        diesel::delete(dsl::cache.filter(dsl::key.eq(key))).execute(db)?;
        Ok(())
    }

    /// Bulk-delete entries older than `base_ttl + jitter`. The bound is the
    /// most conservative one, never a fresh jittered draw, so no entry that
    /// any reader still considers fresh is removed.
    pub fn clear_expired(&self, db: Database) -> Result<usize> {
        use roost_core::schema::cache::dsl;
        let bound = Utc::now().timestamp() - (self.base_ttl + self.jitter);
        let count = diesel::delete(dsl::cache.filter(dsl::timestamp.lt(bound))).execute(db)?;
        Ok(count)
    }

    pub fn clear_all(&self, db: Database) -> Result<usize> {
        use roost_core::schema::cache::dsl;
        let count = diesel::delete(dsl::cache).execute(db)?;
        Ok(count)
    }

    fn effective_ttl(&self) -> i64 {
        if self.jitter == 0 {
            return self.base_ttl;
        }
        self.base_ttl + rand::thread_rng().gen_range(-self.jitter..=self.jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> SqliteConnection {
        let mut db = SqliteConnection::establish(":memory:").unwrap();
        ExpiringCache::initialize(&mut db).unwrap();
        db
    }

    fn insert_aged(db: Database, key: &str, value: &str, age_secs: i64) {
        use roost_core::schema::cache::dsl;
        let row = CacheRow {
            key: key.to_string(),
            value: value.to_string(),
            timestamp: Utc::now().timestamp() - age_secs,
        };
        diesel::insert_into(dsl::cache).values(&row).execute(db).unwrap();
    }

    fn count(db: Database) -> i64 {
        use roost_core::schema::cache::dsl;
        dsl::cache.count().get_result(db).unwrap()
    }

    #[test]
    fn test_set_then_get() {
        let mut db = setup();
        let cache = ExpiringCache::new(100, 10);
        cache.set(&mut db, "k", "v1").unwrap();
        assert_eq!(cache.get(&mut db, "k").unwrap().as_deref(), Some("v1"));
        assert_eq!(cache.get(&mut db, "missing").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites_wholesale() {
        let mut db = setup();
        let cache = ExpiringCache::new(100, 10);
        insert_aged(&mut db, "k", "old", 80);
        cache.set(&mut db, "k", "new").unwrap();
        assert_eq!(cache.get(&mut db, "k").unwrap().as_deref(), Some("new"));
        assert_eq!(count(&mut db), 1);
    }

    #[test]
    fn test_fresh_entry_always_survives_jitter() {
        let mut db = setup();
        let cache = ExpiringCache::new(100, 10);
        insert_aged(&mut db, "k", "v", 50);
        // Age below base - jitter: present no matter what the draw was.
        for _ in 0..20 {
            assert!(cache.get(&mut db, "k").unwrap().is_some());
        }
    }

    #[test]
    fn test_stale_entry_always_expired_and_eagerly_deleted() {
        let mut db = setup();
        let cache = ExpiringCache::new(100, 10);
        insert_aged(&mut db, "k", "v", 200);
        // Age above base + jitter: absent no matter what the draw was.
        assert_eq!(cache.get(&mut db, "k").unwrap(), None);
        assert_eq!(count(&mut db), 0);
    }

    #[test]
    fn test_zero_jitter_boundary() {
        let mut db = setup();
        let cache = ExpiringCache::new(100, 0);
        insert_aged(&mut db, "young", "v", 99);
        insert_aged(&mut db, "old", "v", 101);
        assert!(cache.get(&mut db, "young").unwrap().is_some());
        assert!(cache.get(&mut db, "old").unwrap().is_none());
    }

    #[test]
    fn test_clear_expired_is_conservative() {
        let mut db = setup();
        let cache = ExpiringCache::new(100, 10);
        // Older than base but inside the jitter window: must be kept, since
        // some reader could still draw a TTL that considers it fresh.
        insert_aged(&mut db, "borderline", "v", 105);
        insert_aged(&mut db, "stale", "v", 120);
        let cleared = cache.clear_expired(&mut db).unwrap();
        assert_eq!(cleared, 1);
        assert_eq!(count(&mut db), 1);
    }

    #[test]
    fn test_clear_all() {
        let mut db = setup();
        let cache = ExpiringCache::new(100, 10);
        cache.set(&mut db, "a", "1").unwrap();
        cache.set(&mut db, "b", "2").unwrap();
        assert_eq!(cache.clear_all(&mut db).unwrap(), 2);
        assert_eq!(count(&mut db), 0);
    }

    #[test]
    fn test_delete_single_key() {
        let mut db = setup();
        let cache = ExpiringCache::new(100, 10);
        cache.set(&mut db, "a", "1").unwrap();
        cache.set(&mut db, "b", "2").unwrap();
        cache.delete(&mut db, "a").unwrap();
        assert!(cache.get(&mut db, "a").unwrap().is_none());
        assert!(cache.get(&mut db, "b").unwrap().is_some());
    }
}
