mod error;
mod router;
mod state;

use axum::Router;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use dotenvy::dotenv;
use tower_http::trace::TraceLayer;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use std::env;
use std::sync::Arc;
use std::time::Duration;

use roost_cache::ExpiringCache;
use roost_gateway::{pool::CredentialPool, Gateway};

use crate::state::AppState;

const DEFAULT_CACHE_TTL_SECS: i64 = 3600;
const DEFAULT_CACHE_JITTER_SECS: i64 = 300;
const SWEEP_INTERVAL_SECS: u64 = 900;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 1. Initialize logger
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env()
        .unwrap()
        .add_directive("hyper::proto=info".parse().unwrap())
        .add_directive("hyper::client=info".parse().unwrap())
        .add_directive("reqwest=info".parse().unwrap());
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    // 2. Initialize store and cache table
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder().max_size(16).build(manager).unwrap();
    {
        let mut db = pool.get().expect("cannot acquire store connection");
        ExpiringCache::initialize(&mut db).expect("cannot initialize cache table");
    }

    // 3. Load credentials; no valid entry is fatal at startup
    let sessions_file = env::var("SESSIONS_FILE").unwrap_or_else(|_| "sessions.jsonl".to_string());
    let credentials = Arc::new(CredentialPool::load(&sessions_file).expect("cannot load credentials"));

    // 4. Set up the gateway
    let base_ttl = env_i64("CACHE_TTL", DEFAULT_CACHE_TTL_SECS);
    let jitter = env_i64("CACHE_JITTER", DEFAULT_CACHE_JITTER_SECS);
    let cache = ExpiringCache::new(base_ttl, jitter);
    let gateway = Gateway::new(credentials, cache);

    // 5. Periodic sweep of expired entries
    let sweep_pool = pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            let Ok(mut db) = sweep_pool.get() else {
                tracing::warn!("Cache sweep skipped: store unavailable");
                continue;
            };
            match cache.clear_expired(&mut db) {
                Ok(0) => {}
                Ok(count) => tracing::info!("Cleared {} expired cache entries", count),
                Err(error) => tracing::error!("Cache sweep failed: {}", error),
            }
        }
    });

    // 6. Set up state and router
    let app_state = AppState { pool, gateway };
    let app = Router::new()
        .merge(router::gateway_router())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // 7. Start server
    let addr = env::var("SERVER_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    tracing::info!("Server starting at {}", addr);
    axum::Server::bind(&addr.parse().unwrap())
        .serve(app.into_make_service())
        .await
        .unwrap();
}

fn env_i64(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
