mod cache;

pub use cache::ExpiringCache;
