pub mod memo;
pub mod stats_cache;
pub mod types;

pub use memo::MemoCache;
pub use stats_cache::StatsCache;
pub use types::{CacheInfo, CacheStats};
