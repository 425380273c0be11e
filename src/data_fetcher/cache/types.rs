//! Cache statistics types

use std::fmt;

/// Size and hit counters of one memo cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheInfo {
    /// Keys holding a computed value
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheInfo {
    /// Share of lookups answered from the cache, 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// Combined cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub teams: CacheInfo,
    pub season_logs: CacheInfo,
    pub standings: CacheInfo,
}

impl CacheStats {
    pub fn total_entries(&self) -> usize {
        self.teams.size + self.season_logs.size + self.standings.size
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cache Statistics:")?;
        for (label, info) in [
            ("Team Directory", &self.teams),
            ("Season Logs", &self.season_logs),
            ("Standings", &self.standings),
        ] {
            writeln!(
                f,
                "  {label}: {}/{} entries, {} hits, {} misses",
                info.size, info.capacity, info.hits, info.misses
            )?;
        }
        Ok(())
    }
}
