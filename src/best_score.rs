//! Best score persistence
//!
//! Persisted to LocalStorage as a plain integer string, the only state that
//! outlives a page load besides the audio settings.

use crate::sim::RunSummary;

/// Key-value store holding the best score
pub trait BestScoreStore {
    /// Stored best score (0 when absent or unreadable)
    fn load(&self) -> u32;

    /// Overwrite the stored best score
    fn save(&mut self, score: u32);
}

/// LocalStorage key
pub const STORAGE_KEY: &str = "irysGameBestScore";

/// Parse a stored value, treating anything unreadable as no score
pub fn parse_stored(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(0)
}

/// Persist a finished run's score if it beat the in-memory best
///
/// The comparison was already made by the simulation, so the store is only
/// written, never read back. Returns true when a write happened.
pub fn record_run(store: &mut impl BestScoreStore, summary: &RunSummary) -> bool {
    if summary.new_best {
        store.save(summary.score);
        log::info!("New best score saved: {}", summary.score);
    }
    summary.new_best
}

/// In-process store for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a raw value, as if written by an earlier session
    pub fn with_raw(raw: &str) -> Self {
        Self {
            value: Some(raw.to_string()),
        }
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        parse_stored(self.value.as_deref())
    }

    fn save(&mut self, score: u32) {
        self.value = Some(score.to_string());
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl BestScoreStore for LocalStorageStore {
    fn load(&self) -> u32 {
        let raw = Self::storage().and_then(|s| s.get_item(STORAGE_KEY).ok().flatten());
        let best = parse_stored(raw.as_deref());
        log::info!("Loaded best score: {}", best);
        best
    }

    fn save(&mut self, score: u32) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(STORAGE_KEY, &score.to_string()).is_err() {
                    log::warn!("Failed to write best score");
                }
            }
            None => log::warn!("LocalStorage unavailable, best score not persisted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stored() {
        assert_eq!(parse_stored(None), 0);
        assert_eq!(parse_stored(Some("42")), 42);
        assert_eq!(parse_stored(Some(" 17\n")), 17);
        assert_eq!(parse_stored(Some("")), 0);
        assert_eq!(parse_stored(Some("not a number")), 0);
        assert_eq!(parse_stored(Some("-3")), 0);
    }

    #[test]
    fn test_empty_store_defaults_to_zero() {
        assert_eq!(MemoryStore::new().load(), 0);
    }

    fn summary(score: u32, new_best: bool) -> RunSummary {
        RunSummary {
            score,
            level: 1,
            level_name: "Beginner Network",
            new_best,
        }
    }

    /// Counts reads so a test can tell whether the store was consulted
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        loads: std::cell::Cell<u32>,
    }

    impl BestScoreStore for CountingStore {
        fn load(&self) -> u32 {
            self.loads.set(self.loads.get() + 1);
            self.inner.load()
        }

        fn save(&mut self, score: u32) {
            self.inner.save(score);
        }
    }

    #[test]
    fn test_record_only_when_beaten() {
        let mut store = MemoryStore::with_raw("20");
        assert!(!record_run(&mut store, &summary(5, false)));
        assert_eq!(store.load(), 20);

        assert!(record_run(&mut store, &summary(21, true)));
        assert_eq!(store.load(), 21);
    }

    #[test]
    fn test_record_does_not_read_store() {
        let mut store = CountingStore::default();
        record_run(&mut store, &summary(7, true));
        record_run(&mut store, &summary(3, false));
        assert_eq!(store.loads.get(), 0);
        assert_eq!(store.inner.load(), 7);
    }

    #[test]
    fn test_corrupt_value_is_replaced() {
        let mut store = MemoryStore::with_raw("garbage");
        assert!(record_run(&mut store, &summary(1, true)));
        assert_eq!(store.load(), 1);
    }
}
