//! Score and progress persistence
//!
//! On the web target everything lands in the browser's LocalStorage under
//! the same keys the UI reads. Native builds (headless runner, tests) use an
//! in-memory map behind the same trait. Values are stored as strings, with
//! the run history serialized as JSON.

use log::info;
use serde::{Deserialize, Serialize};

/// Storage keys shared with the UI layer
pub mod keys {
    /// Running score of the current run
    pub const SCORE: &str = "score";
    /// Number of plagues saved in the current run
    pub const SAVED: &str = "saved";
    /// JSON array of finished-run records
    pub const TOTALS: &str = "totals";
    /// Set once the intro plot has been viewed
    pub const PLOT_IS_VIEWED: &str = "plotIsViewed";
}

/// String key/value store; the smallest surface LocalStorage offers
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory storage for native builds and tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: std::collections::HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// Browser LocalStorage (WASM only). Quota or availability failures are
/// swallowed: losing a score write must never take the game down.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn backing() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::backing().and_then(|s| s.get_item(key).ok()).flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = Self::backing() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = Self::backing() {
            let _ = storage.remove_item(key);
        }
    }
}

/// One finished run in the history list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalRecord {
    /// ISO-8601 date the run finished
    pub date: String,
    pub score: String,
}

/// Typed view over the raw storage keys the game writes
pub struct ScoreBook {
    storage: Box<dyn Storage>,
}

impl ScoreBook {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    fn get_u32(&self, key: &str) -> u32 {
        self.storage
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    pub fn score(&self) -> u32 {
        self.get_u32(keys::SCORE)
    }

    pub fn saved(&self) -> u32 {
        self.get_u32(keys::SAVED)
    }

    /// Add points for one saved plague and bump the saved counter
    pub fn add_score(&mut self, points: u32) {
        let score = self.score() + points;
        let saved = self.saved() + 1;
        self.storage.set(keys::SCORE, &score.to_string());
        self.storage.set(keys::SAVED, &saved.to_string());
    }

    pub fn totals(&self) -> Vec<TotalRecord> {
        self.storage
            .get(keys::TOTALS)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Append the finished run to the history and clear the run keys
    pub fn finish_run(&mut self, date: &str) {
        let score = self.score();
        let mut totals = self.totals();
        totals.push(TotalRecord {
            date: date.to_string(),
            score: score.to_string(),
        });
        match serde_json::to_string(&totals) {
            Ok(json) => self.storage.set(keys::TOTALS, &json),
            Err(e) => log::warn!("failed to serialize run history: {e}"),
        }
        self.storage.remove(keys::SCORE);
        self.storage.remove(keys::SAVED);
        info!("run finished with score {score}, {} total runs", self.totals().len());
    }

    pub fn plot_viewed(&self) -> bool {
        self.storage.get(keys::PLOT_IS_VIEWED).as_deref() == Some("true")
    }

    pub fn set_plot_viewed(&mut self) {
        self.storage.set(keys::PLOT_IS_VIEWED, "true");
    }
}

/// Current date as an ISO-8601 string
#[cfg(target_arch = "wasm32")]
pub fn iso_date_now() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

/// Current date as `YYYY-MM-DD` computed from the system clock
#[cfg(not(target_arch = "wasm32"))]
pub fn iso_date_now() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let days = secs / 86_400;
    // Civil-from-days (Howard Hinnant's algorithm)
    let z = days as i64 + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    format!("{y:04}-{m:02}-{d:02}")
}
