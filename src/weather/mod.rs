//! Weather panel backed by a mocked lookup.
//!
//! A lookup takes a city name, waits a fixed latency and returns randomly
//! generated conditions. The last report is cached under `retrodash_weather`
//! and counts as fresh for one hour.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::sound::NotificationSink;
use crate::storage::{Storage, StorageKey};
use crate::types::constants::{WEATHER_FRESH_MILLIS, WEATHER_LATENCY};

// ============================================================================
// Report types
// ============================================================================

/// Sky conditions the mock lookup can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Clear,
    Cloudy,
    Rainy,
    Sunny,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::Clear,
        Condition::Cloudy,
        Condition::Rainy,
        Condition::Sunny,
        Condition::PartlyCloudy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Cloudy => "Cloudy",
            Condition::Rainy => "Rainy",
            Condition::Sunny => "Sunny",
            Condition::PartlyCloudy => "Partly Cloudy",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One weather lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    /// Degrees Celsius
    pub temp: i32,
    pub feels_like: i32,
    pub condition: Condition,
    /// Percent
    pub humidity: u32,
    /// km/h
    pub wind_speed: u32,
    /// Local time of the lookup, human readable
    pub timestamp: String,
}

/// The stored weather record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherCache {
    pub city: String,
    pub data: Option<WeatherReport>,
    /// Epoch milliseconds of the last successful lookup
    pub last_fetch: Option<i64>,
}

impl WeatherCache {
    /// Returns true if there is data fetched less than an hour before `now_millis`.
    pub fn is_fresh(&self, now_millis: i64) -> bool {
        match (&self.data, self.last_fetch) {
            (Some(_), Some(fetched)) => now_millis - fetched < WEATHER_FRESH_MILLIS,
            _ => false,
        }
    }
}

/// Panel status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherStatus {
    Offline,
    Loading,
    Cached,
}

impl WeatherStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherStatus::Offline => "OFFLINE",
            WeatherStatus::Loading => "LOADING...",
            WeatherStatus::Cached => "CACHED",
        }
    }
}

impl fmt::Display for WeatherStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Mock lookup
// ============================================================================

/// Generates a plausible report for `city`.
pub fn generate_report<R: Rng + ?Sized>(city: &str, rng: &mut R, now: DateTime<Local>) -> WeatherReport {
    let temp = rng.random_range(10..40);
    let feels_like = temp + rng.random_range(-2..=2);
    let condition = Condition::ALL[rng.random_range(0..Condition::ALL.len())];

    WeatherReport {
        city: city.to_string(),
        temp,
        feels_like,
        condition,
        humidity: rng.random_range(40..80),
        wind_speed: rng.random_range(5..25),
        timestamp: now.format("%-I:%M:%S %p").to_string(),
    }
}

/// Performs the mocked lookup: waits the simulated latency, then generates.
pub async fn fetch_mock(city: String) -> WeatherReport {
    tokio::time::sleep(WEATHER_LATENCY).await;
    let mut rng = rand::rng();
    generate_report(&city, &mut rng, Local::now())
}

// ============================================================================
// WeatherPanel
// ============================================================================

/// Weather panel state: the cache, the status label and the in-flight city.
///
/// A stale cache is kept (its city is still stored) but not displayed.
pub struct WeatherPanel {
    cache: WeatherCache,
    status: WeatherStatus,
    showing: bool,
    pending: Option<String>,
    storage: Storage,
    sink: Arc<dyn NotificationSink>,
}

impl WeatherPanel {
    /// Loads the stored cache. A fresh one is shown as `CACHED`; a stale or
    /// empty one shows nothing under `OFFLINE`.
    pub fn load(storage: Storage, sink: Arc<dyn NotificationSink>, now_millis: i64) -> Self {
        let cache: WeatherCache = storage.load_or_default(StorageKey::Weather);
        let showing = cache.is_fresh(now_millis);
        let status = if showing {
            WeatherStatus::Cached
        } else {
            WeatherStatus::Offline
        };
        debug!(city = %cache.city, status = %status, "Weather cache loaded");

        Self {
            cache,
            status,
            showing,
            pending: None,
            storage,
            sink,
        }
    }

    /// Starts a lookup for `input`. Returns the trimmed city to fetch, or
    /// None (and changes nothing) when the input is blank.
    pub fn begin_fetch(&mut self, input: &str) -> Option<String> {
        let city = input.trim();
        if city.is_empty() {
            return None;
        }

        self.status = WeatherStatus::Loading;
        self.pending = Some(city.to_string());
        info!(city, "Weather lookup started");
        Some(city.to_string())
    }

    /// Stores a finished lookup. Reports for a city that is no longer the
    /// pending one are dropped; returns whether the report was applied.
    pub fn finish_fetch(&mut self, report: WeatherReport, now_millis: i64) -> bool {
        if self.pending.as_deref() != Some(report.city.as_str()) {
            debug!(city = %report.city, "Dropping superseded weather report");
            return false;
        }

        self.pending = None;
        self.cache = WeatherCache {
            city: report.city.clone(),
            data: Some(report),
            last_fetch: Some(now_millis),
        };
        self.storage.save(StorageKey::Weather, &self.cache);
        self.status = WeatherStatus::Cached;
        self.showing = true;
        self.sink.notify_short();
        true
    }

    /// Resets to an empty cache. Used by clear-all-data, which removes the
    /// stored key itself.
    pub fn clear(&mut self) {
        self.cache = WeatherCache::default();
        self.status = WeatherStatus::Offline;
        self.showing = false;
        self.pending = None;
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// The report to display: fresh at startup or fetched since.
    pub fn report(&self) -> Option<&WeatherReport> {
        self.cache.data.as_ref().filter(|_| self.showing)
    }

    pub fn status(&self) -> WeatherStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

impl fmt::Debug for WeatherPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherPanel")
            .field("cache", &self.cache)
            .field("status", &self.status)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
