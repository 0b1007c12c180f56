//! Compile-time settings.
//!
//! The dashboard takes no arguments and reads no configuration files; these
//! values are the whole of its configuration.

use std::time::Duration;

/// Default work interval: 25 minutes.
pub const WORK_DURATION_SECONDS: u32 = 25 * 60;

/// Default break interval: 5 minutes.
pub const BREAK_DURATION_SECONDS: u32 = 5 * 60;

/// Upper bound accepted by `TimerConfig::validate` (24 hours).
pub const MAX_DURATION_SECONDS: u32 = 24 * 60 * 60;

/// Period of the timer's tick source.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Simulated latency of the mock weather lookup.
pub const WEATHER_LATENCY: Duration = Duration::from_millis(500);

/// How long a weather report counts as fresh, in milliseconds.
pub const WEATHER_FRESH_MILLIS: i64 = 60 * 60 * 1000;

/// Maximum length of a todo's text, in characters.
pub const TODO_MAX_CHARS: usize = 80;

/// Directory name under the platform data directory.
pub const DATA_DIR_NAME: &str = "retrodash";

/// Log file written inside the data directory.
pub const LOG_FILE_NAME: &str = "retrodash.log";
