//! RetroDash Library
//!
//! This library provides the core of the RetroDash terminal dashboard.
//! It includes:
//! - Timer engine and tick scheduling for the Pomodoro panel
//! - Keyboard shortcut dispatch
//! - Todo list and mock weather panels
//! - Best-effort local JSON storage
//! - Notification tones
//! - The full-screen dashboard and its event loop

pub mod dashboard;
pub mod shortcuts;
pub mod sound;
pub mod storage;
pub mod timer;
pub mod todo;
pub mod types;
pub mod weather;

// Re-export commonly used types for convenience
pub use types::{ConfigError, TimerConfig, TimerMode, TimerRecord, TimerState, TimerStatus};

// Re-export timer types
pub use timer::{
    ManualTickScheduler, TickOutcome, TickScheduler, TickSignal, TimerControls, TimerEngine,
    TokioTickScheduler,
};

// Re-export shortcut types
pub use shortcuts::{
    FocusTarget, Key, KeyOutcome, KeyPress, Shortcut, ShortcutDispatcher, ShortcutTarget,
};

// Re-export sound types
pub use sound::{
    default_sink, try_create_player, Chime, NotificationSink, RecordingSink, SilentSink,
    SoundError, TonePlayer,
};

// Re-export storage types
pub use storage::{Storage, StorageError, StorageKey};

// Re-export panel types
pub use dashboard::{Command, Dashboard};
pub use todo::{Todo, TodoList};
pub use weather::{Condition, WeatherCache, WeatherPanel, WeatherReport, WeatherStatus};
