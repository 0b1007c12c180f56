//! Timer module for the dashboard.
//!
//! - `engine`: the Pomodoro state machine
//! - `scheduler`: tick sources that drive it

pub mod engine;
pub mod scheduler;

pub use engine::{TickOutcome, TimerControls, TimerEngine};
pub use scheduler::{ManualTickScheduler, TickScheduler, TickSignal, TokioTickScheduler};
