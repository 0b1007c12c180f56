//! Keyboard shortcut dispatch.
//!
//! This module handles:
//! - Mapping a key press to a [`Shortcut`]
//! - Suppressing shortcuts while a text input has focus
//! - Invoking the shortcut on a [`ShortcutTarget`]
//!
//! The dispatcher knows nothing about the terminal or the layout: the
//! dashboard implements [`ShortcutTarget`] and the timer is reached through
//! the [`TimerControls`] capability.

mod key;

use std::fmt;

pub use key::{Key, KeyPress};

use crate::timer::TimerControls;

// ============================================================================
// FocusTarget
// ============================================================================

/// The controls a focus shortcut can move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// `[1]` the todo text input
    TodoInput,
    /// `[2]` the timer's start control
    TimerStart,
    /// `[3]` the weather city input
    WeatherInput,
}

impl FocusTarget {
    /// Returns true for controls that take typed text.
    pub fn is_text_input(&self) -> bool {
        matches!(self, FocusTarget::TodoInput | FocusTarget::WeatherInput)
    }

    /// The control Tab moves to.
    pub fn next(&self) -> Self {
        match self {
            FocusTarget::TodoInput => FocusTarget::TimerStart,
            FocusTarget::TimerStart => FocusTarget::WeatherInput,
            FocusTarget::WeatherInput => FocusTarget::TodoInput,
        }
    }

    /// The control Shift+Tab moves to.
    pub fn previous(&self) -> Self {
        match self {
            FocusTarget::TodoInput => FocusTarget::WeatherInput,
            FocusTarget::TimerStart => FocusTarget::TodoInput,
            FocusTarget::WeatherInput => FocusTarget::TimerStart,
        }
    }
}

// ============================================================================
// Shortcut
// ============================================================================

/// Actions reachable from a single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    /// `?`
    ToggleHelp,
    /// `Escape`: close help, else drop focus
    Escape,
    /// `1`, `2`, `3`
    Focus(FocusTarget),
    /// `s`
    StartTimer,
    /// `p`
    PauseTimer,
    /// `r`
    ResetTimer,
    /// `c`
    ClearCompleted,
    /// `Ctrl+k`, asks for confirmation first
    ClearAllData,
}

impl Shortcut {
    /// Maps a key press to its shortcut, if any. Letters are matched
    /// case-insensitively; Ctrl combinations other than `Ctrl+k` map to
    /// nothing.
    pub fn resolve(press: &KeyPress) -> Option<Self> {
        if press.ctrl {
            return match press.lowercase_char() {
                Some('k') => Some(Shortcut::ClearAllData),
                _ => None,
            };
        }

        match press.key {
            Key::Escape => Some(Shortcut::Escape),
            Key::Char(_) => match press.lowercase_char()? {
                '?' => Some(Shortcut::ToggleHelp),
                '1' => Some(Shortcut::Focus(FocusTarget::TodoInput)),
                '2' => Some(Shortcut::Focus(FocusTarget::TimerStart)),
                '3' => Some(Shortcut::Focus(FocusTarget::WeatherInput)),
                's' => Some(Shortcut::StartTimer),
                'p' => Some(Shortcut::PauseTimer),
                'r' => Some(Shortcut::ResetTimer),
                'c' => Some(Shortcut::ClearCompleted),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns true if the shortcut fires even while a text input has focus.
    /// Only Escape does, so focus can always be left.
    pub fn fires_in_text_input(&self) -> bool {
        matches!(self, Shortcut::Escape)
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shortcut::ToggleHelp => write!(f, "toggle_help"),
            Shortcut::Escape => write!(f, "escape"),
            Shortcut::Focus(FocusTarget::TodoInput) => write!(f, "focus_todo"),
            Shortcut::Focus(FocusTarget::TimerStart) => write!(f, "focus_timer"),
            Shortcut::Focus(FocusTarget::WeatherInput) => write!(f, "focus_weather"),
            Shortcut::StartTimer => write!(f, "start_timer"),
            Shortcut::PauseTimer => write!(f, "pause_timer"),
            Shortcut::ResetTimer => write!(f, "reset_timer"),
            Shortcut::ClearCompleted => write!(f, "clear_completed"),
            Shortcut::ClearAllData => write!(f, "clear_all_data"),
        }
    }
}

// ============================================================================
// Help text
// ============================================================================

/// Sections of the help overlay: a heading and its lines.
pub const HELP_SECTIONS: &[(&str, &[&str])] = &[
    (
        "NAVIGATION",
        &[
            "[1] Focus Todo List",
            "[2] Focus Pomodoro Timer",
            "[3] Focus Weather Module",
            "[TAB] Next Input Field",
            "[ESC] Clear Focus/Close Help",
        ],
    ),
    (
        "TODO LIST",
        &[
            "[ENTER] Add Task",
            "[UP/DOWN] Select Task",
            "[X] Mark Complete",
            "[D] Delete Task",
            "[C] Clear Completed",
        ],
    ),
    (
        "POMODORO TIMER",
        &["[S] Start Timer", "[P] Pause Timer", "[R] Reset Timer"],
    ),
    (
        "GENERAL",
        &["[?] Toggle Help", "[CTRL+K] Clear All Data", "[Q] Quit"],
    ),
];

// ============================================================================
// ShortcutTarget
// ============================================================================

/// What the dispatcher acts on.
pub trait ShortcutTarget {
    /// The timer's start/pause/reset capability.
    fn timer(&mut self) -> &mut dyn TimerControls;

    /// Returns true while a text input has focus.
    fn text_input_focused(&self) -> bool;

    fn help_open(&self) -> bool;

    fn toggle_help(&mut self);

    fn close_help(&mut self);

    fn clear_focus(&mut self);

    fn focus(&mut self, target: FocusTarget);

    fn clear_completed_todos(&mut self);

    /// Opens the clear-all-data confirmation. Nothing is deleted until the
    /// user confirms.
    fn request_clear_all(&mut self);

    /// Plays the short tone.
    fn notify_short(&self);
}

// ============================================================================
// ShortcutDispatcher
// ============================================================================

/// Result of offering a key press to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key triggered a shortcut.
    Handled(Shortcut),
    /// The key is not a shortcut here; the caller may use it.
    PassThrough,
}

/// Routes key presses to shortcuts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShortcutDispatcher;

impl ShortcutDispatcher {
    /// Creates a new ShortcutDispatcher.
    pub fn new() -> Self {
        Self
    }

    /// Offers one key press. Suppressed and unmatched keys pass through.
    pub fn dispatch(&self, press: KeyPress, target: &mut dyn ShortcutTarget) -> KeyOutcome {
        let Some(shortcut) = Shortcut::resolve(&press) else {
            return KeyOutcome::PassThrough;
        };

        if target.text_input_focused() && !shortcut.fires_in_text_input() {
            return KeyOutcome::PassThrough;
        }

        tracing::debug!(shortcut = %shortcut, "Shortcut triggered");
        Self::apply(shortcut, target);
        KeyOutcome::Handled(shortcut)
    }

    fn apply(shortcut: Shortcut, target: &mut dyn ShortcutTarget) {
        match shortcut {
            Shortcut::ToggleHelp => {
                target.toggle_help();
                target.notify_short();
            }
            Shortcut::Escape => {
                if target.help_open() {
                    target.close_help();
                    target.notify_short();
                } else {
                    target.clear_focus();
                }
            }
            Shortcut::Focus(focus) => {
                target.focus(focus);
                target.notify_short();
            }
            Shortcut::StartTimer => target.timer().start(),
            Shortcut::PauseTimer => target.timer().pause(),
            Shortcut::ResetTimer => target.timer().reset(),
            Shortcut::ClearCompleted => target.clear_completed_todos(),
            Shortcut::ClearAllData => target.request_clear_all(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
