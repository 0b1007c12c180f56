//! The dashboard: the three panels, focus, help and the key handling that
//! ties them together.
//!
//! This module handles:
//! - Routing key presses (confirmation prompt, shortcuts, text entry)
//! - Applying tick signals and weather results
//! - Clear-all-data
//!
//! `render` draws it, `terminal` owns the raw-mode session and `runtime`
//! runs the event loop.

pub mod render;
pub mod runtime;
pub mod terminal;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::shortcuts::{FocusTarget, Key, KeyOutcome, KeyPress, ShortcutDispatcher, ShortcutTarget};
use crate::sound::NotificationSink;
use crate::storage::Storage;
use crate::timer::{TickOutcome, TickScheduler, TickSignal, TimerControls, TimerEngine};
use crate::todo::TodoList;
use crate::types::constants::TODO_MAX_CHARS;
use crate::types::TimerConfig;
use crate::weather::{WeatherPanel, WeatherReport};

/// Text of the clear-all-data prompt.
pub const CONFIRM_CLEAR_PROMPT: &str = "Clear all data? This cannot be undone. [y/N]";

/// Work the event loop must do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    /// Start the weather lookup for this city
    FetchWeather(String),
    Quit,
}

/// All dashboard state. Generic over the tick source so tests can drive
/// the timer by hand.
pub struct Dashboard<S: TickScheduler> {
    engine: TimerEngine<S>,
    todos: TodoList,
    weather: WeatherPanel,
    storage: Storage,
    sink: Arc<dyn NotificationSink>,
    dispatcher: ShortcutDispatcher,
    focus: Option<FocusTarget>,
    help_open: bool,
    confirm_clear: bool,
    todo_input: String,
    weather_input: String,
    selected: usize,
}

impl<S: TickScheduler> Dashboard<S> {
    /// Builds the dashboard from stored data.
    pub fn new(
        config: TimerConfig,
        scheduler: S,
        sink: Arc<dyn NotificationSink>,
        storage: Storage,
        now: DateTime<Utc>,
    ) -> Self {
        let engine = TimerEngine::new(config, scheduler, sink.clone(), storage.clone());
        let todos = TodoList::load(storage.clone(), sink.clone());
        let weather = WeatherPanel::load(storage.clone(), sink.clone(), now.timestamp_millis());

        Self {
            engine,
            todos,
            weather,
            storage,
            sink,
            dispatcher: ShortcutDispatcher::new(),
            focus: None,
            help_open: false,
            confirm_clear: false,
            todo_input: String::new(),
            weather_input: String::new(),
            selected: 0,
        }
    }

    /// Handles one key press.
    pub fn handle_key(&mut self, press: KeyPress, now: DateTime<Utc>) -> Command {
        if press.ctrl && press.lowercase_char() == Some('c') {
            return Command::Quit;
        }

        if self.confirm_clear {
            self.confirm_clear = false;
            if press == KeyPress::char('y') || press == KeyPress::char('Y') {
                self.clear_all_data();
            } else {
                debug!("Clear all data cancelled");
            }
            return Command::None;
        }

        let dispatcher = self.dispatcher;
        match dispatcher.dispatch(press, self) {
            KeyOutcome::Handled(_) => Command::None,
            KeyOutcome::PassThrough => self.handle_unbound(press, now),
        }
    }

    /// Applies a tick signal from the scheduler.
    pub fn handle_tick(&mut self, signal: TickSignal) -> TickOutcome {
        self.engine.on_tick(signal)
    }

    /// Applies a finished weather lookup.
    pub fn handle_weather(&mut self, report: WeatherReport, now: DateTime<Utc>) {
        self.weather.finish_fetch(report, now.timestamp_millis());
    }

    /// Wipes every stored key and resets all panels. The session count
    /// goes back to zero.
    pub fn clear_all_data(&mut self) {
        self.storage.clear_all();
        self.todos.clear();
        self.weather.clear();
        self.engine.wipe();
        self.selected = 0;
        self.todo_input.clear();
        self.weather_input.clear();
        self.sink.notify_short();
        info!("All data cleared");
    }

    fn handle_unbound(&mut self, press: KeyPress, now: DateTime<Utc>) -> Command {
        if press.ctrl {
            return Command::None;
        }

        match press.key {
            Key::Tab => {
                self.focus = Some(self.focus.map_or(FocusTarget::TodoInput, |f| f.next()));
                return Command::None;
            }
            Key::BackTab => {
                self.focus = Some(self.focus.map_or(FocusTarget::WeatherInput, |f| f.previous()));
                return Command::None;
            }
            _ => {}
        }

        match self.focus {
            Some(FocusTarget::TodoInput) => {
                self.edit_todo_input(press.key, now);
                Command::None
            }
            Some(FocusTarget::WeatherInput) => self.edit_weather_input(press.key),
            Some(FocusTarget::TimerStart) | None => self.navigate(press.key),
        }
    }

    fn edit_todo_input(&mut self, key: Key, now: DateTime<Utc>) {
        match key {
            Key::Char(c) if self.todo_input.chars().count() < TODO_MAX_CHARS => {
                self.todo_input.push(c);
            }
            Key::Backspace => {
                self.todo_input.pop();
            }
            Key::Enter => {
                if self.todos.add(&self.todo_input, now).is_some() {
                    self.todo_input.clear();
                }
            }
            _ => {}
        }
    }

    fn edit_weather_input(&mut self, key: Key) -> Command {
        match key {
            Key::Char(c) => self.weather_input.push(c),
            Key::Backspace => {
                self.weather_input.pop();
            }
            Key::Enter => {
                if let Some(city) = self.weather.begin_fetch(&self.weather_input) {
                    self.weather_input.clear();
                    return Command::FetchWeather(city);
                }
            }
            _ => {}
        }
        Command::None
    }

    fn navigate(&mut self, key: Key) -> Command {
        match key {
            Key::Enter if self.focus == Some(FocusTarget::TimerStart) => self.engine.start(),
            Key::Up => self.selected = self.selected.saturating_sub(1),
            Key::Down => {
                if self.selected + 1 < self.todos.len() {
                    self.selected += 1;
                }
            }
            Key::Char(c) => match c.to_ascii_lowercase() {
                'x' => {
                    if let Some(id) = self.selected_id() {
                        self.todos.toggle(id);
                    }
                }
                'd' => {
                    if let Some(id) = self.selected_id() {
                        self.todos.delete(id);
                        self.clamp_selection();
                    }
                }
                'q' => return Command::Quit,
                _ => {}
            },
            _ => {}
        }
        Command::None
    }

    fn selected_id(&self) -> Option<i64> {
        self.todos.items().get(self.selected).map(|t| t.id)
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.todos.len().saturating_sub(1));
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn engine(&self) -> &TimerEngine<S> {
        &self.engine
    }

    pub fn todos(&self) -> &TodoList {
        &self.todos
    }

    pub fn weather(&self) -> &WeatherPanel {
        &self.weather
    }

    pub fn focus(&self) -> Option<FocusTarget> {
        self.focus
    }

    pub fn is_help_open(&self) -> bool {
        self.help_open
    }

    /// Returns true while the clear-all-data prompt waits for an answer.
    pub fn confirm_pending(&self) -> bool {
        self.confirm_clear
    }

    pub fn todo_input(&self) -> &str {
        &self.todo_input
    }

    pub fn weather_input(&self) -> &str {
        &self.weather_input
    }

    /// Index of the selected todo.
    pub fn selected(&self) -> usize {
        self.selected
    }
}

impl<S: TickScheduler> ShortcutTarget for Dashboard<S> {
    fn timer(&mut self) -> &mut dyn TimerControls {
        &mut self.engine
    }

    fn text_input_focused(&self) -> bool {
        self.focus.is_some_and(|f| f.is_text_input())
    }

    fn help_open(&self) -> bool {
        self.help_open
    }

    fn toggle_help(&mut self) {
        self.help_open = !self.help_open;
    }

    fn close_help(&mut self) {
        self.help_open = false;
    }

    fn clear_focus(&mut self) {
        self.focus = None;
    }

    fn focus(&mut self, target: FocusTarget) {
        self.focus = Some(target);
    }

    fn clear_completed_todos(&mut self) {
        self.todos.clear_completed();
        self.clamp_selection();
    }

    fn request_clear_all(&mut self) {
        self.confirm_clear = true;
    }

    fn notify_short(&self) {
        self.sink.notify_short();
    }
}

impl<S: TickScheduler> std::fmt::Debug for Dashboard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("state", self.engine.state())
            .field("focus", &self.focus)
            .field("help_open", &self.help_open)
            .field("confirm_clear", &self.confirm_clear)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::{Chime, RecordingSink};
    use crate::storage::StorageKey;
    use crate::timer::ManualTickScheduler;
    use crate::types::{TimerMode, TimerRecord, TimerStatus};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    fn create_dashboard() -> (
        Dashboard<ManualTickScheduler>,
        Arc<RecordingSink>,
        Storage,
        tempfile::TempDir,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let sink = Arc::new(RecordingSink::new());
        let dashboard = Dashboard::new(
            TimerConfig::default(),
            ManualTickScheduler::new(),
            sink.clone(),
            storage.clone(),
            now(),
        );
        (dashboard, sink, storage, dir)
    }

    fn type_text(dashboard: &mut Dashboard<ManualTickScheduler>, text: &str) {
        for c in text.chars() {
            dashboard.handle_key(KeyPress::char(c), now());
        }
    }

    fn press(dashboard: &mut Dashboard<ManualTickScheduler>, key: Key) -> Command {
        dashboard.handle_key(KeyPress::plain(key), now())
    }

    // ------------------------------------------------------------------------
    // Shortcut Tests
    // ------------------------------------------------------------------------

    mod shortcut_tests {
        use super::*;

        #[test]
        fn test_start_pause_reset_keys() {
            let (mut dashboard, sink, _storage, _dir) = create_dashboard();

            dashboard.handle_key(KeyPress::char('S'), now());
            assert_eq!(dashboard.engine().state().status, TimerStatus::Running);
            assert!(dashboard.engine().scheduler().is_armed());

            dashboard.handle_key(KeyPress::char('p'), now());
            assert_eq!(dashboard.engine().state().status, TimerStatus::Paused);

            dashboard.handle_key(KeyPress::char('r'), now());
            assert_eq!(dashboard.engine().state().status, TimerStatus::Ready);
            assert_eq!(sink.count(Chime::Short), 3);
        }

        #[test]
        fn test_letters_go_to_todo_input_when_focused() {
            let (mut dashboard, _sink, _storage, _dir) = create_dashboard();

            dashboard.handle_key(KeyPress::char('1'), now());
            type_text(&mut dashboard, "spr");

            assert_eq!(dashboard.todo_input(), "spr");
            assert_eq!(dashboard.engine().state().status, TimerStatus::Ready);
        }

        #[test]
        fn test_escape_leaves_input() {
            let (mut dashboard, _sink, _storage, _dir) = create_dashboard();
            dashboard.handle_key(KeyPress::char('3'), now());

            press(&mut dashboard, Key::Escape);
            assert_eq!(dashboard.focus(), None);

            dashboard.handle_key(KeyPress::char('s'), now());
            assert_eq!(dashboard.engine().state().status, TimerStatus::Running);
        }

        #[test]
        fn test_help_overlay() {
            let (mut dashboard, sink, _storage, _dir) = create_dashboard();

            dashboard.handle_key(KeyPress::char('?'), now());
            assert!(dashboard.is_help_open());

            press(&mut dashboard, Key::Escape);
            assert!(!dashboard.is_help_open());
            assert_eq!(sink.chimes(), vec![Chime::Short, Chime::Short]);
        }

        #[test]
        fn test_tab_cycles_focus() {
            let (mut dashboard, _sink, _storage, _dir) = create_dashboard();

            press(&mut dashboard, Key::Tab);
            assert_eq!(dashboard.focus(), Some(FocusTarget::TodoInput));
            press(&mut dashboard, Key::Tab);
            assert_eq!(dashboard.focus(), Some(FocusTarget::TimerStart));
            press(&mut dashboard, Key::BackTab);
            assert_eq!(dashboard.focus(), Some(FocusTarget::TodoInput));
        }

        #[test]
        fn test_enter_on_timer_start_control() {
            let (mut dashboard, _sink, _storage, _dir) = create_dashboard();
            dashboard.handle_key(KeyPress::char('2'), now());

            press(&mut dashboard, Key::Enter);

            assert_eq!(dashboard.engine().state().status, TimerStatus::Running);
        }

        #[test]
        fn test_quit_keys() {
            let (mut dashboard, _sink, _storage, _dir) = create_dashboard();

            assert_eq!(dashboard.handle_key(KeyPress::char('q'), now()), Command::Quit);

            dashboard.handle_key(KeyPress::char('1'), now());
            assert_eq!(dashboard.handle_key(KeyPress::char('q'), now()), Command::None);
            assert_eq!(dashboard.todo_input(), "q");
            assert_eq!(dashboard.handle_key(KeyPress::ctrl('c'), now()), Command::Quit);
        }
    }

    // ------------------------------------------------------------------------
    // Todo Tests
    // ------------------------------------------------------------------------

    mod todo_tests {
        use super::*;

        #[test]
        fn test_add_through_input() {
            let (mut dashboard, _sink, _storage, _dir) = create_dashboard();
            dashboard.handle_key(KeyPress::char('1'), now());

            type_text(&mut dashboard, "buy milk");
            press(&mut dashboard, Key::Backspace);
            press(&mut dashboard, Key::Enter);

            assert_eq!(dashboard.todos().items()[0].text, "buy mil");
            assert_eq!(dashboard.todo_input(), "");
        }

        #[test]
        fn test_input_is_capped() {
            let (mut dashboard, _sink, _storage, _dir) = create_dashboard();
            dashboard.handle_key(KeyPress::char('1'), now());

            type_text(&mut dashboard, &"a".repeat(TODO_MAX_CHARS + 10));

            assert_eq!(dashboard.todo_input().len(), TODO_MAX_CHARS);
        }

        #[test]
        fn test_select_toggle_delete() {
            let (mut dashboard, _sink, _storage, _dir) = create_dashboard();
            dashboard.handle_key(KeyPress::char('1'), now());
            type_text(&mut dashboard, "first");
            press(&mut dashboard, Key::Enter);
            type_text(&mut dashboard, "second");
            press(&mut dashboard, Key::Enter);
            press(&mut dashboard, Key::Escape);

            press(&mut dashboard, Key::Down);
            assert_eq!(dashboard.selected(), 1);
            press(&mut dashboard, Key::Down);
            assert_eq!(dashboard.selected(), 1);

            dashboard.handle_key(KeyPress::char('x'), now());
            assert!(dashboard.todos().items()[1].completed);

            dashboard.handle_key(KeyPress::char('c'), now());
            assert_eq!(dashboard.todos().len(), 1);
            assert_eq!(dashboard.selected(), 0);

            dashboard.handle_key(KeyPress::char('d'), now());
            assert!(dashboard.todos().is_empty());
        }
    }

    // ------------------------------------------------------------------------
    // Weather Tests
    // ------------------------------------------------------------------------

    mod weather_tests {
        use super::*;
        use crate::weather::WeatherStatus;

        #[test]
        fn test_enter_requests_fetch() {
            let (mut dashboard, _sink, _storage, _dir) = create_dashboard();
            dashboard.handle_key(KeyPress::char('3'), now());
            type_text(&mut dashboard, " Oslo");

            let command = press(&mut dashboard, Key::Enter);

            assert_eq!(command, Command::FetchWeather("Oslo".to_string()));
            assert_eq!(dashboard.weather().status(), WeatherStatus::Loading);
            assert_eq!(dashboard.weather_input(), "");
        }

        #[test]
        fn test_blank_city_does_nothing() {
            let (mut dashboard, sink, storage, _dir) = create_dashboard();
            dashboard.handle_key(KeyPress::char('3'), now());
            sink.clear();
            type_text(&mut dashboard, "  ");

            let command = press(&mut dashboard, Key::Enter);

            assert_eq!(command, Command::None);
            assert_eq!(dashboard.weather().status(), WeatherStatus::Offline);
            assert!(sink.chimes().is_empty());
            assert!(!storage.path_for(StorageKey::Weather).exists());
        }
    }

    // ------------------------------------------------------------------------
    // Clear All Tests
    // ------------------------------------------------------------------------

    mod clear_all_tests {
        use super::*;

        fn seed(dashboard: &mut Dashboard<ManualTickScheduler>) {
            dashboard.handle_key(KeyPress::char('1'), now());
            type_text(dashboard, "task");
            press(dashboard, Key::Enter);
            press(dashboard, Key::Escape);

            dashboard.handle_key(KeyPress::char('s'), now());
            for _ in 0..=1500 {
                let signal = dashboard.engine().scheduler().next_signal();
                if let Some(signal) = signal {
                    dashboard.handle_tick(signal);
                }
            }
        }

        #[test]
        fn test_requires_confirmation() {
            let (mut dashboard, _sink, storage, _dir) = create_dashboard();
            seed(&mut dashboard);
            assert_eq!(dashboard.engine().state().session_count, 1);

            dashboard.handle_key(KeyPress::ctrl('k'), now());
            assert!(dashboard.confirm_pending());

            dashboard.handle_key(KeyPress::char('n'), now());
            assert!(!dashboard.confirm_pending());
            assert_eq!(dashboard.todos().len(), 1);
            assert_eq!(dashboard.engine().state().session_count, 1);
            assert!(storage.path_for(StorageKey::Timer).exists());
        }

        #[test]
        fn test_prompt_swallows_shortcuts() {
            let (mut dashboard, _sink, _storage, _dir) = create_dashboard();

            dashboard.handle_key(KeyPress::ctrl('k'), now());
            dashboard.handle_key(KeyPress::char('s'), now());

            assert_eq!(dashboard.engine().state().status, TimerStatus::Ready);
        }

        #[test]
        fn test_confirmed_wipe() {
            let (mut dashboard, sink, storage, _dir) = create_dashboard();
            seed(&mut dashboard);
            sink.clear();

            dashboard.handle_key(KeyPress::ctrl('k'), now());
            dashboard.handle_key(KeyPress::char('y'), now());

            assert!(dashboard.todos().is_empty());
            let state = dashboard.engine().state();
            assert_eq!(state.session_count, 0);
            assert_eq!(state.mode, TimerMode::Work);
            assert_eq!(state.status, TimerStatus::Ready);
            assert_eq!(state.remaining_seconds, 1500);
            assert!(!dashboard.engine().scheduler().is_armed());
            assert_eq!(sink.chimes(), vec![Chime::Short]);

            for key in StorageKey::ALL {
                assert!(!storage.path_for(key).exists(), "{key:?}");
            }
            assert!(storage.load::<TimerRecord>(StorageKey::Timer).is_none());
        }

        #[test]
        fn test_ctrl_k_is_ignored_inside_text_input() {
            let (mut dashboard, _sink, _storage, _dir) = create_dashboard();
            dashboard.handle_key(KeyPress::char('1'), now());

            dashboard.handle_key(KeyPress::ctrl('k'), now());

            assert!(!dashboard.confirm_pending());
            assert_eq!(dashboard.todo_input(), "");

            press(&mut dashboard, Key::Escape);
            dashboard.handle_key(KeyPress::ctrl('k'), now());
            assert!(dashboard.confirm_pending());
        }
    }
}
