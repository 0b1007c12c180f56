//! The dashboard event loop.
//!
//! One task owns the [`Dashboard`] and selects over key events, timer
//! ticks, finished weather lookups and a one-second redraw interval. Every
//! mutation happens here, so a tick (mode switch and save included) is fully
//! applied before the next event is looked at.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use crossterm::event::{Event, EventStream};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_stream::StreamExt;
use tracing::{debug, info};

use super::render::{compose, draw};
use super::terminal::TerminalSession;
use super::{Command, Dashboard};
use crate::shortcuts::KeyPress;
use crate::sound::NotificationSink;
use crate::storage::Storage;
use crate::timer::{TickScheduler, TokioTickScheduler};
use crate::types::TimerConfig;
use crate::weather::{fetch_mock, WeatherReport};

/// Runs the dashboard until the user quits.
pub async fn run(config: TimerConfig, storage: Storage, sink: Arc<dyn NotificationSink>) -> Result<()> {
    config.validate().context("invalid timer configuration")?;

    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let (weather_tx, mut weather_rx) = mpsc::unbounded_channel::<WeatherReport>();

    let mut dashboard = Dashboard::new(
        config,
        TokioTickScheduler::new(tick_tx),
        sink,
        storage,
        Utc::now(),
    );

    let mut terminal = TerminalSession::enter()?;
    let mut events = EventStream::new();
    let mut redraw = interval(Duration::from_secs(1));
    redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Dashboard started");

    loop {
        redraw_screen(&mut terminal, &dashboard)?;

        tokio::select! {
            Some(signal) = tick_rx.recv() => {
                dashboard.handle_tick(signal);
            }
            Some(report) = weather_rx.recv() => {
                dashboard.handle_weather(report, Utc::now());
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => {
                    let Some(press) = KeyPress::from_crossterm(&key) else {
                        continue;
                    };
                    match dashboard.handle_key(press, Utc::now()) {
                        Command::Quit => break,
                        Command::FetchWeather(city) => spawn_lookup(city, weather_tx.clone()),
                        Command::None => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("failed to read terminal input"),
                None => break,
            },
            _ = redraw.tick() => {}
        }
    }

    terminal.leave()?;
    info!(
        session_count = dashboard.engine().state().session_count,
        "Dashboard closed"
    );
    Ok(())
}

fn spawn_lookup(city: String, tx: mpsc::UnboundedSender<WeatherReport>) {
    debug!(city = %city, "Spawning weather lookup");
    tokio::spawn(async move {
        let report = fetch_mock(city).await;
        // The receiver only goes away when the dashboard is shutting down.
        let _ = tx.send(report);
    });
}

fn redraw_screen<S: TickScheduler>(terminal: &mut TerminalSession, dashboard: &Dashboard<S>) -> Result<()> {
    let lines = compose(dashboard, Local::now(), terminal.width());
    draw(terminal.out(), &lines).context("failed to draw the dashboard")
}
