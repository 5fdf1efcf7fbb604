use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub const TICK_RATE: Duration = Duration::from_millis(100);

pub enum AppEvent {
    Key(KeyEvent),
    /// Drives the quiz countdown; sent whenever `tick_rate` passes without input.
    Tick,
    Resize,
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            loop {
                let next = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(event) => translate(event),
                        Err(_) => None,
                    },
                    Ok(false) => Some(AppEvent::Tick),
                    Err(_) => return,
                };
                if let Some(app_event) = next {
                    if tx.send(app_event).is_err() {
                        return;
                    }
                }
            }
        });
        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

/// Only key presses matter; releases and repeats from enhanced terminals are dropped.
fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Resize(_, _) => Some(AppEvent::Resize),
        _ => None,
    }
}
