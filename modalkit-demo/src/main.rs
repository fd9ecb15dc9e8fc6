mod dialogs;
mod draw;
mod paths;
mod terminal;

use std::fs::{self, File};
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use crossterm::event::{Event as CrosstermEvent, EventStream, MouseEventKind};
use futures::StreamExt;
use modalkit::prelude::*;
use modalkit::wakeup::{self, WakeupSender};
use serde_json::{Value, json};
use simplelog::{Config, LevelFilter, WriteLogger};
use thiserror::Error;
use tokio::time::sleep_until;

use crate::draw::HitMap;
use crate::terminal::TerminalGuard;

/// Environment variable overriding the log level.
const LOG_ENV: &str = "MODALKIT_LOG";

#[derive(Debug, Error)]
enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Answers received so far, shown on the host screen.
#[derive(Clone, Default)]
struct History {
    lines: Arc<Mutex<Vec<String>>>,
}

impl History {
    fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        lines.push(line);
        let excess = lines.len().saturating_sub(8);
        lines.drain(..excess);
    }

    fn snapshot(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Host screen: opens dialogs and records their answers.
struct App {
    modals: Modals,
    history: History,
    wakeup: WakeupSender,
}

impl App {
    fn open(&self, name: &str, payload: Value) {
        let pending = self.modals.open_modal(name, payload, None);
        let history = self.history.clone();
        let wakeup = self.wakeup.clone();
        let name = name.to_string();
        tokio::spawn(async move {
            let line = match pending.await {
                Some(answer) => format!("{name} answered {answer}"),
                None => format!("{name} dismissed"),
            };
            log::info!("{line}");
            history.push(line);
            wakeup.send();
        });
    }

    /// Handle a key while no modal is open. Returns false to quit.
    fn on_key(&self, key: Key) -> bool {
        match key {
            Key::Char('c') => self.open(
                "Confirm",
                json!({"title": "Delete", "message": "Delete the selected item?"}),
            ),
            Key::Char('p') => self.open(
                "Prompt",
                json!({"label": "Your name", "placeholder": "anonymous"}),
            ),
            Key::Char('a') => self.open("About", Value::Null),
            Key::Char('x') => self.open("Missing", Value::Null),
            Key::Char('q') => return false,
            _ => {}
        }
        true
    }

    fn screen(&self) -> Vec<String> {
        let mut lines = vec![
            "modalkit demo".to_string(),
            String::new(),
            "c  confirm      p  prompt      a  about".to_string(),
            "x  unknown modal (stays open until Escape)".to_string(),
            "q  quit         ctrl+c  quit from anywhere".to_string(),
            String::new(),
        ];
        lines.extend(self.history.snapshot());
        lines
    }
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(err) = run().await {
        log::error!("{err}");
        eprintln!("Error: {err}");
    }
}

fn init_logging() {
    paths::rotate_logs();

    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Debug);

    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(level, Config::default(), file);
        }
        Err(err) => eprintln!("cannot create log file {}: {err}", path.display()),
    }
}

/// Sleep until a deadline, or wait forever if None.
async fn sleep_until_optional(deadline: Option<Instant>) {
    match deadline {
        Some(d) => sleep_until(tokio::time::Instant::from_std(d)).await,
        None => std::future::pending::<()>().await,
    }
}

async fn run() -> Result<(), AppError> {
    let registry = dialogs::registry()?;
    log::info!("modal sources: {:?}", registry.names());

    let modals = Modals::new(registry, ModalConfig::default());
    let (wakeup_tx, mut wakeup_rx) = wakeup::channel();
    modals.install_wakeup(wakeup_tx.clone());

    let app = App {
        modals: modals.clone(),
        history: History::default(),
        wakeup: wakeup_tx,
    };

    let mut trap = FocusTrap::new(modals.config());
    let mut layer = ModalLayer::new();
    let mut guard = TerminalGuard::new()?;
    let mut events = EventStream::new();

    loop {
        let now = Instant::now();
        layer.render(&modals);
        trap.sync(&modals.stack(), &mut layer, now);
        trap.settle(&layer, now);
        let hits = draw::draw(guard.out(), &layer, trap.focused(), &app.screen())?;

        let raw = tokio::select! {
            raw = events.next() => match raw {
                Some(raw) => raw?,
                None => break,
            },
            _ = wakeup_rx.recv() => {
                let coalesced = wakeup_rx.drain();
                log::trace!("wakeup (+{coalesced} coalesced)");
                continue;
            }
            _ = sleep_until_optional(trap.next_deadline().filter(|due| *due > now)) => continue,
        };

        let Some(event) = translate(&raw, &hits) else {
            continue;
        };
        log::trace!("event: {event:?}");

        if let Event::Key { key: Key::Char('c'), modifiers, .. } = &event {
            if modifiers.ctrl {
                break;
            }
        }

        if modals.is_empty() {
            if let Event::Key { key, .. } = &event {
                if !app.on_key(*key) {
                    break;
                }
            }
            continue;
        }

        let outcome = modals.route_event(&mut trap, &layer, &event);
        log::trace!("trap: {outcome:?}");
    }

    trap.teardown(&mut layer);
    let dismissed = modals.close_all();
    log::info!("exiting, dismissed {dismissed} open modal(s)");
    Ok(())
}

/// Turn a terminal event into a modal event, resolving click targets.
fn translate(raw: &CrosstermEvent, hits: &HitMap) -> Option<Event> {
    match raw {
        CrosstermEvent::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
            let Some(Event::Click { button, .. }) = Event::from_crossterm(raw) else {
                return None;
            };
            Some(Event::Click {
                target: hits.target_at(mouse.column, mouse.row),
                button,
            })
        }
        _ => Event::from_crossterm(raw),
    }
}
