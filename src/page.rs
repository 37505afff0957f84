//! Host-facing traits the controller is written against.
//!
//! The browser build implements these over `web_sys`; the headless host
//! implements them over a TOML page fixture (see `sim`).

use std::cell::RefCell;

use futures::future::LocalBoxFuture;
use futures::task::LocalSpawn;

/// Outcome of a play request. `Err` carries the host's reason.
pub type PlayFuture = LocalBoxFuture<'static, Result<(), String>>;

/// A clickable element.
pub trait Trigger {
    fn add_click_listener(&self, listener: Box<dyn FnMut()>);
}

/// A playable audio/video element.
pub trait Media: 'static {
    fn set_current_time(&self, seconds: f64);
    fn play(&self) -> PlayFuture;
}

/// The parsed page, queried by element id.
pub trait Document {
    type Trigger: Trigger;
    type Media: Media;
    type Spawner: LocalSpawn + 'static;

    fn trigger(&self, id: &str) -> Option<Self::Trigger>;

    /// `None` when the id is absent or names an element that cannot play.
    fn media(&self, id: &str) -> Option<Self::Media>;

    /// Returns `false` when no element has this id.
    fn set_inner_text(&self, id: &str, text: &str) -> bool;

    /// Executor for continuations that must run on the page's thread.
    fn spawner(&self) -> Self::Spawner;
}

/// Diagnostic sink, the equivalent of the developer console.
pub trait Console {
    fn log(&self, line: &str);
    fn error(&self, line: &str);
}

/// Forwards diagnostics to the `log` facade under target `page`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogConsole;

impl Console for LogConsole {
    fn log(&self, line: &str) {
        log::info!(target: "page", "{line}");
    }

    fn error(&self, line: &str) {
        log::error!(target: "page", "{line}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Log,
    Error,
}

/// Keeps every diagnostic in order. Used by tests and the preview tool.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    lines: RefCell<Vec<(Level, String)>>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.borrow().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.with_level(Level::Error)
    }

    pub fn logs(&self) -> Vec<String> {
        self.with_level(Level::Log)
    }

    fn with_level(&self, level: Level) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, s)| s.clone())
            .collect()
    }
}

impl Console for RecordingConsole {
    fn log(&self, line: &str) {
        self.lines.borrow_mut().push((Level::Log, line.to_string()));
    }

    fn error(&self, line: &str) {
        self.lines.borrow_mut().push((Level::Error, line.to_string()));
    }
}
