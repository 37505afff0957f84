//! Page controller: binds the sound button to the click sound at document-ready.
//!
//! State is a single `Unbound -> Bound` transition. Binding happens at most
//! once and only when both elements are present; a missing element leaves
//! the button inert for the rest of the page's lifetime.

use std::rc::Rc;

use futures::task::{LocalSpawn, LocalSpawnExt};
use log::debug;

use crate::error::PageError;
use crate::page::{Console, Document, Media, Trigger};

pub const TRIGGER_ID: &str = "soundButton";
pub const MEDIA_ID: &str = "clickSound";
pub const MESSAGE_ID: &str = "message";
pub const GREETING: &str = "Hello from Rust!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindState {
    Unbound,
    Bound,
}

pub struct PageController {
    console: Rc<dyn Console>,
    state: BindState,
}

impl PageController {
    pub fn new(console: Rc<dyn Console>) -> Self {
        PageController {
            console,
            state: BindState::Unbound,
        }
    }

    pub fn state(&self) -> BindState {
        self.state
    }

    /// Document-ready handler. Errors are already reported to the console
    /// when returned; callers only need them for inspection.
    pub fn initialize<D: Document>(&mut self, doc: &D) -> Result<(), PageError> {
        if self.state == BindState::Bound {
            debug!("controller already bound, ignoring repeated document-ready");
            return Ok(());
        }

        self.console.log("DOM fully loaded and parsed");

        let trigger = doc.trigger(TRIGGER_ID);
        let media = doc.media(MEDIA_ID);
        self.console.log(&format!("{TRIGGER_ID}: {}", lookup_result(trigger.is_some())));
        self.console.log(&format!("{MEDIA_ID}: {}", lookup_result(media.is_some())));

        let (trigger, media) = match (trigger, media) {
            (Some(t), Some(m)) => (t, m),
            (t, m) => {
                let err = PageError::MissingElement {
                    trigger_found: t.is_some(),
                    media_found: m.is_some(),
                };
                self.console.error(&err.to_string());
                return Err(err);
            }
        };

        let console = Rc::clone(&self.console);
        let spawner = doc.spawner();
        trigger.add_click_listener(Box::new(move || {
            on_trigger_clicked(&media, &console, &spawner);
        }));
        self.state = BindState::Bound;
        debug!("click handler bound to #{TRIGGER_ID}");
        Ok(())
    }

    /// Writes the greeting into the `message` element.
    pub fn show_message<D: Document>(&self, doc: &D) -> Result<(), PageError> {
        if doc.set_inner_text(MESSAGE_ID, GREETING) {
            Ok(())
        } else {
            let err = PageError::MissingMessage;
            self.console.error(&err.to_string());
            Err(err)
        }
    }
}

/// Click handler body: rewind, request playback, report the outcome later.
pub fn on_trigger_clicked<M, S>(media: &M, console: &Rc<dyn Console>, spawner: &S)
where
    M: Media,
    S: LocalSpawn,
{
    console.log("Button clicked, attempting to play sound");
    media.set_current_time(0.0);
    let play = media.play();

    let task_console = Rc::clone(console);
    let spawned = spawner.spawn_local(async move {
        match play.await {
            Ok(()) => task_console.log("Sound played successfully"),
            Err(reason) => task_console.error(&PageError::PlaybackFailure(reason).to_string()),
        }
    });
    if let Err(e) = spawned {
        console.error(&PageError::PlaybackFailure(e.to_string()).to_string());
    }
}

fn lookup_result(found: bool) -> &'static str {
    if found { "found" } else { "not found" }
}
