//! In-memory page built from a fixture, implementing the host traits.
//! Each `SimDocument` is one page load; reloading means building a new one.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use futures::executor::LocalSpawner;
use log::debug;

use crate::fixture::{ElementKind, PageFixture};
use crate::page::{Document, Media, PlayFuture, Trigger};

/// Playback backend behind simulated media elements.
pub trait Player {
    fn play(&self, src: Option<&Path>) -> PlayFuture;
}

/// Observable state of a simulated media element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaState {
    pub src: Option<PathBuf>,
    pub current_time: f64,
    pub play_requests: usize,
    /// Playback position at the moment the last play request was issued.
    pub time_at_last_play: Option<f64>,
}

type Listeners = Vec<Box<dyn FnMut()>>;

struct SimNode {
    id: String,
    kind: ElementKind,
    listeners: Rc<RefCell<Listeners>>,
    media: Rc<RefCell<MediaState>>,
    text: RefCell<String>,
}

pub struct SimDocument {
    title: String,
    nodes: Vec<SimNode>,
    player: Rc<dyn Player>,
    spawner: LocalSpawner,
}

impl SimDocument {
    pub fn new(fixture: &PageFixture, player: Rc<dyn Player>, spawner: LocalSpawner) -> Self {
        let nodes = fixture
            .elements
            .iter()
            .map(|el| SimNode {
                id: el.id.clone(),
                kind: el.kind,
                listeners: Rc::new(RefCell::new(Vec::new())),
                media: Rc::new(RefCell::new(MediaState {
                    src: el.src.clone(),
                    ..MediaState::default()
                })),
                text: RefCell::new(el.label.clone().unwrap_or_else(|| el.text.clone())),
            })
            .collect();
        SimDocument {
            title: fixture.title.clone(),
            nodes,
            player,
            spawner,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn node(&self, id: &str) -> Option<&SimNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Dispatch a click to every listener on the element, in registration
    /// order. Returns `false` when no element has this id.
    pub fn click(&self, id: &str) -> bool {
        let Some(node) = self.node(id) else {
            debug!("click on missing element #{id}");
            return false;
        };
        // Listeners run without the list borrowed so they may register more.
        let mut running = std::mem::take(&mut *node.listeners.borrow_mut());
        debug!("dispatching click on #{id} to {} listener(s)", running.len());
        for listener in running.iter_mut() {
            listener();
        }
        let mut slot = node.listeners.borrow_mut();
        running.append(&mut slot);
        *slot = running;
        true
    }

    pub fn listener_count(&self, id: &str) -> usize {
        self.node(id).map_or(0, |n| n.listeners.borrow().len())
    }

    pub fn media_state(&self, id: &str) -> Option<MediaState> {
        self.node(id)
            .filter(|n| n.kind.is_media())
            .map(|n| n.media.borrow().clone())
    }

    /// Move the playback position, as if the media had been playing.
    pub fn set_media_time(&self, id: &str, seconds: f64) {
        if let Some(node) = self.node(id).filter(|n| n.kind.is_media()) {
            node.media.borrow_mut().current_time = seconds;
        }
    }

    pub fn text_of(&self, id: &str) -> Option<String> {
        self.node(id).map(|n| n.text.borrow().clone())
    }
}

pub struct SimTrigger {
    listeners: Rc<RefCell<Listeners>>,
}

impl Trigger for SimTrigger {
    fn add_click_listener(&self, listener: Box<dyn FnMut()>) {
        self.listeners.borrow_mut().push(listener);
    }
}

pub struct SimMedia {
    state: Rc<RefCell<MediaState>>,
    player: Rc<dyn Player>,
}

impl Media for SimMedia {
    fn set_current_time(&self, seconds: f64) {
        self.state.borrow_mut().current_time = seconds;
    }

    fn play(&self) -> PlayFuture {
        let src = {
            let mut state = self.state.borrow_mut();
            state.play_requests += 1;
            state.time_at_last_play = Some(state.current_time);
            state.src.clone()
        };
        self.player.play(src.as_deref())
    }
}

impl Document for SimDocument {
    type Trigger = SimTrigger;
    type Media = SimMedia;
    type Spawner = LocalSpawner;

    fn trigger(&self, id: &str) -> Option<SimTrigger> {
        self.node(id).map(|n| SimTrigger {
            listeners: Rc::clone(&n.listeners),
        })
    }

    fn media(&self, id: &str) -> Option<SimMedia> {
        self.node(id).filter(|n| n.kind.is_media()).map(|n| SimMedia {
            state: Rc::clone(&n.media),
            player: Rc::clone(&self.player),
        })
    }

    fn set_inner_text(&self, id: &str, text: &str) -> bool {
        match self.node(id) {
            Some(node) => {
                *node.text.borrow_mut() = text.to_string();
                true
            }
            None => false,
        }
    }

    fn spawner(&self) -> LocalSpawner {
        self.spawner.clone()
    }
}

/// The source a player can start from, or the reason playback must fail.
pub fn playable_source(src: Option<&Path>) -> Result<&Path, String> {
    match src {
        Some(path) if path.exists() => Ok(path),
        Some(path) => Err(format!("source not found: {}", path.display())),
        None => Err("media element has no source".to_string()),
    }
}

/// Resolves like a real player would, without producing sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl Player for SilentPlayer {
    fn play(&self, src: Option<&Path>) -> PlayFuture {
        let outcome = playable_source(src).map(|_| ());
        Box::pin(futures::future::ready(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use futures::executor::LocalPool;

    fn page() -> PageFixture {
        let toml_str = r#"
title = "Demo"

[[elements]]
id = "soundButton"
kind = "button"
label = "Play"

[[elements]]
id = "clickSound"
kind = "audio"
src = "static/sounds/click.wav"

[[elements]]
id = "silent"
kind = "audio"

[[elements]]
id = "gone"
kind = "audio"
src = "static/sounds/gone.wav"
"#;
        PageFixture::parse(toml_str, Path::new(env!("CARGO_MANIFEST_DIR"))).unwrap()
    }

    #[test]
    fn click_runs_listeners_in_order() {
        let pool = LocalPool::new();
        let doc = SimDocument::new(&page(), Rc::new(SilentPlayer), pool.spawner());
        let order = Rc::new(RefCell::new(Vec::new()));
        let trigger = doc.trigger("soundButton").unwrap();
        for n in 0..3 {
            let order = order.clone();
            trigger.add_click_listener(Box::new(move || order.borrow_mut().push(n)));
        }
        assert!(doc.click("soundButton"));
        assert!(doc.click("soundButton"));
        assert_eq!(*order.borrow(), vec![0, 1, 2, 0, 1, 2]);
        assert_eq!(doc.listener_count("soundButton"), 3);
    }

    #[test]
    fn listener_may_register_another() {
        let pool = LocalPool::new();
        let doc = SimDocument::new(&page(), Rc::new(SilentPlayer), pool.spawner());
        let hits = Rc::new(Cell::new(0));
        let trigger = doc.trigger("soundButton").unwrap();
        let inner = doc.trigger("soundButton").unwrap();
        let h = hits.clone();
        trigger.add_click_listener(Box::new(move || {
            let h = h.clone();
            inner.add_click_listener(Box::new(move || h.set(h.get() + 1)));
        }));
        doc.click("soundButton");
        assert_eq!(doc.listener_count("soundButton"), 2);
        doc.click("soundButton");
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn lookups_follow_element_kind() {
        let pool = LocalPool::new();
        let doc = SimDocument::new(&page(), Rc::new(SilentPlayer), pool.spawner());
        assert_eq!(doc.title(), "Demo");
        assert!(doc.media("soundButton").is_none());
        assert!(doc.media("clickSound").is_some());
        assert!(doc.trigger("clickSound").is_some());
        assert!(doc.trigger("nope").is_none());
        assert!(!doc.click("nope"));
        assert_eq!(doc.text_of("soundButton").as_deref(), Some("Play"));
    }

    #[test]
    fn play_records_position_and_count() {
        let mut pool = LocalPool::new();
        let doc = SimDocument::new(&page(), Rc::new(SilentPlayer), pool.spawner());
        doc.set_media_time("clickSound", 2.0);
        let media = doc.media("clickSound").unwrap();
        let outcome = pool.run_until(media.play());
        assert_eq!(outcome, Ok(()));
        let state = doc.media_state("clickSound").unwrap();
        assert_eq!(state.play_requests, 1);
        assert_eq!(state.time_at_last_play, Some(2.0));
    }

    #[test]
    fn silent_player_rejects_sourceless_media() {
        let mut pool = LocalPool::new();
        let doc = SimDocument::new(&page(), Rc::new(SilentPlayer), pool.spawner());
        let media = doc.media("silent").unwrap();
        let outcome = pool.run_until(media.play());
        assert_eq!(outcome, Err("media element has no source".to_string()));
    }

    #[test]
    fn silent_player_rejects_missing_file() {
        let mut pool = LocalPool::new();
        let doc = SimDocument::new(&page(), Rc::new(SilentPlayer), pool.spawner());
        let media = doc.media("gone").unwrap();
        let outcome = pool.run_until(media.play());
        let reason = outcome.unwrap_err();
        assert!(reason.starts_with("source not found:"));
        assert!(reason.ends_with("gone.wav"));
    }

    #[test]
    fn duplicate_ids_resolve_to_first_element() {
        let toml_str = r#"
[[elements]]
id = "soundButton"
kind = "text"
text = "first"

[[elements]]
id = "soundButton"
kind = "audio"
"#;
        let fixture = PageFixture::parse(toml_str, Path::new(".")).unwrap();
        let pool = LocalPool::new();
        let doc = SimDocument::new(&fixture, Rc::new(SilentPlayer), pool.spawner());
        assert_eq!(doc.text_of("soundButton").as_deref(), Some("first"));
        assert!(doc.media("soundButton").is_none());
    }

    #[test]
    fn inner_text_is_set_on_any_element() {
        let pool = LocalPool::new();
        let doc = SimDocument::new(&page(), Rc::new(SilentPlayer), pool.spawner());
        assert!(doc.set_inner_text("soundButton", "Again"));
        assert_eq!(doc.text_of("soundButton").as_deref(), Some("Again"));
        assert!(!doc.set_inner_text("message", "hi"));
    }
}
