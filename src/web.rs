//! Browser host: the controller over `web_sys`, started from wasm.

use std::rc::Rc;

use futures::future::{self, FutureExt};
use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, HtmlElement, HtmlMediaElement};

use crate::controller::PageController;
use crate::page::{Document, LogConsole, Media, PlayFuture, Trigger};

pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn current() -> Result<Self, JsValue> {
        web_sys::window()
            .and_then(|w| w.document())
            .map(|document| WebDocument { document })
            .ok_or_else(|| JsValue::from_str("no document available"))
    }
}

pub struct WebTrigger {
    element: Element,
}

impl Trigger for WebTrigger {
    fn add_click_listener(&self, listener: Box<dyn FnMut()>) {
        let closure = Closure::wrap(listener);
        match self
            .element
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        {
            // Bound for the lifetime of the page.
            Ok(()) => closure.forget(),
            Err(e) => log::error!("addEventListener failed: {}", describe_js(&e)),
        }
    }
}

pub struct WebMedia {
    element: HtmlMediaElement,
}

impl Media for WebMedia {
    fn set_current_time(&self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn play(&self) -> PlayFuture {
        match self.element.play() {
            Ok(promise) => async move {
                JsFuture::from(promise)
                    .await
                    .map(|_| ())
                    .map_err(|e| describe_js(&e))
            }
            .boxed_local(),
            Err(e) => future::ready(Err(describe_js(&e))).boxed_local(),
        }
    }
}

/// Runs continuations on the browser's microtask queue.
#[derive(Debug, Clone, Copy)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

impl Document for WebDocument {
    type Trigger = WebTrigger;
    type Media = WebMedia;
    type Spawner = BrowserSpawner;

    fn trigger(&self, id: &str) -> Option<WebTrigger> {
        self.document
            .get_element_by_id(id)
            .map(|element| WebTrigger { element })
    }

    fn media(&self, id: &str) -> Option<WebMedia> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlMediaElement>()
            .ok()
            .map(|element| WebMedia { element })
    }

    fn set_inner_text(&self, id: &str, text: &str) -> bool {
        let Some(element) = self.document.get_element_by_id(id) else {
            return false;
        };
        match element.dyn_ref::<HtmlElement>() {
            Some(html) => html.set_inner_text(text),
            None => element.set_text_content(Some(text)),
        }
        true
    }

    fn spawner(&self) -> BrowserSpawner {
        BrowserSpawner
    }
}

/// Human-readable reason from a rejected promise or thrown value.
fn describe_js(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        format!("{}: {}", String::from(err.name()), String::from(err.message()))
    } else if let Some(s) = value.as_string() {
        s
    } else {
        format!("{value:?}")
    }
}

fn on_document_ready() {
    let doc = match WebDocument::current() {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("{}", describe_js(&e));
            return;
        }
    };
    let mut controller = PageController::new(Rc::new(LogConsole));
    // Failures are already on the console.
    let _ = controller.initialize(&doc);
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let doc = WebDocument::current()?;
    if doc.document.ready_state() == "loading" {
        let handler = Closure::once_into_js(on_document_ready);
        doc.document
            .add_event_listener_with_callback("DOMContentLoaded", handler.unchecked_ref())?;
    } else {
        on_document_ready();
    }
    Ok(())
}

/// Exported for markup such as `onclick="wasm.showMessage()"`.
#[wasm_bindgen(js_name = showMessage)]
pub fn show_message() {
    match WebDocument::current() {
        Ok(doc) => {
            let _ = PageController::new(Rc::new(LogConsole)).show_message(&doc);
        }
        Err(e) => log::error!("{}", describe_js(&e)),
    }
}
