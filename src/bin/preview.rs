//! Local preview tool: runs a page fixture through document-ready and a few
//! clicks with a silent player, then prints the console transcript.
//!
//! Usage: cargo run --bin preview [-- --page PATH] [--clicks N] [--message]

use std::path::PathBuf;
use std::rc::Rc;

use futures::executor::LocalPool;

use sound_button::controller::{PageController, MEDIA_ID, TRIGGER_ID};
use sound_button::fixture::PageFixture;
use sound_button::page::{Level, RecordingConsole};
use sound_button::sim::{SilentPlayer, SimDocument};

#[cfg(not(target_arch = "wasm32"))]
fn arg_value(name: &str) -> Option<String> {
    std::env::args().skip_while(|a| a != name).nth(1)
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let page_path = arg_value("--page")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static/page.toml"));
    let clicks: usize = arg_value("--clicks")
        .map(|n| n.parse().expect("--clicks takes a number"))
        .unwrap_or(1);
    let message = std::env::args().any(|a| a == "--message");

    let fixture = PageFixture::load(&page_path).expect("failed to load page fixture");
    println!("page: {} ({})", fixture.title, page_path.display());

    let mut pool = LocalPool::new();
    let doc = SimDocument::new(&fixture, Rc::new(SilentPlayer), pool.spawner());
    let console = Rc::new(RecordingConsole::new());
    let mut controller = PageController::new(console.clone());

    let _ = controller.initialize(&doc);
    for _ in 0..clicks {
        doc.click(TRIGGER_ID);
        pool.run_until_stalled();
    }
    if message {
        let _ = controller.show_message(&doc);
    }

    for (level, line) in console.lines() {
        let tag = match level {
            Level::Log => "log",
            Level::Error => "error",
        };
        println!("[{tag}] {line}");
    }

    println!("state: {:?}", controller.state());
    if let Some(media) = doc.media_state(MEDIA_ID) {
        println!(
            "#{MEDIA_ID}: play requests {}, position {:.1}s",
            media.play_requests, media.current_time
        );
    }
}
