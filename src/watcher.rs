//! Page fixture watcher.
//! Editing the fixture counts as a page reload in the headless host.

use std::path::Path;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use log::{debug, info};
use notify::{Event, EventKind, RecursiveMode, Watcher};

use crate::commands::HostEvent;

/// Quiet period after the last change before a reload is sent.
/// Editors often emit several events per save; collapse them.
const SETTLE: Duration = Duration::from_millis(250);

/// Watch `path` for changes. Blocks the calling thread and sends
/// `HostEvent::PageChanged` through `tx`.
pub fn watch_page(path: &Path, tx: Sender<HostEvent>) -> Result<(), String> {
    let path = path
        .canonicalize()
        .map_err(|e| format!("resolve {}: {e}", path.display()))?;
    // Watch the directory: saving via rename replaces the file's inode.
    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| format!("{} has no parent directory", path.display()))?;

    let (notify_tx, notify_rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res {
            let _ = notify_tx.send(event);
        }
    })
    .map_err(|e| format!("watcher: {e}"))?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(|e| format!("watch: {e}"))?;

    info!("Watching page fixture {}", path.display());

    loop {
        let event = notify_rx
            .recv()
            .map_err(|_| "watcher disconnected".to_string())?;
        if !touches_page(&event, &path) {
            continue;
        }
        debug!("Page fixture changed: {:?}", event.kind);
        wait_until_quiet(&notify_rx, &path, SETTLE)?;
        if tx.send(HostEvent::PageChanged).is_err() {
            return Err("channel closed".to_string());
        }
    }
}

/// Block until `page` has seen no change for `settle`, so the reload reads
/// the last write of a multi-step save.
fn wait_until_quiet(rx: &Receiver<Event>, page: &Path, settle: Duration) -> Result<(), String> {
    let mut deadline = Instant::now() + settle;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(event) => {
                if touches_page(&event, page) {
                    deadline = Instant::now() + settle;
                }
            }
            Err(RecvTimeoutError::Timeout) => return Ok(()),
            Err(RecvTimeoutError::Disconnected) => return Err("watcher disconnected".to_string()),
        }
    }
}

fn touches_page(event: &Event, page: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p == page)
}
