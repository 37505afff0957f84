//! sound-button: headless host for the click-to-play page controller.
//!
//! Loads a page fixture, fires document-ready, then drives the page from
//! stdin (and optionally a Unix socket): `CLICK [id]`, `MESSAGE`, `RELOAD`,
//! `QUIT`. The browser build does not use this binary.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    host::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use std::sync::mpsc::{self, RecvTimeoutError};
    use std::time::Duration;

    use futures::executor::LocalPool;
    use log::{error, info, warn};

    use sound_button::audio::CommandPlayer;
    use sound_button::commands::{self, HostCommand, HostEvent};
    use sound_button::config::HostConfig;
    use sound_button::controller::PageController;
    use sound_button::fixture::PageFixture;
    use sound_button::page::{Console, LogConsole};
    use sound_button::sim::{Player, SimDocument};
    use sound_button::watcher;

    /// How long the loop waits for input before polling continuations again.
    const POLL: Duration = Duration::from_millis(50);

    struct LoadedPage {
        doc: SimDocument,
        controller: PageController,
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let mut settings = HostConfig::find_and_load().host;
        if let Some(page) = std::env::args().nth(1) {
            settings.page = PathBuf::from(page);
        }
        info!("Page fixture: {}", settings.page.display());

        let player: Rc<dyn Player> = Rc::new(CommandPlayer::new(
            settings.player.clone(),
            settings.player_args.clone(),
        ));
        let console: Rc<dyn Console> = Rc::new(LogConsole);
        let mut pool = LocalPool::new();

        let (tx, rx) = mpsc::channel::<HostEvent>();

        // Without a socket, closing stdin ends the session.
        let quit_on_eof = settings.socket.is_none();
        let stdin_tx = tx.clone();
        std::thread::spawn(move || {
            if let Err(e) = commands::forward_lines(std::io::stdin().lock(), &stdin_tx) {
                error!("stdin: {e}");
            }
            if quit_on_eof {
                let _ = stdin_tx.send(HostEvent::Command(HostCommand::Quit));
            }
        });

        #[cfg(unix)]
        {
            if let Some(socket_path) = settings.socket.clone() {
                let socket_tx = tx.clone();
                std::thread::spawn(move || {
                    if let Err(e) = commands::listen(&socket_path, socket_tx) {
                        error!("Socket listener error: {e}");
                    }
                });
            }
        }

        if settings.watch {
            let watch_path = settings.page.clone();
            let watch_tx = tx.clone();
            std::thread::spawn(move || {
                if let Err(e) = watcher::watch_page(&watch_path, watch_tx) {
                    error!("Page watcher error: {e}");
                }
            });
        }
        drop(tx);

        let mut page = load_page(&settings.page, &player, &console, &pool);

        loop {
            match rx.recv_timeout(POLL) {
                Ok(HostEvent::Command(HostCommand::Click(id))) => match &page {
                    Some(p) => {
                        if !p.doc.click(&id) {
                            warn!("No element #{id} on '{}'", p.doc.title());
                        }
                    }
                    None => warn!("No page loaded; ignoring click on #{id}"),
                },
                Ok(HostEvent::Command(HostCommand::Message)) => {
                    if let Some(p) = &page {
                        let _ = p.controller.show_message(&p.doc);
                    }
                }
                Ok(HostEvent::Command(HostCommand::Reload)) | Ok(HostEvent::PageChanged) => {
                    info!("Reloading page");
                    page = load_page(&settings.page, &player, &console, &pool);
                }
                Ok(HostEvent::Command(HostCommand::Quit)) => break,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            // Play continuations complete here, on the page's thread.
            pool.run_until_stalled();
        }

        info!("Shutting down");
    }

    /// One page load: parse the fixture, then fire document-ready.
    fn load_page(
        path: &Path,
        player: &Rc<dyn Player>,
        console: &Rc<dyn Console>,
        pool: &LocalPool,
    ) -> Option<LoadedPage> {
        let fixture = match PageFixture::load(path) {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to load page: {e}");
                return None;
            }
        };
        let doc = SimDocument::new(&fixture, Rc::clone(player), pool.spawner());
        let mut controller = PageController::new(Rc::clone(console));
        // Failures are already reported through the console.
        let _ = controller.initialize(&doc);
        Some(LoadedPage { doc, controller })
    }
}
