//! Line-based host commands from stdin or a Unix domain socket.

use std::io::BufRead;
use std::sync::mpsc::Sender;

use log::{debug, warn};

use crate::controller::TRIGGER_ID;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    Click(String),
    Message,
    Reload,
    Quit,
}

/// Everything the host loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Command(HostCommand),
    PageChanged,
}

/// Forward parsed commands from `reader` until EOF.
pub fn forward_lines<R: BufRead>(reader: R, tx: &Sender<HostEvent>) -> Result<(), String> {
    for line in reader.lines() {
        let line = line.map_err(|e| format!("read: {e}"))?;
        match parse_command(&line) {
            Some(cmd) => {
                debug!("Host command: {}", line.trim());
                if tx.send(HostEvent::Command(cmd)).is_err() {
                    return Err("channel closed".into());
                }
            }
            None if line.trim().is_empty() => {}
            None => warn!("Ignoring unknown command: {}", line.trim()),
        }
    }
    Ok(())
}

/// Listen for commands on a Unix domain socket. Blocks forever.
#[cfg(unix)]
pub fn listen(path: &str, tx: Sender<HostEvent>) -> Result<(), String> {
    use std::io::BufReader;
    use std::os::unix::net::UnixListener;

    use log::info;

    // Remove stale socket
    if std::path::Path::new(path).exists() {
        let _ = std::fs::remove_file(path);
    }

    let listener = UnixListener::bind(path).map_err(|e| format!("bind {path}: {e}"))?;
    info!("Socket listening at {path}");

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(e) = forward_lines(BufReader::new(stream), &tx) {
                    if e == "channel closed" {
                        return Err(e);
                    }
                    warn!("Socket {e}");
                }
            }
            Err(e) => warn!("Socket accept error: {e}"),
        }
    }

    Ok(())
}

pub fn parse_command(line: &str) -> Option<HostCommand> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?.to_ascii_uppercase();
    let arg = parts.next();
    match verb.as_str() {
        "CLICK" => Some(HostCommand::Click(arg.unwrap_or(TRIGGER_ID).to_string())),
        "MESSAGE" => Some(HostCommand::Message),
        "RELOAD" => Some(HostCommand::Reload),
        "QUIT" | "EXIT" => Some(HostCommand::Quit),
        _ => None,
    }
}
