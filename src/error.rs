//! Error kinds surfaced by the page controller.

use std::fmt;

use crate::controller::{MEDIA_ID, MESSAGE_ID, TRIGGER_ID};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// One or both required elements were absent at document-ready.
    MissingElement { trigger_found: bool, media_found: bool },
    /// The play request was rejected by the host.
    PlaybackFailure(String),
    /// The greeting target is not on the page.
    MissingMessage,
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::MissingElement { .. } => {
                write!(f, "Could not find {TRIGGER_ID} or {MEDIA_ID}")
            }
            PageError::PlaybackFailure(reason) => write!(f, "Error playing sound: {reason}"),
            PageError::MissingMessage => write!(f, "Could not find {MESSAGE_ID}"),
        }
    }
}

impl std::error::Error for PageError {}
