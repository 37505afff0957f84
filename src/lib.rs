//! Click-to-play page controller.
//! The same controller runs in the browser (wasm) and in the headless
//! native host, which simulates the page from a TOML fixture.

pub mod controller;
pub mod error;
pub mod fixture;
pub mod page;
pub mod sim;

#[cfg(not(target_arch = "wasm32"))]
pub mod audio;
#[cfg(not(target_arch = "wasm32"))]
pub mod commands;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod watcher;

#[cfg(target_arch = "wasm32")]
pub mod web;
