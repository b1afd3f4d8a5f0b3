//! Kestrel is a UI client for a local AI-model server dashboard: it pings
//! the server for connection status, lists available and active models,
//! populates a model picker, and submits chat prompts for display.
//!
//! The core (data client, renderers, page controller, theme, preferences)
//! has no UI-toolkit dependency; the Dioxus layer is enabled through the
//! `ui`, `web`, `desktop`, or `mobile` features.

pub mod api;
pub mod controller;
pub mod prefs;
pub mod render;
pub mod theme;
pub mod types;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;
