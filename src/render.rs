//! Markup renderers for the dashboard regions.
//!
//! Each function maps a fetched payload (or its absence) to an HTML
//! fragment for one region, with three-way branching: populated, empty, and
//! unreachable. The functions are pure; assigning a fragment to an actual
//! region is the view adapter's job.

use crate::types::{ChatReply, ConnectionStatus, ModelCatalog, ModelEntry};

pub const UNABLE_TO_CONNECT: &str = "<h3>UNABLE TO CONNECT TO SERVER</h3>";
pub const NO_MODELS_FOUND: &str = "<h3>No models found on the server.</h3>";
pub const NO_ACTIVE_MODELS: &str = "<h3>Currently No Active Models Present.</h3>";
pub const NO_RESPONSE: &str = "<h3>No response received.</h3>";
pub const LOADING_PAGE: &str = "<h1>LOADING...</h1>";
pub const RESPONSE_LOADING: &str = "<h3>LOADING...</h3>";
pub const SEND_ERROR: &str = "<h3>ERROR SENDING MESSAGE</h3>";
pub const PICKER_PLACEHOLDER: &str = "Unable to connect to server";

const UNKNOWN_FIELD: &str = "Unknown";

/// One selectable entry of the model picker control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

/// Full replacement option set for the model picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerOptions {
    pub options: Vec<PickerOption>,
}

impl PickerOptions {
    /// A single disabled placeholder entry, shown whenever no model list is
    /// available to pick from.
    pub fn placeholder() -> Self {
        Self {
            options: vec![PickerOption {
                value: String::new(),
                label: PICKER_PLACEHOLDER.to_string(),
                disabled: true,
            }],
        }
    }
}

pub fn connection_fragment(connection: Option<&ConnectionStatus>) -> String {
    match connection {
        Some(connection) => {
            let host = field_or_unknown(connection.host.as_deref());
            let port = field_or_unknown(connection.port.as_deref());
            let status = field_or_unknown(connection.status.as_deref());
            format!(
                "<h3>CONNECTION INFO:</h3>\
                 <p>Host: {host}</p>\
                 <p>Port: {port}</p>\
                 <p>Status: {status} - CONNECTED</p>"
            )
        }
        None => UNABLE_TO_CONNECT.to_string(),
    }
}

pub fn available_models_fragment(catalog: Option<&ModelCatalog>) -> String {
    match catalog {
        Some(catalog) if !catalog.available.is_empty() => {
            model_list_fragment("<h3>MODELS:</h3>", &catalog.available)
        }
        _ => NO_MODELS_FOUND.to_string(),
    }
}

pub fn active_models_fragment(catalog: Option<&ModelCatalog>) -> String {
    match catalog {
        Some(catalog) if !catalog.active.is_empty() => {
            model_list_fragment("<h3>ACTIVE MODELS:</h3>", &catalog.active)
        }
        _ => NO_ACTIVE_MODELS.to_string(),
    }
}

/// Option set for the picker: one entry per available model (value is the
/// model identifier, label the display name), or the disabled placeholder.
pub fn picker_options(catalog: Option<&ModelCatalog>) -> PickerOptions {
    match catalog {
        Some(catalog) if !catalog.available.is_empty() => PickerOptions {
            options: catalog
                .available
                .iter()
                .map(|entry| PickerOption {
                    value: entry.model.clone(),
                    label: entry.name.clone(),
                    disabled: false,
                })
                .collect(),
        },
        _ => PickerOptions::placeholder(),
    }
}

pub fn chat_reply_fragment(reply: &ChatReply) -> String {
    match reply.response.as_deref() {
        // The server delivers the reply body pre-rendered as HTML.
        Some(response) if !response.is_empty() => {
            format!("<div class=\"response-card\"><b>AI :</b> {response}</div>")
        }
        _ => NO_RESPONSE.to_string(),
    }
}

/// Error page for a load sequence that died unexpectedly.
pub fn error_page_fragment(detail: &str) -> String {
    format!("<h1>ERROR: {}</h1>", html_escape(detail))
}

/// Plain-text projection of a fragment, for clipboard use.
pub fn fragment_text(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            ch if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text
}

fn model_list_fragment(heading: &str, entries: &[ModelEntry]) -> String {
    let mut fragment = String::from(heading);
    for entry in entries {
        fragment.push_str(&format!(
            "<p>Name/Model: {}/{}</p>",
            html_escape(&entry.name),
            html_escape(&entry.model)
        ));
    }
    fragment
}

// An empty server-sent field falls back the same way as an absent one.
fn field_or_unknown(field: Option<&str>) -> String {
    match field {
        Some(value) if !value.is_empty() => html_escape(value),
        _ => UNKNOWN_FIELD.to_string(),
    }
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
