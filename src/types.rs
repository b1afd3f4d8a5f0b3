use serde::{Deserialize, Serialize};

/// Server-reported reachability snapshot from `GET /api/connection`.
///
/// Every field is optional; the server is free to omit any of them. The
/// whole payload being absent (the client returned `None`) is the distinct
/// "unreachable" state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    #[serde(default, deserialize_with = "de_stringish")]
    pub host: Option<String>,
    // The server reports the port as a bare number.
    #[serde(default, deserialize_with = "de_stringish")]
    pub port: Option<String>,
    #[serde(default, deserialize_with = "de_stringish")]
    pub status: Option<String>,
}

/// One model as the server lists it: a display name and a model identifier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: String,
}

/// Available and active model lists from `GET /api/connection/stats`.
///
/// A missing list deserializes to empty; an empty list ("no models") is a
/// valid state distinct from a `None` catalog ("server unreachable").
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelCatalog {
    #[serde(default)]
    pub available: Vec<ModelEntry>,
    #[serde(default)]
    pub active: Vec<ModelEntry>,
}

/// Reply payload from `POST /api/chat`.
///
/// An empty or absent response is "no response", not a failure; transport
/// failures never produce a `ChatReply` at all.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}

/// Accepts a JSON string or number and normalizes it to a string.
fn de_stringish<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stringish {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(
        Option::<Stringish>::deserialize(deserializer)?.map(|value| match value {
            Stringish::Text(text) => text,
            Stringish::Number(number) => number.to_string(),
        }),
    )
}
