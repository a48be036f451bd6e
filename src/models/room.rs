//! Room records as served by the room service.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A bookable room slot returned by `GET /api/rooms`.
///
/// Fields are taken verbatim from the service. A missing field, `null`, or a
/// non-string scalar never fails decoding: `null` and missing become the empty
/// string, numbers and booleans keep their JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    /// Room number, e.g. `"201"`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub room_num: String,
    /// Building or room-group label.
    #[serde(default, deserialize_with = "lenient_string")]
    pub group: String,
    /// Day of the slot, as formatted by the service.
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    /// Slot start, as formatted by the service.
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: String,
    /// Slot end, as formatted by the service.
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_time: String,
    /// External booking page.
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
}

/// Acknowledgement returned by `POST /api/scrape`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionAck {
    /// Human-readable status from the service.
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}
