//! Render-ready room entries.

use serde::Serialize;

/// The denormalized form of a [`super::RoomRecord`] that the room list is drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRecord {
    /// Building thumbnail reference.
    pub image: String,
    /// Alt text for the thumbnail (the group label).
    pub alt: String,
    /// `"{room_num} - {group}"`.
    pub label: String,
    /// `"{date} from {start_time} to {end_time}"`.
    pub time: String,
    /// Outbound booking link, unchanged.
    pub url: String,
}
