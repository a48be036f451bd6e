//! Room record to display record mapping.

use super::BuildingImageIndex;
use crate::models::{DisplayRecord, RoomRecord};

/// Maps room records to display records.
///
/// Pure and reentrant: mapping never fails and never reorders, merges or
/// drops records.
#[derive(Debug, Clone, Default)]
pub struct RoomDisplayMapper {
    images: BuildingImageIndex,
}

impl RoomDisplayMapper {
    /// Creates a mapper over the given image index.
    #[must_use]
    pub const fn new(images: BuildingImageIndex) -> Self {
        Self { images }
    }

    /// The image index used for thumbnails.
    #[must_use]
    pub const fn images(&self) -> &BuildingImageIndex {
        &self.images
    }

    /// Maps a single room.
    ///
    /// Upstream strings are used verbatim; empty fields render as empty.
    #[must_use]
    pub fn to_display_record(&self, room: &RoomRecord) -> DisplayRecord {
        DisplayRecord {
            image: self.images.resolve(&room.group).to_string(),
            alt: room.group.clone(),
            label: format!("{} - {}", room.room_num, room.group),
            time: format!(
                "{} from {} to {}",
                room.date, room.start_time, room.end_time
            ),
            url: room.url.clone(),
        }
    }

    /// Maps every room, preserving order one to one.
    #[must_use]
    pub fn map_all(&self, rooms: &[RoomRecord]) -> Vec<DisplayRecord> {
        rooms.iter().map(|room| self.to_display_record(room)).collect()
    }
}
