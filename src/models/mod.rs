//! Data models for studysphere.
//!
//! Room records as served by the room service, the display form the list is
//! rendered from, and the user-selected time window.

mod display;
mod room;
mod window;

pub use display::DisplayRecord;
pub use room::{CollectionAck, RoomRecord};
pub use window::TimeWindow;
