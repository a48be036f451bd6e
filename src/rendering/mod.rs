//! Room list rendering.
//!
//! Resolves building thumbnails, maps room records to display records, and
//! renders the list as text or JSON.

mod images;
mod list;
mod mapper;

pub use images::{BuildingImageIndex, DEFAULT_BUILDING_IMAGE};
pub use list::{OutputFormat, render, render_json, render_text};
pub use mapper::RoomDisplayMapper;
